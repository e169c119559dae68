//! # vigil-core
//!
//! The conditional field-validation engine for VIGIL.
//!
//! This crate provides:
//! - The seam traits (`FieldAccess`, `DeclaredRules`, `ExpressionEvaluator`,
//!   `SchemaSource`, `SchemaProvider`)
//! - Dotted path resolution and nested writes (`path`)
//! - The emptiness rule and cross-field predicates (`condition`)
//! - Type and constraint checks (`types`)
//! - The unified `RuleSet` both schemas and declared rules compile into
//! - The `ValidationEngine` that runs a rule set against an object
//! - A schema-driven input transformer (`transform`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_core::{ValidationEngine, traits::{FieldAccess, SchemaProvider}};
//!
//! let engine = ValidationEngine::new(registry, evaluator);
//! let violations = engine.validate(&request, "user_request_validation", None);
//! ```

pub mod condition;
pub mod context;
pub mod engine;
pub mod path;
pub mod ruleset;
pub mod traits;
pub mod transform;
pub mod types;

pub use context::{Necessity, ValidationContext};
pub use engine::ValidationEngine;
pub use ruleset::{CompiledRule, Requirement, RuleOrigin, RuleSet};
pub use traits::{DeclaredRules, ExpressionEvaluator, FieldAccess, SchemaProvider, SchemaSource};
