//! # vigil-registry
//!
//! The schema registry and the sources it loads from.
//!
//! `SchemaRegistry` caches every schema the source provides, compiled into a
//! `RuleSet`, and implements `SchemaProvider` so it can be handed straight to
//! a `ValidationEngine`:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vigil_registry::{FileSchemaSource, SchemaRegistry};
//!
//! let registry = Arc::new(SchemaRegistry::load(FileSchemaSource::new("schemas/"))?);
//! let engine = ValidationEngine::new(registry.clone(), Arc::new(SimpleExpressionEvaluator));
//! ```

pub mod registry;
pub mod source;

pub use registry::{RegisteredSchema, SchemaRegistry};
pub use source::{parse_json_document, parse_toml_document, FileSchemaSource, InMemorySchemaSource};
