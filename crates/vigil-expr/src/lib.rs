//! # vigil-expr
//!
//! A small, bounded condition language for VIGIL `CONDITIONAL` rules.
//!
//! ```text
//! country == 'US' && (userType == "PREMIUM" or age >= 18)
//! ```
//!
//! Identifiers are dotted field paths resolved through `FieldAccess`.
//! Evaluation is fail-closed: an expression that does not parse evaluates
//! to `false` and logs a warning, so a broken condition never makes a field
//! required.

pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use evaluator::SimpleExpressionEvaluator;
pub use parser::{parse, CompareOp, Expr, Literal};
