//! `SimpleExpressionEvaluator`: evaluates parsed conditions against a root
//! object.
//!
//! Comparison semantics:
//!
//! - a path that does not resolve (or resolves to null) equals `null`
//! - numbers compare numerically, so `age >= 18` works on `Int` and `Float`
//! - strings compare lexically; dates compare through their ISO text
//! - operands of different kinds are never equal and never ordered
//!
//! A bare operand in boolean position is true when it is `true` or, for
//! non-boolean values, when it is populated.

use tracing::warn;

use vigil_contracts::{error::VigilResult, value::FieldValue};
use vigil_core::{condition, ExpressionEvaluator, FieldAccess};

use crate::parser::{parse, CompareOp, Expr, Literal};

/// The built-in condition language.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleExpressionEvaluator;

impl SimpleExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Parse and evaluate `expression`, surfacing parse errors.
    pub fn try_evaluate(&self, expression: &str, context: &dyn FieldAccess) -> VigilResult<bool> {
        let expr = parse(expression)?;
        Ok(truthy(&eval(&expr, context)))
    }
}

impl ExpressionEvaluator for SimpleExpressionEvaluator {
    fn evaluate(&self, expression: &str, context: &dyn FieldAccess) -> bool {
        match self.try_evaluate(expression, context) {
            Ok(result) => result,
            Err(e) => {
                warn!(%expression, error = %e, "condition failed to evaluate; treating as false");
                false
            }
        }
    }
}

/// An evaluated operand.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    /// Lists, maps and records: only their emptiness is observable.
    Composite { populated: bool },
}

impl From<Option<FieldValue>> for Operand {
    fn from(value: Option<FieldValue>) -> Self {
        match value {
            None | Some(FieldValue::Null) => Operand::Null,
            Some(FieldValue::Bool(b)) => Operand::Bool(b),
            Some(FieldValue::Int(i)) => Operand::Num(i as f64),
            Some(FieldValue::Float(f)) => Operand::Num(f),
            Some(FieldValue::String(s)) => Operand::Str(s),
            Some(v @ (FieldValue::Date(_) | FieldValue::DateTime(_) | FieldValue::ZonedDateTime(_))) => {
                Operand::Str(v.to_string())
            }
            Some(v) => Operand::Composite {
                populated: condition::is_populated(Some(&v)),
            },
        }
    }
}

fn eval(expr: &Expr, context: &dyn FieldAccess) -> Operand {
    match expr {
        Expr::Literal(Literal::Null) => Operand::Null,
        Expr::Literal(Literal::Bool(b)) => Operand::Bool(*b),
        Expr::Literal(Literal::Num(n)) => Operand::Num(*n),
        Expr::Literal(Literal::Str(s)) => Operand::Str(s.clone()),
        Expr::Path(path) => Operand::from(context.get_path(path)),
        Expr::Not(inner) => Operand::Bool(!truthy(&eval(inner, context))),
        Expr::And(left, right) => {
            Operand::Bool(truthy(&eval(left, context)) && truthy(&eval(right, context)))
        }
        Expr::Or(left, right) => {
            Operand::Bool(truthy(&eval(left, context)) || truthy(&eval(right, context)))
        }
        Expr::Compare(op, left, right) => {
            Operand::Bool(compare(*op, &eval(left, context), &eval(right, context)))
        }
    }
}

fn truthy(operand: &Operand) -> bool {
    match operand {
        Operand::Null => false,
        Operand::Bool(b) => *b,
        Operand::Num(_) => true,
        Operand::Str(s) => !s.trim().is_empty(),
        Operand::Composite { populated } => *populated,
    }
}

fn compare(op: CompareOp, left: &Operand, right: &Operand) -> bool {
    use std::cmp::Ordering;

    let ordering: Option<Ordering> = match (left, right) {
        (Operand::Num(a), Operand::Num(b)) => a.partial_cmp(b),
        (Operand::Str(a), Operand::Str(b)) => Some(a.cmp(b)),
        (Operand::Bool(a), Operand::Bool(b)) if matches!(op, CompareOp::Eq | CompareOp::Ne) => Some(a.cmp(b)),
        (Operand::Null, Operand::Null) if matches!(op, CompareOp::Eq | CompareOp::Ne) => Some(Ordering::Equal),
        _ => None,
    };
    match (op, ordering) {
        (CompareOp::Eq, ordering) => ordering == Some(Ordering::Equal),
        (CompareOp::Ne, ordering) => ordering != Some(Ordering::Equal),
        (_, None) => false,
        (CompareOp::Lt, Some(o)) => o == Ordering::Less,
        (CompareOp::Le, Some(o)) => o != Ordering::Greater,
        (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
        (CompareOp::Ge, Some(o)) => o != Ordering::Less,
    }
}
