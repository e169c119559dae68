//! Required-ness predicates.
//!
//! Every decision about whether a field must be filled goes through the same
//! emptiness rule:
//!
//! - absent or `Null` → empty
//! - string → empty iff it is blank after trimming
//! - list, map, record → empty iff it has no elements
//! - anything else → never empty
//!
//! The cross-field predicates below take the root object and read the fields
//! they depend on through `FieldAccess::get_path`, so dotted paths work on
//! both sides of a dependency.

use std::collections::BTreeSet;

use tracing::debug;

use vigil_contracts::value::FieldValue;

use crate::traits::{ExpressionEvaluator, FieldAccess};

/// True when `value` counts as not filled in.
pub fn is_empty(value: Option<&FieldValue>) -> bool {
    match value {
        None | Some(FieldValue::Null) => true,
        Some(FieldValue::String(s)) => s.trim().is_empty(),
        Some(FieldValue::List(items)) => items.is_empty(),
        Some(FieldValue::Map(map)) => map.is_empty(),
        Some(FieldValue::Record(record)) => record.is_empty(),
        Some(_) => false,
    }
}

pub fn is_populated(value: Option<&FieldValue>) -> bool {
    !is_empty(value)
}

/// Required iff `depends_on_field` resolves to a value whose string form is
/// one of `trigger_values`. Comparison is plain string equality, so
/// `"1"` matches an integer `1` and `"true"` matches a boolean.
pub fn depends_on_value(
    root: &dyn FieldAccess,
    depends_on_field: &str,
    trigger_values: &BTreeSet<String>,
) -> bool {
    match root.get_path(depends_on_field) {
        Some(value) => trigger_values.contains(&value.to_string()),
        None => false,
    }
}

/// Required iff `depends_on_presence_of` is populated.
pub fn depends_on_presence(root: &dyn FieldAccess, depends_on_presence_of: &str) -> bool {
    is_populated(root.get_path(depends_on_presence_of).as_ref())
}

/// Required iff any member of `group_fields` is populated.
///
/// Returns the first populated member, which is reported as the trigger of
/// the resulting violation.
pub fn depends_on_group(root: &dyn FieldAccess, group_fields: &[String]) -> Option<String> {
    group_fields
        .iter()
        .find(|member| is_populated(root.get_path(member).as_ref()))
        .cloned()
}

/// Evaluate an external condition expression against `root`.
///
/// Blank expressions are false without consulting the evaluator.
pub fn evaluate_condition(
    evaluator: &dyn ExpressionEvaluator,
    expression: &str,
    root: &dyn FieldAccess,
) -> bool {
    let expression = expression.trim();
    if expression.is_empty() {
        return false;
    }
    let result = evaluator.evaluate(expression, root);
    debug!(%expression, result, "condition evaluated");
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
