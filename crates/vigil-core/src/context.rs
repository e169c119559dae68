//! Per-call validation context.
//!
//! A `ValidationContext` binds one root object to one expression evaluator
//! for the duration of a single `validate` call. It lives on the caller's
//! stack and is dropped on every exit path, so concurrent calls never share
//! state.

use tracing::debug;

use vigil_contracts::violation::Violation;

use crate::{
    condition,
    ruleset::{CompiledRule, Requirement},
    traits::{ExpressionEvaluator, FieldAccess},
    types,
};

/// Outcome of the required-ness decision for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Necessity {
    /// The field must be populated. `trigger` names the field that made it
    /// so, for cross-field rules.
    Required { trigger: Option<String> },
    NotRequired,
}

impl Necessity {
    pub fn is_required(&self) -> bool {
        matches!(self, Necessity::Required { .. })
    }
}

/// The root object and evaluator one validation call runs against.
#[derive(Clone, Copy)]
pub struct ValidationContext<'a> {
    root: &'a dyn FieldAccess,
    evaluator: &'a dyn ExpressionEvaluator,
}

impl<'a> ValidationContext<'a> {
    pub fn new(root: &'a dyn FieldAccess, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        Self { root, evaluator }
    }

    pub fn root(&self) -> &'a dyn FieldAccess {
        self.root
    }

    /// Decide whether `rule.field` must be populated for this root object.
    pub fn necessity(&self, rule: &CompiledRule) -> Necessity {
        match &rule.requirement {
            Requirement::Always => Necessity::Required { trigger: None },
            Requirement::Never => Necessity::NotRequired,
            Requirement::Condition(expression) => {
                if condition::evaluate_condition(self.evaluator, expression, self.root) {
                    Necessity::Required { trigger: None }
                } else {
                    Necessity::NotRequired
                }
            }
            Requirement::ValueIn {
                depends_on,
                trigger_values,
            } => {
                if condition::depends_on_value(self.root, depends_on, trigger_values) {
                    Necessity::Required {
                        trigger: Some(depends_on.clone()),
                    }
                } else {
                    Necessity::NotRequired
                }
            }
            Requirement::PresenceOf { depends_on } => {
                if condition::depends_on_presence(self.root, depends_on) {
                    Necessity::Required {
                        trigger: Some(depends_on.clone()),
                    }
                } else {
                    Necessity::NotRequired
                }
            }
            Requirement::AnyOf { group } => match condition::depends_on_group(self.root, group) {
                Some(member) => Necessity::Required {
                    trigger: Some(member),
                },
                None => Necessity::NotRequired,
            },
        }
    }

    /// Check one rule against the root object.
    ///
    /// Required and empty yields a required violation; otherwise a present
    /// value is checked against the rule's declared type.
    pub fn check_rule(&self, rule: &CompiledRule) -> Option<Violation> {
        let value = self.root.get_path(&rule.field);

        if let Necessity::Required { trigger } = self.necessity(rule) {
            if condition::is_empty(value.as_ref()) {
                debug!(field = %rule.field, trigger = ?trigger, "required field is empty");
                let violation = Violation::required(&rule.field, rule.required_message());
                return Some(match trigger {
                    Some(trigger) => violation.with_trigger(trigger),
                    None => violation,
                });
            }
        }

        let (Some(value), Some(field_type)) = (value.as_ref(), rule.field_type) else {
            return None;
        };
        if types::check_with(Some(value), field_type, &rule.constraints) {
            None
        } else {
            debug!(field = %rule.field, %field_type, "type check failed");
            Some(Violation::invalid_type(&rule.field, rule.type_message(field_type)))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use vigil_contracts::{
        declared::FieldValidation,
        rule::{FieldType, Rule},
        value::Record,
        violation::ViolationKind,
    };

    use super::*;
    use crate::traits::NeverEvaluator;

    fn record(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    fn rule(field: &str, rule: Rule) -> CompiledRule {
        CompiledRule::from_rule("test", field, &rule)
    }

    /// Evaluator that is true for the literal expression "on" only.
    struct Switch;

    impl ExpressionEvaluator for Switch {
        fn evaluate(&self, expression: &str, _context: &dyn FieldAccess) -> bool {
            expression == "on"
        }
    }

    #[test]
    fn required_and_empty_is_a_required_violation() {
        let root = record(json!({ "name": "  " }));
        let ctx = ValidationContext::new(&root, &NeverEvaluator);
        let violation = ctx.check_rule(&rule("name", Rule::required())).unwrap();
        assert_eq!(violation.kind, ViolationKind::Required);
        assert_eq!(violation.message, "Field is required");
        assert!(violation.trigger.is_none());
    }

    #[test]
    fn empty_optional_field_skips_type_check() {
        let root = record(json!({}));
        let ctx = ValidationContext::new(&root, &NeverEvaluator);
        assert!(ctx
            .check_rule(&rule("age", Rule::optional().with_type(FieldType::Int32)))
            .is_none());
    }

    #[test]
    fn present_optional_value_is_still_type_checked() {
        let root = record(json!({ "age": "old" }));
        let ctx = ValidationContext::new(&root, &NeverEvaluator);
        let violation = ctx
            .check_rule(&rule("age", Rule::optional().with_type(FieldType::Int32)))
            .unwrap();
        assert_eq!(violation.kind, ViolationKind::InvalidType);
        assert_eq!(violation.message, "Invalid type. Expected: INT32");
    }

    #[test]
    fn conditions_go_through_the_evaluator() {
        let root = record(json!({}));
        let on = rule("city", Rule::conditional("on"));
        let off = rule("city", Rule::conditional("off"));

        let ctx = ValidationContext::new(&root, &Switch);
        assert!(ctx.necessity(&on).is_required());
        assert_eq!(ctx.necessity(&off), Necessity::NotRequired);
        assert!(ctx.check_rule(&on).is_some());
        assert!(ctx.check_rule(&off).is_none());
    }

    #[test]
    fn declared_rules_report_their_trigger() {
        let root = record(json!({ "userType": "PREMIUM", "shippingAddress": "1 Main St", "cvv": "123" }));
        let ctx = ValidationContext::new(&root, &NeverEvaluator);

        let by_value = CompiledRule::from_declared(
            &FieldValidation::depends_on_value("taxId", "userType", ["PREMIUM"]).with_message("Tax ID needed"),
        );
        let v = ctx.check_rule(&by_value).unwrap();
        assert_eq!(v.message, "Tax ID needed");
        assert_eq!(v.trigger.as_deref(), Some("userType"));

        let by_presence =
            CompiledRule::from_declared(&FieldValidation::depends_on_presence("shippingCity", "shippingAddress"));
        let v = ctx.check_rule(&by_presence).unwrap();
        assert_eq!(v.message, "Field validation failed");
        assert_eq!(v.trigger.as_deref(), Some("shippingAddress"));

        let by_group = CompiledRule::from_declared(&FieldValidation::depends_on_group(
            "expiryDate",
            ["creditCardNumber", "cvv"],
        ));
        assert_eq!(ctx.check_rule(&by_group).unwrap().trigger.as_deref(), Some("cvv"));
    }

    #[test]
    fn populated_dependent_field_passes() {
        let root = record(json!({ "userType": "PREMIUM", "taxId": "12-345" }));
        let ctx = ValidationContext::new(&root, &NeverEvaluator);
        let by_value = CompiledRule::from_declared(&FieldValidation::depends_on_value(
            "taxId",
            "userType",
            ["PREMIUM", "BUSINESS"],
        ));
        assert!(ctx.check_rule(&by_value).is_none());
    }
}
