//! # vigil-contracts
//!
//! Shared value, rule, and schema types for the VIGIL validation engine.
//!
//! All crates in the workspace import from here. No evaluation logic lives in
//! this crate, only data definitions and error types.

pub mod declared;
pub mod error;
pub mod rule;
pub mod schema;
pub mod value;
pub mod violation;

pub use declared::FieldValidation;
pub use error::{VigilError, VigilResult};
pub use rule::{FieldType, RequirementType, Rule, TypeParams};
pub use schema::Schema;
pub use value::{FieldValue, Record};
pub use violation::{violations_by_field, Violation, ViolationKind};

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // ── Rule wire format ─────────────────────────────────────────────────────

    #[test]
    fn rule_deserializes_from_stored_document() {
        let rule: Rule = serde_json::from_value(json!({
            "requirementType": "CONDITIONAL",
            "fieldType": "STRING",
            "condition": "country == 'US'",
            "errorMessage": "State is required for US addresses",
            "typeValidationParams": { "maxLength": 2 }
        }))
        .unwrap();

        assert!(rule.is_conditional());
        assert_eq!(rule.field_type, Some(FieldType::String));
        assert_eq!(rule.active_condition(), Some("country == 'US'"));
        assert_eq!(rule.type_validation_params["maxLength"], json!(2));
    }

    #[test]
    fn rule_defaults_to_optional_without_type() {
        let rule: Rule = serde_json::from_value(json!({})).unwrap();
        assert_eq!(rule.requirement_type, RequirementType::Optional);
        assert!(rule.field_type.is_none());
        assert!(rule.type_validation_params.is_empty());
    }

    #[test]
    fn blank_condition_is_not_active() {
        let rule = Rule::conditional("   ");
        assert!(rule.is_conditional());
        assert_eq!(rule.active_condition(), None);

        // A condition on a non-conditional rule is ignored.
        let mut required = Rule::required();
        required.condition = Some("a == 1".to_string());
        assert_eq!(required.active_condition(), None);
    }

    #[test]
    fn field_type_wire_names() {
        let parsed: Vec<FieldType> = serde_json::from_value(json!([
            "INT32", "LOCAL_DATE", "DATE", "LOCAL_DATE_TIME", "ZONED_DATE_TIME", "EMAIL"
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                FieldType::Int32,
                FieldType::Date,
                FieldType::Date,
                FieldType::DateTime,
                FieldType::ZonedDateTime,
                FieldType::Email,
            ]
        );
        assert_eq!(FieldType::Int32.to_string(), "INT32");
        assert_eq!(FieldType::DateTime.to_string(), "LOCAL_DATE_TIME");
    }

    // ── Schema ───────────────────────────────────────────────────────────────

    #[test]
    fn schema_deserializes_with_dotted_paths() {
        let schema: Schema = serde_json::from_value(json!({
            "_id": "user_request_validation",
            "schemaName": "user_request_validation",
            "rules": {
                "country": { "requirementType": "REQUIRED", "fieldType": "STRING" },
                "address.city": { "requirementType": "CONDITIONAL", "condition": "country == 'US'" }
            }
        }))
        .unwrap();

        assert_eq!(schema.schema_name, "user_request_validation");
        assert_eq!(schema.field_paths().collect::<Vec<_>>(), vec!["address.city", "country"]);
        assert!(schema.rule("country").unwrap().is_required());
        assert!(schema.rule("missing").is_none());
    }

    // ── FieldValidation ──────────────────────────────────────────────────────

    #[test]
    fn field_validation_tagged_wire_format() {
        let v: FieldValidation = serde_json::from_value(json!({
            "type": "DEPENDS_ON_VALUE",
            "field": "taxId",
            "dependsOnField": "userType",
            "triggerValues": ["PREMIUM", "BUSINESS"]
        }))
        .unwrap();

        assert_eq!(v.field(), "taxId");
        assert_eq!(v.message(), declared::DEFAULT_FIELD_VALIDATION_MESSAGE);
        match v {
            FieldValidation::DependsOnValue { trigger_values, .. } => {
                assert!(trigger_values.contains("PREMIUM"));
                assert!(trigger_values.contains("BUSINESS"));
            }
            other => panic!("expected DependsOnValue, got {:?}", other),
        }
    }

    #[test]
    fn group_expands_to_symmetric_declarations() {
        let rules = FieldValidation::group(&["a", "b", "c"], |m| format!("{m} is part of a group"));
        assert_eq!(rules.len(), 3);

        for rule in &rules {
            match rule {
                FieldValidation::DependsOnGroup { field, group_fields, message } => {
                    assert_eq!(group_fields.len(), 2);
                    assert!(!group_fields.contains(field), "member must not name itself");
                    assert!(message.starts_with(field.as_str()));
                }
                other => panic!("expected DependsOnGroup, got {:?}", other),
            }
        }
    }

    #[test]
    fn with_message_replaces_default() {
        let v = FieldValidation::depends_on_presence("shippingCity", "shippingAddress")
            .with_message("City is required");
        assert_eq!(v.message(), "City is required");
    }

    // ── Values ───────────────────────────────────────────────────────────────

    #[test]
    fn json_numbers_split_into_int_and_float() {
        assert_eq!(FieldValue::from(json!(42)), FieldValue::Int(42));
        assert_eq!(FieldValue::from(json!(1.5)), FieldValue::Float(1.5));
        assert!(matches!(FieldValue::from(json!({"a": 1})), FieldValue::Map(_)));
        assert!(matches!(FieldValue::from(json!([1, 2])), FieldValue::List(_)));
    }

    #[test]
    fn display_is_the_trigger_string_form() {
        assert_eq!(FieldValue::from("PREMIUM").to_string(), "PREMIUM");
        assert_eq!(FieldValue::Int(7).to_string(), "7");
        assert_eq!(FieldValue::Float(150.0).to_string(), "150.0");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "2024-03-09");
    }

    #[test]
    fn record_from_json_requires_object() {
        let record = Record::from_json(json!({ "name": "ada", "age": 36 })).unwrap();
        assert_eq!(record.get("name"), Some(&FieldValue::from("ada")));
        assert_eq!(record.to_json(), json!({ "name": "ada", "age": 36 }));

        match Record::from_json(json!([1, 2])) {
            Err(VigilError::ConfigError { reason }) => assert!(reason.contains("an array")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── Violations and errors ────────────────────────────────────────────────

    #[test]
    fn violations_by_field_keeps_last_message() {
        let map = violations_by_field(&[
            Violation::required("age", "Field is required"),
            Violation::invalid_type("email", "Invalid type. Expected: EMAIL"),
            Violation::invalid_type("age", "second"),
        ]);
        assert_eq!(map.len(), 2);
        assert_eq!(map["age"], "second");
    }

    #[test]
    fn validation_failed_display_counts_violations() {
        let err = VigilError::ValidationFailed {
            violations: vec![
                Violation::required("a", "Field is required"),
                Violation::required("b", "Field is required"),
            ],
        };
        assert_eq!(err.to_string(), "validation failed with 2 violation(s)");
    }

    #[test]
    fn error_config_error_display() {
        let err = VigilError::ConfigError {
            reason: "missing schema directory".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("missing schema directory"));
    }
}
