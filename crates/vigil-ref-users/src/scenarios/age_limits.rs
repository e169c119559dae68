//! Scenario A: required integer with a range.
//!
//! The `user_profile` schema declares `age` as a required `INT32` between 0
//! and 120. An out-of-range age is reported as an invalid type; a null age
//! as a missing required field. The same rules apply whether the payload is
//! an untyped `Record` or a typed `UserProfile`.

use std::sync::Arc;

use serde_json::json;

use vigil_contracts::{error::VigilResult, value::Record};

use crate::{
    mock_data::{reference_engine, reference_registry, USER_PROFILE_SCHEMA},
    model::UserProfile,
    scenarios::print_violations,
};

/// Run Scenario A: age limits.
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario A: Age limits (INT32, min 0, max 120) ===");
    println!();

    let engine = reference_engine(Arc::new(reference_registry()?));

    for (label, payload) in [
        ("age = 150 ", json!({ "username": "old_timer", "age": 150 })),
        ("age = null", json!({ "username": "no_age", "age": null })),
        ("age = 42  ", json!({ "username": "ada", "age": 42, "email": "ada@example.com" })),
    ] {
        let record = Record::from_json(payload)?;
        let violations = engine.validate(&record, USER_PROFILE_SCHEMA, None);
        print_violations(label, &violations);
    }

    let profile = UserProfile {
        username: Some("grace".to_string()),
        age: Some(-3),
        email: Some("not-an-email".to_string()),
        website: Some("https://example.com/grace".to_string()),
    };
    let violations = engine.validate(&profile, USER_PROFILE_SCHEMA, None);
    print_violations("typed profile", &violations);

    println!();
    println!("  Scenario A complete.");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use vigil_contracts::violation::ViolationKind;

    use super::*;

    fn validate_profile(payload: serde_json::Value) -> Vec<vigil_contracts::violation::Violation> {
        let engine = reference_engine(Arc::new(reference_registry().unwrap()));
        let record = Record::from_json(payload).unwrap();
        engine.validate(&record, USER_PROFILE_SCHEMA, None)
    }

    #[test]
    fn test_age_above_max_is_invalid_type() {
        let violations = validate_profile(json!({ "username": "old_timer", "age": 150 }));
        assert_eq!(violations.len(), 1, "got {violations:?}");
        assert_eq!(violations[0].field, "age");
        assert_eq!(violations[0].kind, ViolationKind::InvalidType);
        assert_eq!(violations[0].message, "Invalid type. Expected: INT32");
    }

    #[test]
    fn test_null_age_is_required() {
        let violations = validate_profile(json!({ "username": "no_age", "age": null }));
        assert_eq!(violations.len(), 1, "got {violations:?}");
        assert_eq!(violations[0].kind, ViolationKind::Required);
        assert_eq!(violations[0].message, "Field is required");
    }

    #[test]
    fn test_typed_profile_reports_each_field() {
        let engine = reference_engine(Arc::new(reference_registry().unwrap()));
        let profile = UserProfile {
            username: Some("grace".to_string()),
            age: Some(-3),
            email: Some("not-an-email".to_string()),
            website: Some("https://example.com/grace".to_string()),
        };
        let fields: Vec<String> = engine
            .validate(&profile, USER_PROFILE_SCHEMA, None)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["age", "email"]);
    }

    #[test]
    fn test_scenario_runs() {
        run_scenario().unwrap();
    }
}
