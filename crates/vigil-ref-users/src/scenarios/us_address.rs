//! Scenario D: condition expressions over nested paths.
//!
//! The `user_request_validation` schema requires the address parts only for
//! US requests (`country == 'US'`) and ties the three comment fields together
//! with `!= null || ...` conditions. Both the typed `UserRequest` and an
//! untyped JSON payload go through the same rules.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use vigil_contracts::{error::VigilResult, value::Record};

use crate::{
    mock_data::{reference_engine, reference_registry, us_request_missing_city, USER_REQUEST_SCHEMA},
    model::UserRequest,
    scenarios::print_violations,
};

/// Run Scenario D: US address rules.
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario D: US addresses need every address part ===");
    println!();

    let engine = reference_engine(Arc::new(reference_registry()?));

    let missing_city = us_request_missing_city();
    print_violations(
        "US, no city",
        &engine.validate(&missing_city, USER_REQUEST_SCHEMA, None),
    );

    let canadian = UserRequest {
        country: Some("CA".to_string()),
        ..missing_city.clone()
    };
    print_violations(
        "CA, no city",
        &engine.validate(&canadian, USER_REQUEST_SCHEMA, None),
    );

    let payload = Record::from_json(json!({
        "country": "US",
        "address": { "line1": "1 Main St", "line2": "Apt 2", "city": null, "state": "Texas" }
    }))?;
    print_violations(
        "JSON payload",
        &engine.validate(&payload, USER_REQUEST_SCHEMA, None),
    );

    let commented = UserRequest {
        comment: Some("Call before delivery".to_string()),
        comment_date: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(9, 30, 0)),
        ..missing_city
    };
    print_violations(
        "comment without author",
        &engine.validate_fields(&commented, USER_REQUEST_SCHEMA, &["comment", "commentDate", "commentBy"]),
    );

    println!();
    println!("  Scenario D complete.");
    println!();
    Ok(())
}
