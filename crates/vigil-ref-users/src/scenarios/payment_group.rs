//! Scenario C: all-or-nothing field groups.
//!
//! The three payment fields form a group: once any one is filled, each of
//! the others is reported separately, naming the filled field as trigger.
//! The shipping fields show the simpler presence dependency.

use std::sync::Arc;

use vigil_contracts::error::VigilResult;

use crate::{
    mock_data::{cvv_only_payment, reference_engine, reference_registry, valid_us_request},
    model::UserRequest,
    scenarios::print_violations,
};

/// Run Scenario C: partial payment details.
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario C: Payment fields are all-or-nothing ===");
    println!();

    let engine = reference_engine(Arc::new(reference_registry()?));

    print_violations("cvv only", &engine.validate_declared(&cvv_only_payment()));

    let full = UserRequest {
        credit_card_number: Some("4111111111111111".to_string()),
        expiry_date: Some("12/29".to_string()),
        ..cvv_only_payment()
    };
    print_violations("all three", &engine.validate_declared(&full));
    print_violations("none", &engine.validate_declared(&valid_us_request()));

    let shipping = UserRequest {
        shipping_address: Some("1 Infinite Loop".to_string()),
        shipping_city: Some("Cupertino".to_string()),
        ..valid_us_request()
    };
    print_violations("shipping without zip", &engine.validate_declared(&shipping));

    println!();
    println!("  Scenario C complete.");
    println!();
    Ok(())
}
