//! Scenario B: value-triggered requirements.
//!
//! `taxId` and `companyName` become required when `userType` is PREMIUM or
//! BUSINESS. Any other user type leaves them optional whatever they hold.

use std::sync::Arc;

use vigil_contracts::error::VigilResult;

use crate::{
    mock_data::{premium_without_tax_details, reference_engine, reference_registry},
    model::UserRequest,
    scenarios::print_violations,
};

/// Run Scenario B: premium user without tax details.
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario B: Premium and business users need tax details ===");
    println!();

    let engine = reference_engine(Arc::new(reference_registry()?));

    let premium = premium_without_tax_details();
    print_violations("userType = PREMIUM", &engine.validate_declared(&premium));

    let basic = UserRequest {
        user_type: Some("BASIC".to_string()),
        ..premium.clone()
    };
    print_violations("userType = BASIC  ", &engine.validate_declared(&basic));

    let completed = UserRequest {
        tax_id: Some("12-3456789".to_string()),
        company_name: Some("Initech".to_string()),
        ..premium
    };
    print_violations("PREMIUM, completed", &engine.validate_declared(&completed));

    println!();
    println!("  Scenario B complete.");
    println!();
    Ok(())
}
