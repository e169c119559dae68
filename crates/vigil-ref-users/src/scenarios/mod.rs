//! Runnable reference scenarios.
//!
//! Each scenario wires real VIGIL components (registry, engine, condition
//! evaluator) to the reference schemas and sample requests, prints what
//! happens, and returns an error only if the wiring itself fails.

pub mod age_limits;
pub mod partial_update;
pub mod payment_group;
pub mod premium_user;
pub mod us_address;

use vigil_contracts::violation::Violation;

/// Print `violations` one per line under a short label.
pub(crate) fn print_violations(label: &str, violations: &[Violation]) {
    if violations.is_empty() {
        println!("  {label}: no violations");
        return;
    }
    println!("  {label}: {} violation(s)", violations.len());
    for v in violations {
        match &v.trigger {
            Some(trigger) => println!("    - {v}  (triggered by {trigger})"),
            None => println!("    - {v}"),
        }
    }
}
