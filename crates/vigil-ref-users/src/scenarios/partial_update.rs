//! Scenario E: PATCH-style updates and schema refresh.
//!
//! An update arrives as loosely typed JSON. It is transformed into typed
//! values, applied to the stored request, and only the touched fields are
//! re-validated. The schema is then relaxed at the source and refreshed in
//! the registry without restarting anything.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    value::Record,
};
use vigil_core::{
    transform::{transform, PropertyDef, PropertyKind, TransformSchema},
    FieldAccess, SchemaSource,
};
use vigil_registry::{InMemorySchemaSource, SchemaRegistry};

use crate::{
    mock_data::{reference_engine, reference_schemas, valid_us_request, USER_REQUEST_SCHEMA},
    model::UserRequest,
    scenarios::print_violations,
};

/// How incoming comment updates are typed.
pub fn comment_update_schema() -> TransformSchema {
    TransformSchema::new()
        .with_property("comment", PropertyDef::of(PropertyKind::String))
        .with_property("commentDate", PropertyDef::of(PropertyKind::LocalDateTime))
        .with_property("commentBy", PropertyDef::of(PropertyKind::String).reading("author"))
}

/// Run Scenario E: partial update, then schema refresh.
pub fn run_scenario() -> VigilResult<()> {
    println!("=== Scenario E: Partial updates and schema refresh ===");
    println!();

    let source = Arc::new(InMemorySchemaSource::new(reference_schemas()?));
    let registry = Arc::new(SchemaRegistry::load(Arc::clone(&source))?);
    let engine = reference_engine(Arc::clone(&registry));

    let mut stored = UserRequest {
        comment: Some("Leave at the front desk".to_string()),
        ..valid_us_request()
    };

    let incoming = Record::from_json(json!({
        "commentDate": "2024-03-01T09:30:00",
        "author": "Q"
    }))?;
    let updates = transform(&incoming, &comment_update_schema())?;
    stored.apply_updates(&updates)?;

    let touched: Vec<&str> = updates.iter().map(|(k, _)| k.as_str()).collect();
    info!(fields = ?touched, "applied partial update");
    println!("  Updated fields: {}", touched.join(", "));

    match engine.validate_and_throw(&stored, USER_REQUEST_SCHEMA, Some(touched.as_slice())) {
        Ok(()) => println!("  Update accepted"),
        Err(VigilError::ValidationFailed { violations }) => {
            print_violations("update rejected", &violations);
        }
        Err(e) => return Err(e),
    }

    // Relax the author length rule at the source, then refresh just that schema.
    let mut relaxed = source
        .fetch_by_name(USER_REQUEST_SCHEMA)?
        .ok_or_else(|| VigilError::ConfigError {
            reason: format!("schema '{USER_REQUEST_SCHEMA}' missing from source"),
        })?;
    if let Some(rule) = relaxed.rules.get_mut("commentBy") {
        rule.type_validation_params.clear();
    }
    source.upsert(relaxed);
    registry.refresh_schema(USER_REQUEST_SCHEMA)?;
    println!("  Schema '{USER_REQUEST_SCHEMA}' refreshed (commentBy length limit removed)");

    let violations = engine.validate_fields(&stored, USER_REQUEST_SCHEMA, &touched);
    print_violations("after refresh", &violations);

    println!();
    println!("  Scenario E complete.");
    println!();
    Ok(())
}
