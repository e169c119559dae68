//! Reference schemas and sample requests.
//!
//! The schema documents live under `schemas/` and are compiled into the
//! crate, standing in for a document database. All sample data is fictional.

use std::sync::Arc;

use vigil_contracts::{error::VigilResult, schema::Schema};
use vigil_core::ValidationEngine;
use vigil_expr::SimpleExpressionEvaluator;
use vigil_registry::{parse_json_document, parse_toml_document, InMemorySchemaSource, SchemaRegistry};

use crate::model::{Address, UserRequest};

pub const USER_REQUEST_SCHEMA: &str = "user_request_validation";
pub const USER_PROFILE_SCHEMA: &str = "user_profile";

const USER_REQUEST_SCHEMA_JSON: &str = include_str!("../schemas/user_request_validation.json");
const USER_PROFILE_SCHEMA_TOML: &str = include_str!("../schemas/user_profile.toml");

// ── Schemas ──────────────────────────────────────────────────────────────────

/// Every reference schema, parsed from the embedded documents.
pub fn reference_schemas() -> VigilResult<Vec<Schema>> {
    let mut schemas = parse_json_document(USER_REQUEST_SCHEMA_JSON)?;
    schemas.extend(parse_toml_document(USER_PROFILE_SCHEMA_TOML)?);
    Ok(schemas)
}

/// A registry loaded with the reference schemas.
pub fn reference_registry() -> VigilResult<SchemaRegistry> {
    SchemaRegistry::load(InMemorySchemaSource::new(reference_schemas()?))
}

/// An engine over `registry` using the built-in condition language.
pub fn reference_engine(registry: Arc<SchemaRegistry>) -> ValidationEngine {
    ValidationEngine::new(registry, Arc::new(SimpleExpressionEvaluator::new()))
}

// ── Sample requests ──────────────────────────────────────────────────────────

/// A complete, valid US request.
pub fn valid_us_request() -> UserRequest {
    UserRequest {
        user_type: Some("BASIC".to_string()),
        country: Some("US".to_string()),
        address: Some(Address {
            line1: Some("100 Congress Ave".to_string()),
            line2: Some("Suite 200".to_string()),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
        }),
        ..UserRequest::named("jdoe")
    }
}

/// A premium user that has not supplied tax details.
pub fn premium_without_tax_details() -> UserRequest {
    UserRequest {
        user_type: Some("PREMIUM".to_string()),
        ..valid_us_request()
    }
}

/// A request with only the CVV of the three payment fields.
pub fn cvv_only_payment() -> UserRequest {
    UserRequest {
        cvv: Some("123".to_string()),
        ..valid_us_request()
    }
}

/// A US request whose address has no city.
pub fn us_request_missing_city() -> UserRequest {
    let mut request = valid_us_request();
    if let Some(address) = request.address.as_mut() {
        address.city = None;
    }
    request
}

#[cfg(test)]
mod tests {
    use vigil_contracts::rule::FieldType;
    use vigil_core::FieldAccess;

    use super::*;

    #[test]
    fn embedded_documents_parse() {
        let schemas = reference_schemas().unwrap();
        let names: Vec<&str> = schemas.iter().map(|s| s.schema_name.as_str()).collect();
        assert_eq!(names, vec![USER_REQUEST_SCHEMA, USER_PROFILE_SCHEMA]);

        let request_schema = &schemas[0];
        assert_eq!(request_schema.rules.len(), 8);
        assert_eq!(
            request_schema.rule("commentDate").and_then(|r| r.field_type),
            Some(FieldType::DateTime)
        );
    }

    #[test]
    fn samples_differ_only_where_intended() {
        assert_eq!(us_request_missing_city().get_path("address.city"), None);
        assert_eq!(premium_without_tax_details().tax_id, None);
        assert_eq!(cvv_only_payment().credit_card_number, None);
    }

    #[test]
    fn valid_request_passes_both_layers() {
        let engine = reference_engine(Arc::new(reference_registry().unwrap()));
        let violations = engine.validate_with_declared(&valid_us_request(), USER_REQUEST_SCHEMA);
        assert!(violations.is_empty(), "expected no violations, got {violations:?}");
    }
}
