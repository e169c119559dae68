//! Typed request models with hand-written field accessors.
//!
//! Property names are the camelCase names used on the wire and in schema
//! documents. Every property is optional so a partially filled request can
//! be represented and validated.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use vigil_contracts::{
    declared::FieldValidation,
    error::{VigilError, VigilResult},
    value::{FieldValue, Record},
};
use vigil_core::{DeclaredRules, FieldAccess};

// ── Accessor helpers ─────────────────────────────────────────────────────────

fn text(slot: &Option<String>) -> Option<FieldValue> {
    slot.clone().map(FieldValue::String)
}

fn set_text(slot: &mut Option<String>, name: &str, value: FieldValue) -> VigilResult<()> {
    *slot = match value {
        FieldValue::Null => None,
        FieldValue::String(s) => Some(s),
        other => return Err(mismatch(name, "a string", &other)),
    };
    Ok(())
}

fn unknown(name: &str) -> VigilError {
    VigilError::InvalidPath {
        path: name.to_string(),
        reason: "no such property".to_string(),
    }
}

fn mismatch(name: &str, expected: &str, found: &FieldValue) -> VigilError {
    VigilError::Transform {
        field: name.to_string(),
        reason: format!("expected {expected}, found '{found}'"),
    }
}

// ── Address ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl Address {
    /// The address as a `Record`, omitting unset properties.
    pub fn to_record(&self) -> Record {
        [
            ("line1", &self.line1),
            ("line2", &self.line2),
            ("city", &self.city),
            ("state", &self.state),
        ]
        .into_iter()
        .filter_map(|(name, slot)| text(slot).map(|v| (name.to_string(), v)))
        .collect()
    }

    /// Build an address from a `Map` or `Record` value. Unknown properties
    /// are rejected.
    pub fn from_value(name: &str, value: &FieldValue) -> VigilResult<Self> {
        let entries: Vec<(&String, &FieldValue)> = match value {
            FieldValue::Map(map) => map.iter().collect(),
            FieldValue::Record(record) => record.iter().collect(),
            other => return Err(mismatch(name, "an address object", other)),
        };
        let mut address = Address::default();
        for (property, v) in entries {
            address.set_property(property, v.clone())?;
        }
        Ok(address)
    }
}

impl FieldAccess for Address {
    fn property(&self, name: &str) -> Option<FieldValue> {
        match name {
            "line1" => text(&self.line1),
            "line2" => text(&self.line2),
            "city" => text(&self.city),
            "state" => text(&self.state),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: FieldValue) -> VigilResult<()> {
        match name {
            "line1" => set_text(&mut self.line1, name, value),
            "line2" => set_text(&mut self.line2, name, value),
            "city" => set_text(&mut self.city, name, value),
            "state" => set_text(&mut self.state, name, value),
            _ => Err(unknown(name)),
        }
    }
}

// ── UserRequest ──────────────────────────────────────────────────────────────

/// A user sign-up or update request.
///
/// Carries two layers of rules: the cross-field rules it declares itself
/// (`DeclaredRules`) and whatever the `user_request_validation` schema in the
/// registry says about its country, address and comment fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: Option<String>,

    pub user_type: Option<String>,
    pub tax_id: Option<String>,
    pub company_name: Option<String>,

    pub shipping_address: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_zip_code: Option<String>,

    pub credit_card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,

    pub country: Option<String>,
    pub address: Option<Address>,
    pub comment: Option<String>,
    pub comment_date: Option<NaiveDateTime>,
    pub comment_by: Option<String>,
}

impl UserRequest {
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Self::default()
        }
    }
}

impl FieldAccess for UserRequest {
    fn property(&self, name: &str) -> Option<FieldValue> {
        match name {
            "username" => text(&self.username),
            "userType" => text(&self.user_type),
            "taxId" => text(&self.tax_id),
            "companyName" => text(&self.company_name),
            "shippingAddress" => text(&self.shipping_address),
            "shippingCity" => text(&self.shipping_city),
            "shippingZipCode" => text(&self.shipping_zip_code),
            "creditCardNumber" => text(&self.credit_card_number),
            "expiryDate" => text(&self.expiry_date),
            "cvv" => text(&self.cvv),
            "country" => text(&self.country),
            "address" => self.address.as_ref().map(|a| FieldValue::Record(a.to_record())),
            "comment" => text(&self.comment),
            "commentDate" => self.comment_date.map(FieldValue::DateTime),
            "commentBy" => text(&self.comment_by),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: FieldValue) -> VigilResult<()> {
        match name {
            "username" => set_text(&mut self.username, name, value),
            "userType" => set_text(&mut self.user_type, name, value),
            "taxId" => set_text(&mut self.tax_id, name, value),
            "companyName" => set_text(&mut self.company_name, name, value),
            "shippingAddress" => set_text(&mut self.shipping_address, name, value),
            "shippingCity" => set_text(&mut self.shipping_city, name, value),
            "shippingZipCode" => set_text(&mut self.shipping_zip_code, name, value),
            "creditCardNumber" => set_text(&mut self.credit_card_number, name, value),
            "expiryDate" => set_text(&mut self.expiry_date, name, value),
            "cvv" => set_text(&mut self.cvv, name, value),
            "country" => set_text(&mut self.country, name, value),
            "comment" => set_text(&mut self.comment, name, value),
            "commentBy" => set_text(&mut self.comment_by, name, value),
            "address" => {
                self.address = match value {
                    FieldValue::Null => None,
                    other => Some(Address::from_value(name, &other)?),
                };
                Ok(())
            }
            "commentDate" => {
                self.comment_date = match value {
                    FieldValue::Null => None,
                    FieldValue::DateTime(dt) => Some(dt),
                    other => return Err(mismatch(name, "a local date-time", &other)),
                };
                Ok(())
            }
            _ => Err(unknown(name)),
        }
    }
}

impl DeclaredRules for UserRequest {
    fn field_validations() -> Vec<FieldValidation> {
        let mut rules = vec![
            FieldValidation::depends_on_value("taxId", "userType", ["PREMIUM", "BUSINESS"])
                .with_message("Tax ID is required for Premium and Business users"),
            FieldValidation::depends_on_value("companyName", "userType", ["PREMIUM", "BUSINESS"])
                .with_message("Company Name is required for Premium and Business users"),
            FieldValidation::depends_on_presence("shippingCity", "shippingAddress")
                .with_message("City is required when Shipping Address is provided"),
            FieldValidation::depends_on_presence("shippingZipCode", "shippingAddress")
                .with_message("Zip Code is required when Shipping Address is provided"),
        ];
        rules.extend(FieldValidation::group(
            &["creditCardNumber", "expiryDate", "cvv"],
            |member| {
                let label = match member {
                    "creditCardNumber" => "credit card number",
                    "expiryDate" => "expiry date",
                    _ => "CVV",
                };
                format!("All payment fields must be filled if {label} is provided")
            },
        ));
        rules
    }
}

// ── UserProfile ──────────────────────────────────────────────────────────────

/// A stored profile; validated against the `user_profile` schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl FieldAccess for UserProfile {
    fn property(&self, name: &str) -> Option<FieldValue> {
        match name {
            "username" => text(&self.username),
            "age" => self.age.map(FieldValue::Int),
            "email" => text(&self.email),
            "website" => text(&self.website),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: FieldValue) -> VigilResult<()> {
        match name {
            "username" => set_text(&mut self.username, name, value),
            "email" => set_text(&mut self.email, name, value),
            "website" => set_text(&mut self.website, name, value),
            "age" => {
                self.age = match value {
                    FieldValue::Null => None,
                    FieldValue::Int(i) => Some(i),
                    other => return Err(mismatch(name, "an integer", &other)),
                };
                Ok(())
            }
            _ => Err(unknown(name)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
