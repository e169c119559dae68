//! Per-field rule definitions loaded from schema documents.
//!
//! A `Rule` is pure data: whether the field is required (always, never, or
//! when a condition holds), what semantic type its value must have, and which
//! auxiliary constraints apply. Field names match the stored wire format
//! (`requirementType`, `fieldType`, `typeValidationParams`, ...).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Constraint name to raw constraint value, e.g. `{"maxLength": 2}`.
///
/// Values stay untyped until the type validator reads them, so a malformed
/// value (`"min": "abc"`) can be stored and only fails its own check.
pub type TypeParams = BTreeMap<String, serde_json::Value>;

/// Semantic type a field value must conform to.
///
/// Serialized in SCREAMING_SNAKE_CASE; the date kinds also accept the short
/// aliases `DATE`, `DATE_TIME` and `ZONED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    String,
    Int32,
    Int64,
    Decimal,
    Boolean,
    #[serde(rename = "LOCAL_DATE", alias = "DATE")]
    Date,
    #[serde(rename = "LOCAL_DATE_TIME", alias = "DATE_TIME")]
    DateTime,
    #[serde(alias = "ZONED")]
    ZonedDateTime,
    Object,
    Array,
    Map,
    Email,
    Uuid,
    Phone,
    Url,
}

impl FieldType {
    /// The wire name, e.g. `INT32` or `LOCAL_DATE_TIME`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "STRING",
            FieldType::Int32 => "INT32",
            FieldType::Int64 => "INT64",
            FieldType::Decimal => "DECIMAL",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Date => "LOCAL_DATE",
            FieldType::DateTime => "LOCAL_DATE_TIME",
            FieldType::ZonedDateTime => "ZONED_DATE_TIME",
            FieldType::Object => "OBJECT",
            FieldType::Array => "ARRAY",
            FieldType::Map => "MAP",
            FieldType::Email => "EMAIL",
            FieldType::Uuid => "UUID",
            FieldType::Phone => "PHONE",
            FieldType::Url => "URL",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field's required-ness is decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementType {
    /// Always required.
    Required,
    /// Required only when `Rule::condition` evaluates to true.
    Conditional,
    /// Never required, but the type is still checked when a value is present.
    #[default]
    Optional,
}

/// One field's validation rule within a `Schema`.
///
/// Example in JSON:
/// ```json
/// {
///   "requirementType": "CONDITIONAL",
///   "fieldType": "STRING",
///   "condition": "country == 'US'",
///   "errorMessage": "State is required for US addresses",
///   "typeValidationParams": { "maxLength": 2 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub requirement_type: RequirementType,

    /// Absent means the value's type is not checked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    /// Boolean expression evaluated against the root object. Only consulted
    /// when `requirement_type` is `Conditional`; empty means never required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Replaces both the "required" and the "invalid type" default messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub type_validation_params: TypeParams,
}

impl Rule {
    pub fn required() -> Self {
        Self {
            requirement_type: RequirementType::Required,
            ..Self::default()
        }
    }

    pub fn optional() -> Self {
        Self::default()
    }

    pub fn conditional(condition: impl Into<String>) -> Self {
        Self {
            requirement_type: RequirementType::Conditional,
            condition: Some(condition.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.type_validation_params.insert(name.into(), value.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.requirement_type == RequirementType::Required
    }

    pub fn is_conditional(&self) -> bool {
        self.requirement_type == RequirementType::Conditional
    }

    /// The condition, if this is a conditional rule with a non-blank expression.
    pub fn active_condition(&self) -> Option<&str> {
        if !self.is_conditional() {
            return None;
        }
        self.condition.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
