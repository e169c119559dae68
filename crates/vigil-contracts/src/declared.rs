//! Cross-field rules declared alongside a validated type.
//!
//! Unlike schema `Rule`s, which are loaded at runtime and looked up by name,
//! a type's `FieldValidation`s form a fixed list known when the type is
//! written. All three variants express "this field is required when ...".

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Message used when a declaration does not provide its own.
pub const DEFAULT_FIELD_VALIDATION_MESSAGE: &str = "Field validation failed";

/// A declared cross-field requirement on `field`.
///
/// Example in JSON:
/// ```json
/// { "type": "DEPENDS_ON_VALUE", "field": "taxId", "dependsOnField": "userType",
///   "triggerValues": ["PREMIUM", "BUSINESS"], "message": "Tax ID is required" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldValidation {
    /// Required when `depends_on_field`'s string form is one of `trigger_values`.
    #[serde(rename_all = "camelCase")]
    DependsOnValue {
        field: String,
        depends_on_field: String,
        trigger_values: BTreeSet<String>,
        #[serde(default = "default_message")]
        message: String,
    },

    /// Required when `depends_on_presence_of` is populated.
    #[serde(rename_all = "camelCase")]
    DependsOnPresence {
        field: String,
        depends_on_presence_of: String,
        #[serde(default = "default_message")]
        message: String,
    },

    /// Required when any of `group_fields` is populated.
    ///
    /// Declared on every member of the group, each naming the others, so the
    /// violation lands on whichever member is missing.
    #[serde(rename_all = "camelCase")]
    DependsOnGroup {
        field: String,
        group_fields: Vec<String>,
        #[serde(default = "default_message")]
        message: String,
    },
}

fn default_message() -> String {
    DEFAULT_FIELD_VALIDATION_MESSAGE.to_string()
}

impl FieldValidation {
    pub fn depends_on_value<I, S>(field: impl Into<String>, depends_on_field: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValidation::DependsOnValue {
            field: field.into(),
            depends_on_field: depends_on_field.into(),
            trigger_values: triggers.into_iter().map(Into::into).collect(),
            message: default_message(),
        }
    }

    pub fn depends_on_presence(field: impl Into<String>, depends_on_presence_of: impl Into<String>) -> Self {
        FieldValidation::DependsOnPresence {
            field: field.into(),
            depends_on_presence_of: depends_on_presence_of.into(),
            message: default_message(),
        }
    }

    pub fn depends_on_group<I, S>(field: impl Into<String>, group_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValidation::DependsOnGroup {
            field: field.into(),
            group_fields: group_fields.into_iter().map(Into::into).collect(),
            message: default_message(),
        }
    }

    /// Expand one group definition into the symmetric per-member declarations.
    ///
    /// Each member gets a `DependsOnGroup` naming every other member, with the
    /// message produced by `message_for(member)`.
    pub fn group(members: &[&str], message_for: impl Fn(&str) -> String) -> Vec<Self> {
        members
            .iter()
            .map(|member| FieldValidation::DependsOnGroup {
                field: member.to_string(),
                group_fields: members
                    .iter()
                    .filter(|other| *other != member)
                    .map(|other| other.to_string())
                    .collect(),
                message: message_for(member),
            })
            .collect()
    }

    pub fn with_message(mut self, new_message: impl Into<String>) -> Self {
        match &mut self {
            FieldValidation::DependsOnValue { message, .. }
            | FieldValidation::DependsOnPresence { message, .. }
            | FieldValidation::DependsOnGroup { message, .. } => *message = new_message.into(),
        }
        self
    }

    /// The field this declaration makes conditionally required.
    pub fn field(&self) -> &str {
        match self {
            FieldValidation::DependsOnValue { field, .. }
            | FieldValidation::DependsOnPresence { field, .. }
            | FieldValidation::DependsOnGroup { field, .. } => field,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            FieldValidation::DependsOnValue { message, .. }
            | FieldValidation::DependsOnPresence { message, .. }
            | FieldValidation::DependsOnGroup { message, .. } => message,
        }
    }
}
