//! Validation violations and result surfaces.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// The field was required and empty.
    Required,
    /// The field's value did not conform to its declared type or constraints.
    InvalidType,
}

/// A single failed check, reported against one field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
    pub kind: ViolationKind,
    /// The populated field that made `field` required, for group rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

impl Violation {
    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ViolationKind::Required,
            trigger: None,
        }
    }

    pub fn invalid_type(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: ViolationKind::InvalidType,
            trigger: None,
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collapse a violation list into a field-path to message map.
///
/// When a field has several violations the last one wins.
pub fn violations_by_field(violations: &[Violation]) -> BTreeMap<String, String> {
    violations
        .iter()
        .map(|v| (v.field.clone(), v.message.clone()))
        .collect()
}
