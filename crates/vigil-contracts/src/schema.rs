//! Named schemas: the unit the registry caches and refreshes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rule::Rule;

/// A named collection of per-field rules.
///
/// Keys are dotted field paths (`"address.city"`). A schema is immutable once
/// loaded; the registry replaces it wholesale on refresh. Rules are kept in a
/// `BTreeMap` so iteration order, and therefore violation order, is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub schema_name: String,
    #[serde(default)]
    pub rules: BTreeMap<String, Rule>,
}

impl Schema {
    pub fn new(schema_name: impl Into<String>) -> Self {
        Self {
            schema_name: schema_name.into(),
            rules: BTreeMap::new(),
        }
    }

    /// Builder-style rule insert; a second rule for the same path replaces the first.
    pub fn with_rule(mut self, field_path: impl Into<String>, rule: Rule) -> Self {
        self.rules.insert(field_path.into(), rule);
        self
    }

    pub fn rule(&self, field_path: &str) -> Option<&Rule> {
        self.rules.get(field_path)
    }

    pub fn field_paths(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
