//! The unified rule representation the engine evaluates.
//!
//! Two kinds of input compile into a `RuleSet`:
//!
//! - schema `Rule`s, loaded at runtime and keyed by field path, and
//! - declared `FieldValidation`s, fixed per validated type.
//!
//! Both become `CompiledRule`s with a `Requirement` that says when the field
//! must be filled, plus an optional type check. Misconfigured declarations
//! (no trigger values, an empty group, ...) compile to `Requirement::Never`
//! so they can never block a request.

use std::collections::BTreeSet;

use tracing::debug;

use vigil_contracts::{
    declared::FieldValidation,
    rule::{FieldType, RequirementType, Rule},
    schema::Schema,
};

use crate::types::Constraints;

/// Message for a required field that is empty and has no custom message.
pub const DEFAULT_REQUIRED_MESSAGE: &str = "Field is required";

/// When a field must be populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Always,
    Never,
    /// An external condition expression evaluated against the root object.
    Condition(String),
    /// `depends_on`'s string form is one of `trigger_values`.
    ValueIn {
        depends_on: String,
        trigger_values: BTreeSet<String>,
    },
    /// `depends_on` is populated.
    PresenceOf { depends_on: String },
    /// Any member of `group` is populated.
    AnyOf { group: Vec<String> },
}

/// Where a compiled rule came from; used for log context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOrigin {
    Schema(String),
    Declared,
}

/// One field's requirement and type check, ready to evaluate.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub field: String,
    pub requirement: Requirement,
    pub field_type: Option<FieldType>,
    pub constraints: Constraints,
    /// Custom message replacing the required / invalid-type defaults.
    pub message: Option<String>,
    pub origin: RuleOrigin,
}

impl CompiledRule {
    /// Compile one schema rule for `field`.
    pub fn from_rule(schema_name: &str, field: &str, rule: &Rule) -> Self {
        let requirement = match rule.requirement_type {
            RequirementType::Required => Requirement::Always,
            RequirementType::Optional => Requirement::Never,
            RequirementType::Conditional => match rule.active_condition() {
                Some(condition) => Requirement::Condition(condition.to_string()),
                None => {
                    debug!(schema = %schema_name, %field, "conditional rule without condition is never required");
                    Requirement::Never
                }
            },
        };
        Self {
            field: field.to_string(),
            requirement,
            field_type: rule.field_type,
            constraints: Constraints::from_params(&rule.type_validation_params),
            message: rule.error_message.clone(),
            origin: RuleOrigin::Schema(schema_name.to_string()),
        }
    }

    /// Compile one declared cross-field rule. Declared rules never carry a
    /// type check.
    pub fn from_declared(validation: &FieldValidation) -> Self {
        let requirement = match validation {
            FieldValidation::DependsOnValue {
                depends_on_field,
                trigger_values,
                ..
            } if !depends_on_field.trim().is_empty() && !trigger_values.is_empty() => Requirement::ValueIn {
                depends_on: depends_on_field.clone(),
                trigger_values: trigger_values.clone(),
            },
            FieldValidation::DependsOnPresence {
                depends_on_presence_of,
                ..
            } if !depends_on_presence_of.trim().is_empty() => Requirement::PresenceOf {
                depends_on: depends_on_presence_of.clone(),
            },
            FieldValidation::DependsOnGroup { group_fields, .. } if !group_fields.is_empty() => {
                Requirement::AnyOf {
                    group: group_fields.clone(),
                }
            }
            misconfigured => {
                debug!(field = %misconfigured.field(), "incomplete declared rule is always satisfied");
                Requirement::Never
            }
        };
        Self {
            field: validation.field().to_string(),
            requirement,
            field_type: None,
            constraints: Constraints::default(),
            message: Some(validation.message().to_string()),
            origin: RuleOrigin::Declared,
        }
    }

    /// The message for an empty required field.
    pub fn required_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| DEFAULT_REQUIRED_MESSAGE.to_string())
    }

    /// The message for a value that fails `field_type`.
    pub fn type_message(&self, field_type: FieldType) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| format!("Invalid type. Expected: {field_type}"))
    }
}

/// An ordered list of compiled rules.
///
/// Order is evaluation order, and therefore violation order: schema rules
/// follow the schema's path order, declared rules their declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            rules: schema
                .rules
                .iter()
                .map(|(field, rule)| CompiledRule::from_rule(&schema.schema_name, field, rule))
                .collect(),
        }
    }

    pub fn from_declared(validations: &[FieldValidation]) -> Self {
        Self {
            rules: validations.iter().map(CompiledRule::from_declared).collect(),
        }
    }

    /// Append every rule of `other` after this set's rules.
    pub fn extend(&mut self, other: &RuleSet) {
        self.rules.extend(other.rules.iter().cloned());
    }

    pub fn push(&mut self, rule: CompiledRule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    /// Rules whose field is in `fields`, in rule-set order.
    pub fn for_fields<'a>(&'a self, fields: &'a [&'a str]) -> impl Iterator<Item = &'a CompiledRule> + 'a {
        self.rules
            .iter()
            .filter(move |rule| fields.contains(&rule.field.as_str()))
    }

    /// All rules for exactly `field`.
    pub fn rules_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a CompiledRule> + 'a {
        self.rules.iter().filter(move |rule| rule.field == field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
