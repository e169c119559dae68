//! The validation engine.
//!
//! `ValidationEngine` looks up a schema's compiled `RuleSet` through its
//! `SchemaProvider`, builds a fresh `ValidationContext` for the call and
//! collects every violation. Validation never stops at the first failure:
//! callers get the complete list in one pass.
//!
//! An unknown schema name is not an error. It means "no rules to apply" and
//! yields an empty list, logged at `warn` so the gap is visible.

use std::sync::Arc;

use tracing::{debug, warn};

use vigil_contracts::{
    error::{VigilError, VigilResult},
    violation::Violation,
};

use crate::{
    context::ValidationContext,
    ruleset::{CompiledRule, RuleSet},
    traits::{DeclaredRules, ExpressionEvaluator, FieldAccess, SchemaProvider},
};

/// Validates objects against registry schemas and declared rules.
///
/// Cheap to clone; every clone shares the same provider and evaluator.
#[derive(Clone)]
pub struct ValidationEngine {
    schemas: Arc<dyn SchemaProvider>,
    evaluator: Arc<dyn ExpressionEvaluator>,
}

impl ValidationEngine {
    pub fn new(schemas: Arc<dyn SchemaProvider>, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        Self { schemas, evaluator }
    }

    /// Validate `object` against `schema_name`.
    ///
    /// With `field_names`, only rules for those paths are checked (PATCH-style
    /// updates); otherwise every rule in the schema is.
    pub fn validate(
        &self,
        object: &dyn FieldAccess,
        schema_name: &str,
        field_names: Option<&[&str]>,
    ) -> Vec<Violation> {
        let Some(rules) = self.schemas.rule_set(schema_name) else {
            warn!(schema = %schema_name, "unknown schema; no rules applied");
            return Vec::new();
        };
        let violations = match field_names {
            Some(fields) => self.run(object, rules.for_fields(fields)),
            None => self.run(object, rules.iter()),
        };
        debug!(
            schema = %schema_name,
            violations = violations.len(),
            "schema validation complete"
        );
        violations
    }

    /// Validate only `field_names` of `object` against `schema_name`.
    pub fn validate_fields(
        &self,
        object: &dyn FieldAccess,
        schema_name: &str,
        field_names: &[&str],
    ) -> Vec<Violation> {
        self.validate(object, schema_name, Some(field_names))
    }

    /// Like `validate`, but a non-empty result becomes
    /// `VigilError::ValidationFailed` carrying every violation.
    pub fn validate_and_throw(
        &self,
        object: &dyn FieldAccess,
        schema_name: &str,
        field_names: Option<&[&str]>,
    ) -> VigilResult<()> {
        into_result(self.validate(object, schema_name, field_names))
    }

    /// Validate `object` against an already-compiled rule set.
    pub fn validate_rule_set(&self, object: &dyn FieldAccess, rules: &RuleSet) -> Vec<Violation> {
        self.run(object, rules.iter())
    }

    /// Validate `object` against the rules its type declares.
    pub fn validate_declared<T: DeclaredRules>(&self, object: &T) -> Vec<Violation> {
        let rules = RuleSet::from_declared(&T::field_validations());
        self.run(object, rules.iter())
    }

    /// Declared rules first, then the rules of `schema_name`.
    ///
    /// An unknown schema contributes nothing; the declared rules still run.
    pub fn validate_with_declared<T: DeclaredRules>(&self, object: &T, schema_name: &str) -> Vec<Violation> {
        let mut violations = self.validate_declared(object);
        violations.extend(self.validate(object, schema_name, None));
        violations
    }

    fn run<'r>(
        &self,
        object: &dyn FieldAccess,
        rules: impl Iterator<Item = &'r CompiledRule>,
    ) -> Vec<Violation> {
        let ctx = ValidationContext::new(object, self.evaluator.as_ref());
        rules.filter_map(|rule| ctx.check_rule(rule)).collect()
    }
}

/// `Ok(())` for an empty list, `ValidationFailed` otherwise.
pub fn into_result(violations: Vec<Violation>) -> VigilResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(VigilError::ValidationFailed { violations })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
