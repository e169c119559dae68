//! Core trait definitions for the VIGIL validation pipeline.
//!
//! These traits are the seams between the engine and everything around it:
//!
//! - `FieldAccess`: how the engine reads (and writes) a validated object
//! - `DeclaredRules`: cross-field rules a type declares about itself
//! - `ExpressionEvaluator`: the pluggable condition language
//! - `SchemaSource`: where schemas are fetched from
//! - `SchemaProvider`: the compiled-schema lookup the engine is built on
//!
//! None of them assume reflection: typed structs implement `FieldAccess` with
//! hand-written accessors, and untyped payloads go through `Record`.

use std::sync::Arc;

use vigil_contracts::{
    declared::FieldValidation,
    error::VigilResult,
    schema::Schema,
    value::{FieldValue, Record},
};

use crate::{path, ruleset::RuleSet};

/// Property-level access to a validated object.
///
/// Implementors provide `property` / `set_property` for their top-level
/// properties. The provided `get_path` / `set_path` handle dotted paths by
/// descending into the `Map` or `Record` a property holds.
pub trait FieldAccess {
    /// The value of the top-level property `name`, or `None` when the object
    /// has no such property.
    fn property(&self, name: &str) -> Option<FieldValue>;

    /// Overwrite the top-level property `name`.
    ///
    /// Implementations return `VigilError::InvalidPath` for unknown names and
    /// `VigilError::Transform` when the value does not fit the property.
    fn set_property(&mut self, name: &str, value: FieldValue) -> VigilResult<()>;

    /// Resolve a dotted `path`. Missing segments and nulls resolve to `None`.
    fn get_path(&self, path: &str) -> Option<FieldValue> {
        let segs = path::segments(path);
        let (first, rest) = segs.split_first()?;
        let top = self.property(first)?;
        path::resolve_segments(&top, rest).cloned()
    }

    /// Write `value` at a dotted `path`, creating intermediate mappings.
    fn set_path(&mut self, path: &str, value: FieldValue) -> VigilResult<()> {
        let segs = path::checked_segments(path)?;
        match segs.split_first() {
            Some((first, [])) => self.set_property(first, value),
            Some((first, rest)) => {
                let mut top = self.property(first).unwrap_or(FieldValue::Null);
                path::set_in_value(&mut top, rest, value);
                self.set_property(first, top)
            }
            None => Ok(()),
        }
    }

    /// Apply a batch of `(path, value)` updates in order, stopping at the
    /// first failure.
    fn apply_updates(&mut self, updates: &Record) -> VigilResult<()> {
        for (path, value) in updates.iter() {
            self.set_path(path, value.clone())?;
        }
        Ok(())
    }
}

impl FieldAccess for Record {
    fn property(&self, name: &str) -> Option<FieldValue> {
        Record::get(self, name).cloned()
    }

    fn set_property(&mut self, name: &str, value: FieldValue) -> VigilResult<()> {
        self.insert(name, value);
        Ok(())
    }

    fn get_path(&self, path: &str) -> Option<FieldValue> {
        path::resolve_record(self, path).cloned()
    }

    fn set_path(&mut self, path: &str, value: FieldValue) -> VigilResult<()> {
        path::set_nested_value(self, path, value)
    }
}

/// A type that carries a fixed list of cross-field requirements.
///
/// The list is part of the type's definition, not looked up at runtime:
///
/// ```rust,ignore
/// impl DeclaredRules for UserRequest {
///     fn field_validations() -> Vec<FieldValidation> {
///         vec![FieldValidation::depends_on_presence("shippingCity", "shippingAddress")]
///     }
/// }
/// ```
pub trait DeclaredRules: FieldAccess {
    fn field_validations() -> Vec<FieldValidation>
    where
        Self: Sized;
}

/// Evaluates a boolean condition expression against a root object.
///
/// Implementations must never fail: any parse or evaluation problem yields
/// `false`, so a broken condition never makes a field required. Evaluation
/// must be bounded and side-effect free; it runs inline on the caller's thread.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, context: &dyn FieldAccess) -> bool;
}

/// An evaluator that treats every condition as false.
///
/// Useful when only unconditional rules are in play.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverEvaluator;

impl ExpressionEvaluator for NeverEvaluator {
    fn evaluate(&self, _expression: &str, _context: &dyn FieldAccess) -> bool {
        false
    }
}

/// Where schemas come from: a database, a directory of documents, a test fixture.
///
/// Both calls may block; they are only made at start-up and on explicit refresh.
pub trait SchemaSource: Send + Sync {
    /// Fetch every schema the source knows about.
    fn fetch_all(&self) -> VigilResult<Vec<Schema>>;

    /// Fetch one schema by name, `Ok(None)` when it does not exist.
    fn fetch_by_name(&self, name: &str) -> VigilResult<Option<Schema>>;
}

impl<S: SchemaSource + ?Sized> SchemaSource for Arc<S> {
    fn fetch_all(&self) -> VigilResult<Vec<Schema>> {
        (**self).fetch_all()
    }

    fn fetch_by_name(&self, name: &str) -> VigilResult<Option<Schema>> {
        (**self).fetch_by_name(name)
    }
}

/// Lookup of compiled rule sets by schema name.
///
/// The registry implements this; tests can substitute a fixed map.
pub trait SchemaProvider: Send + Sync {
    /// The compiled rules for `schema_name`, or `None` when it is unknown.
    fn rule_set(&self, schema_name: &str) -> Option<Arc<RuleSet>>;
}
