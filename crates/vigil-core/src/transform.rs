//! Schema-based input transformer.
//!
//! Converts a loosely typed input `Record` (usually straight from JSON) into
//! one whose values carry the types the validator expects: integers from
//! numeric strings, dates from ISO strings, nested objects as `Record`s.
//!
//! Each property definition names the input key it reads (`name`, defaulting
//! to the property's own key), the target `type`, and optionally a
//! `fieldMapping` path the converted value is also copied to. Absent and
//! null inputs are skipped; values that cannot be converted are errors.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    value::{FieldValue, Record},
};

use crate::path;

/// Target type of a transformed property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    String,
    Int32,
    Int64,
    Decimal,
    Boolean,
    LocalDate,
    LocalDateTime,
    ZonedDateTime,
    #[serde(alias = "array")]
    Array,
    #[serde(alias = "object")]
    Object,
    /// Copied through unchanged.
    #[default]
    Any,
}

/// How one output property is produced from the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDef {
    /// Input key; the property's own key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: PropertyKind,
    /// Extra dotted path the converted value is written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_mapping: Option<String>,
    /// Element type for `Array` properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<PropertyKind>,
    /// Nested definitions for `Object` properties and arrays of objects.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyDef>,
}

impl PropertyDef {
    pub fn of(kind: PropertyKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn reading(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mapped_to(mut self, path: impl Into<String>) -> Self {
        self.field_mapping = Some(path.into());
        self
    }

    pub fn items(mut self, value_type: PropertyKind) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.insert(key.into(), def);
        self
    }
}

/// The property definitions a `transform` call applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDef>,
}

impl TransformSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, key: impl Into<String>, def: PropertyDef) -> Self {
        self.properties.insert(key.into(), def);
        self
    }
}

/// Convert `input` according to `schema`.
///
/// Only defined properties appear in the output.
pub fn transform(input: &Record, schema: &TransformSchema) -> VigilResult<Record> {
    transform_object(|key| input.get(key), &schema.properties, "")
}

fn transform_object<'v>(
    lookup: impl Fn(&str) -> Option<&'v FieldValue>,
    properties: &BTreeMap<String, PropertyDef>,
    prefix: &str,
) -> VigilResult<Record> {
    let mut out = Record::new();
    for (key, def) in properties {
        let source_key = def.name.as_deref().unwrap_or(key);
        let field = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        let Some(raw) = lookup(source_key).filter(|v| !v.is_null()) else {
            continue;
        };
        let value = convert(raw, def, &field)?;
        out.insert(key.as_str(), value.clone());
        // Mapping runs after the insert; it may target a path below `key`.
        if let Some(mapping) = &def.field_mapping {
            debug!(%field, %mapping, "copying transformed value");
            path::set_nested_value(&mut out, mapping, value)?;
        }
    }
    Ok(out)
}

fn convert(raw: &FieldValue, def: &PropertyDef, field: &str) -> VigilResult<FieldValue> {
    match def.kind {
        PropertyKind::Array => {
            let FieldValue::List(items) = raw else {
                return Err(mismatch(field, "an array", raw));
            };
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let item_field = format!("{field}[{i}]");
                    match def.value_type {
                        Some(PropertyKind::Object) => convert_object(item, &def.properties, &item_field),
                        Some(kind) => coerce(item, kind, &item_field),
                        None => Ok(item.clone()),
                    }
                })
                .collect::<VigilResult<Vec<_>>>()
                .map(FieldValue::List)
        }
        PropertyKind::Object => convert_object(raw, &def.properties, field),
        kind => coerce(raw, kind, field),
    }
}

fn convert_object(
    raw: &FieldValue,
    properties: &BTreeMap<String, PropertyDef>,
    field: &str,
) -> VigilResult<FieldValue> {
    if !matches!(raw, FieldValue::Map(_) | FieldValue::Record(_)) {
        return Err(mismatch(field, "an object", raw));
    }
    if properties.is_empty() {
        return Ok(raw.clone());
    }
    transform_object(|key| raw.child(key), properties, field).map(FieldValue::Record)
}

/// Convert a scalar to `kind`. Nulls inside arrays stay null.
fn coerce(raw: &FieldValue, kind: PropertyKind, field: &str) -> VigilResult<FieldValue> {
    if raw.is_null() {
        return Ok(FieldValue::Null);
    }
    let converted = match (kind, raw) {
        (PropertyKind::Any, v) => Some(v.clone()),
        (PropertyKind::String, FieldValue::List(_) | FieldValue::Map(_) | FieldValue::Record(_)) => None,
        (PropertyKind::String, v) => Some(FieldValue::String(v.to_string())),

        (PropertyKind::Int32, v) => integer(v)
            .filter(|i| i32::try_from(*i).is_ok())
            .map(FieldValue::Int),
        (PropertyKind::Int64, v) => integer(v).map(FieldValue::Int),

        (PropertyKind::Decimal, FieldValue::Int(i)) => Some(FieldValue::Float(*i as f64)),
        (PropertyKind::Decimal, FieldValue::Float(f)) => Some(FieldValue::Float(*f)),
        (PropertyKind::Decimal, FieldValue::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(FieldValue::Float),

        (PropertyKind::Boolean, FieldValue::Bool(b)) => Some(FieldValue::Bool(*b)),
        (PropertyKind::Boolean, FieldValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(FieldValue::Bool(true)),
            "false" => Some(FieldValue::Bool(false)),
            _ => None,
        },

        (PropertyKind::LocalDate, FieldValue::Date(d)) => Some(FieldValue::Date(*d)),
        (PropertyKind::LocalDate, FieldValue::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .ok()
            .map(FieldValue::Date),

        (PropertyKind::LocalDateTime, FieldValue::DateTime(dt)) => Some(FieldValue::DateTime(*dt)),
        (PropertyKind::LocalDateTime, FieldValue::String(s)) => {
            s.trim().parse::<NaiveDateTime>().ok().map(FieldValue::DateTime)
        }

        (PropertyKind::ZonedDateTime, FieldValue::ZonedDateTime(dt)) => Some(FieldValue::ZonedDateTime(*dt)),
        (PropertyKind::ZonedDateTime, FieldValue::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(FieldValue::ZonedDateTime),

        _ => None,
    };
    converted.ok_or_else(|| VigilError::Transform {
        field: field.to_string(),
        reason: format!("cannot convert '{raw}' to {kind:?}"),
    })
}

fn integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Int(i) => Some(*i),
        FieldValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.2e18 => Some(*f as i64),
        FieldValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn mismatch(field: &str, expected: &str, found: &FieldValue) -> VigilError {
    VigilError::Transform {
        field: field.to_string(),
        reason: format!("expected {expected}, found '{found}'"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> Record {
        Record::from_json(value).unwrap()
    }

    #[test]
    fn coerces_scalars() {
        let schema = TransformSchema::new()
            .with_property("name", PropertyDef::of(PropertyKind::String))
            .with_property("age", PropertyDef::of(PropertyKind::Int32))
            .with_property("score", PropertyDef::of(PropertyKind::Decimal))
            .with_property("active", PropertyDef::of(PropertyKind::Boolean))
            .with_property("born", PropertyDef::of(PropertyKind::LocalDate))
            .with_property("seen", PropertyDef::of(PropertyKind::LocalDateTime))
            .with_property("at", PropertyDef::of(PropertyKind::ZonedDateTime));

        let out = transform(
            &record(json!({
                "name": 42,
                "age": "37",
                "score": "9.5",
                "active": "TRUE",
                "born": "1990-04-01",
                "seen": "2024-01-02T03:04:05",
                "at": "2024-01-02T03:04:05+02:00",
                "ignored": "x"
            })),
            &schema,
        )
        .unwrap();

        assert_eq!(out.get("name"), Some(&FieldValue::from("42")));
        assert_eq!(out.get("age"), Some(&FieldValue::Int(37)));
        assert_eq!(out.get("score"), Some(&FieldValue::Float(9.5)));
        assert_eq!(out.get("active"), Some(&FieldValue::Bool(true)));
        match out.get("born") {
            Some(FieldValue::Date(d)) => assert_eq!(d.year(), 1990),
            other => panic!("expected Date, got {other:?}"),
        }
        assert!(matches!(out.get("seen"), Some(FieldValue::DateTime(_))));
        assert!(matches!(out.get("at"), Some(FieldValue::ZonedDateTime(_))));
        assert!(out.get("ignored").is_none(), "undefined properties must be dropped");
    }

    #[test]
    fn absent_and_null_inputs_are_skipped() {
        let schema = TransformSchema::new()
            .with_property("a", PropertyDef::of(PropertyKind::Int32))
            .with_property("b", PropertyDef::of(PropertyKind::Int32));
        let out = transform(&record(json!({ "a": null })), &schema).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn reads_renamed_input_and_copies_to_mapping() {
        let schema = TransformSchema::new().with_property(
            "city",
            PropertyDef::of(PropertyKind::String)
                .reading("town")
                .mapped_to("$.address.city"),
        );
        let out = transform(&record(json!({ "town": "Porto" })), &schema).unwrap();
        assert_eq!(
            out.to_json(),
            json!({ "city": "Porto", "address": { "city": "Porto" } })
        );
    }

    #[test]
    fn mapping_below_own_key_is_kept() {
        let schema = TransformSchema::new().with_property(
            "meta",
            PropertyDef::of(PropertyKind::Object).mapped_to("meta.copy"),
        );
        let out = transform(&record(json!({ "meta": { "a": 1 } })), &schema).unwrap();
        assert_eq!(
            out.to_json(),
            json!({ "meta": { "a": 1, "copy": { "a": 1 } } })
        );
    }

    #[test]
    fn recurses_into_objects_and_arrays() {
        let line = PropertyDef::of(PropertyKind::Object).with_property("qty", PropertyDef::of(PropertyKind::Int64));
        let schema = TransformSchema::new()
            .with_property(
                "lines",
                PropertyDef::of(PropertyKind::Array)
                    .items(PropertyKind::Object)
                    .with_property("qty", PropertyDef::of(PropertyKind::Int64)),
            )
            .with_property("first", line)
            .with_property("codes", PropertyDef::of(PropertyKind::Array).items(PropertyKind::Int32));

        let out = transform(
            &record(json!({
                "lines": [{ "qty": "2", "sku": "x" }, { "qty": 3 }],
                "first": { "qty": "7" },
                "codes": ["1", 2]
            })),
            &schema,
        )
        .unwrap();

        assert_eq!(
            out.to_json(),
            json!({
                "lines": [{ "qty": 2 }, { "qty": 3 }],
                "first": { "qty": 7 },
                "codes": [1, 2]
            })
        );
    }

    #[test]
    fn unconvertible_values_name_the_field() {
        let schema = TransformSchema::new().with_property(
            "order",
            PropertyDef::of(PropertyKind::Object).with_property("qty", PropertyDef::of(PropertyKind::Int32)),
        );
        match transform(&record(json!({ "order": { "qty": "many" } })), &schema) {
            Err(VigilError::Transform { field, .. }) => assert_eq!(field, "order.qty"),
            other => panic!("expected Transform error, got {other:?}"),
        }

        let overflow = TransformSchema::new().with_property("n", PropertyDef::of(PropertyKind::Int32));
        assert!(transform(&record(json!({ "n": 3_000_000_000i64 })), &overflow).is_err());

        let not_a_list = TransformSchema::new().with_property("xs", PropertyDef::of(PropertyKind::Array));
        assert!(transform(&record(json!({ "xs": "a,b" })), &not_a_list).is_err());
    }

    #[test]
    fn property_defs_deserialize_from_json() {
        let schema: TransformSchema = serde_json::from_value(json!({
            "properties": {
                "createdAt": { "name": "created", "type": "LocalDateTime", "fieldMapping": "$.meta.created" },
                "items": { "type": "array", "valueType": "object", "properties": { "id": { "type": "String" } } }
            }
        }))
        .unwrap();
        let created = &schema.properties["createdAt"];
        assert_eq!(created.kind, PropertyKind::LocalDateTime);
        assert_eq!(created.name.as_deref(), Some("created"));
        assert_eq!(schema.properties["items"].kind, PropertyKind::Array);
        assert_eq!(schema.properties["items"].value_type, Some(PropertyKind::Object));
    }
}
