//! Type and constraint checks for field values.
//!
//! `check_type` answers one question: does this value conform to the
//! declared `FieldType` and the rule's `typeValidationParams`? A null or
//! absent value always conforms; required-ness is decided elsewhere.
//!
//! Constraint parameters are parsed once into `Constraints`. A parameter that
//! is present but unusable (a non-numeric `min`, an invalid `pattern`) is kept
//! as malformed and fails its own check instead of aborting validation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use vigil_contracts::{
    rule::{FieldType, TypeParams},
    value::FieldValue,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("email pattern is valid"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-().\s]+$").expect("phone pattern is valid"));

/// Constraint parameter names recognised in `typeValidationParams`.
pub mod param {
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const PATTERN: &str = "pattern";
    pub const MIN: &str = "min";
    pub const MAX: &str = "max";
    pub const MIN_SIZE: &str = "minSize";
    pub const MAX_SIZE: &str = "maxSize";
}

/// A parsed constraint parameter.
#[derive(Debug, Clone)]
enum Param<T> {
    Valid(T),
    Malformed,
}

/// Parsed `typeValidationParams` for one rule.
///
/// Unknown parameter names are ignored.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    min_length: Option<Param<f64>>,
    max_length: Option<Param<f64>>,
    pattern: Option<Param<Regex>>,
    min: Option<Param<f64>>,
    max: Option<Param<f64>>,
    min_size: Option<Param<f64>>,
    max_size: Option<Param<f64>>,
}

impl Constraints {
    pub fn from_params(params: &TypeParams) -> Self {
        Self {
            min_length: numeric(params, param::MIN_LENGTH),
            max_length: numeric(params, param::MAX_LENGTH),
            pattern: params.get(param::PATTERN).map(|raw| {
                let compiled = raw
                    .as_str()
                    .and_then(|p| Regex::new(&format!("^(?:{p})$")).ok());
                match compiled {
                    Some(re) => Param::Valid(re),
                    None => {
                        warn!(param = param::PATTERN, value = %raw, "malformed type validation parameter");
                        Param::Malformed
                    }
                }
            }),
            min: numeric(params, param::MIN),
            max: numeric(params, param::MAX),
            min_size: numeric(params, param::MIN_SIZE),
            max_size: numeric(params, param::MAX_SIZE),
        }
    }

    /// Length bounds (in characters) and full-match pattern.
    pub fn check_string(&self, s: &str) -> bool {
        let len = s.chars().count() as f64;
        if !at_least(&self.min_length, len) || !at_most(&self.max_length, len) {
            return false;
        }
        match &self.pattern {
            None => true,
            Some(Param::Valid(re)) => re.is_match(s),
            Some(Param::Malformed) => false,
        }
    }

    /// Inclusive `min` / `max` on a numeric value.
    pub fn check_number(&self, n: f64) -> bool {
        at_least(&self.min, n) && at_most(&self.max, n)
    }

    /// Inclusive `minSize` / `maxSize` on an element or entry count.
    pub fn check_size(&self, size: usize) -> bool {
        let size = size as f64;
        at_least(&self.min_size, size) && at_most(&self.max_size, size)
    }
}

fn numeric(params: &TypeParams, name: &'static str) -> Option<Param<f64>> {
    let raw = params.get(name)?;
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|n| !n.is_nan()) {
        Some(n) => Some(Param::Valid(n)),
        None => {
            warn!(param = name, value = %raw, "malformed type validation parameter");
            Some(Param::Malformed)
        }
    }
}

fn at_least(bound: &Option<Param<f64>>, actual: f64) -> bool {
    match bound {
        None => true,
        Some(Param::Valid(b)) => actual >= *b,
        Some(Param::Malformed) => false,
    }
}

fn at_most(bound: &Option<Param<f64>>, actual: f64) -> bool {
    match bound {
        None => true,
        Some(Param::Valid(b)) => actual <= *b,
        Some(Param::Malformed) => false,
    }
}

/// Check `value` against `field_type` and raw `params`.
pub fn check_type(value: Option<&FieldValue>, field_type: FieldType, params: &TypeParams) -> bool {
    check_with(value, field_type, &Constraints::from_params(params))
}

/// Check `value` against `field_type` and pre-parsed `constraints`.
pub fn check_with(value: Option<&FieldValue>, field_type: FieldType, constraints: &Constraints) -> bool {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return true;
    };

    match field_type {
        FieldType::String => value.as_str().is_some_and(|s| constraints.check_string(s)),
        FieldType::Int32 => coerce_int(value, i64::from(i32::MIN), i64::from(i32::MAX))
            .is_some_and(|n| constraints.check_number(n as f64)),
        FieldType::Int64 => {
            coerce_int(value, i64::MIN, i64::MAX).is_some_and(|n| constraints.check_number(n as f64))
        }
        FieldType::Decimal => value
            .as_f64()
            .filter(|n| !n.is_nan())
            .is_some_and(|n| constraints.check_number(n)),
        FieldType::Boolean => matches!(value, FieldValue::Bool(_)),
        FieldType::Date => matches!(value, FieldValue::Date(_)),
        FieldType::DateTime => matches!(value, FieldValue::DateTime(_)),
        FieldType::ZonedDateTime => matches!(value, FieldValue::ZonedDateTime(_)),
        FieldType::Object => !matches!(
            value,
            FieldValue::Bool(_)
                | FieldValue::Int(_)
                | FieldValue::Float(_)
                | FieldValue::String(_)
                | FieldValue::List(_)
                | FieldValue::Map(_)
        ),
        FieldType::Array => match value {
            FieldValue::List(items) => constraints.check_size(items.len()),
            _ => false,
        },
        FieldType::Map => match value {
            FieldValue::Map(map) => constraints.check_size(map.len()),
            _ => false,
        },
        FieldType::Email => string_format(value, constraints, |s| EMAIL_RE.is_match(s)),
        FieldType::Uuid => string_format(value, constraints, is_canonical_uuid),
        FieldType::Phone => string_format(value, constraints, |s| PHONE_RE.is_match(s)),
        FieldType::Url => string_format(value, constraints, |s| Url::parse(s).is_ok()),
    }
}

fn string_format(value: &FieldValue, constraints: &Constraints, format: impl Fn(&str) -> bool) -> bool {
    value
        .as_str()
        .is_some_and(|s| format(s) && constraints.check_string(s))
}

/// Hyphenated 8-4-4-4-12 form only; braced, URN and simple forms are rejected.
fn is_canonical_uuid(s: &str) -> bool {
    s.len() == 36 && Uuid::parse_str(s).is_ok()
}

/// Accept a native integer, or a float with no fractional part, when it fits
/// in `[min, max]`.
fn coerce_int(value: &FieldValue, min: i64, max: i64) -> Option<i64> {
    match value {
        FieldValue::Int(i) if (min..=max).contains(i) => Some(*i),
        FieldValue::Float(f)
            if f.is_finite() && f.fract() == 0.0 && *f >= min as f64 && *f < max as f64 + 1.0 =>
        {
            Some(*f as i64)
        }
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;

    use vigil_contracts::value::Record;

    use super::*;

    fn params(value: serde_json::Value) -> TypeParams {
        serde_json::from_value(value).unwrap()
    }

    fn no_params() -> TypeParams {
        TypeParams::new()
    }

    fn check(value: impl Into<FieldValue>, field_type: FieldType, p: &TypeParams) -> bool {
        let value = value.into();
        check_type(Some(&value), field_type, p)
    }

    // ── Null handling ────────────────────────────────────────────────────────

    #[test]
    fn null_and_absent_always_pass() {
        for ft in [FieldType::String, FieldType::Int32, FieldType::Email, FieldType::Array] {
            assert!(check_type(None, ft, &no_params()));
            assert!(check_type(Some(&FieldValue::Null), ft, &no_params()));
        }
    }

    // ── Strings ──────────────────────────────────────────────────────────────

    #[test]
    fn string_length_bounds_are_inclusive() {
        let p = params(json!({ "minLength": 2, "maxLength": 4 }));
        assert!(check("ab", FieldType::String, &p));
        assert!(check("abcd", FieldType::String, &p));
        assert!(!check("a", FieldType::String, &p), "one under minLength must fail");
        assert!(!check("abcde", FieldType::String, &p), "one over maxLength must fail");
        assert!(!check(12, FieldType::String, &p), "non-strings are not STRING");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let p = params(json!({ "maxLength": 2 }));
        assert!(check("ñé", FieldType::String, &p));
    }

    #[test]
    fn pattern_must_match_whole_string() {
        let p = params(json!({ "pattern": "[A-Z]{2}" }));
        assert!(check("TX", FieldType::String, &p));
        assert!(!check("TXA", FieldType::String, &p));
        assert!(!check("xTX", FieldType::String, &p));
    }

    #[test]
    fn malformed_string_params_fail_only_their_check() {
        let bad_pattern = params(json!({ "pattern": "([" }));
        assert!(!check("anything", FieldType::String, &bad_pattern));

        let bad_length = params(json!({ "minLength": "two" }));
        assert!(!check("abc", FieldType::String, &bad_length));

        // Numeric strings are accepted as bounds.
        let string_bound = params(json!({ "minLength": "2" }));
        assert!(check("abc", FieldType::String, &string_bound));
    }

    // ── Integers ─────────────────────────────────────────────────────────────

    #[test]
    fn int32_accepts_whole_numbers_in_range() {
        let p = no_params();
        assert!(check(42, FieldType::Int32, &p));
        assert!(check(42.0, FieldType::Int32, &p));
        assert!(!check(42.5, FieldType::Int32, &p));
        assert!(!check(i64::from(i32::MAX) + 1, FieldType::Int32, &p));
        assert!(check(i64::from(i32::MIN), FieldType::Int32, &p));
        assert!(!check("42", FieldType::Int32, &p));
    }

    #[test]
    fn int64_accepts_full_width() {
        let p = no_params();
        assert!(check(i64::MAX, FieldType::Int64, &p));
        assert!(check(1e15, FieldType::Int64, &p));
        assert!(!check(1e19, FieldType::Int64, &p));
        assert!(!check(f64::NAN, FieldType::Int64, &p));
    }

    #[test]
    fn numeric_range_is_inclusive() {
        let p = params(json!({ "min": 0, "max": 120 }));
        assert!(check(0, FieldType::Int32, &p));
        assert!(check(120, FieldType::Int32, &p));
        assert!(!check(121, FieldType::Int32, &p));
        assert!(!check(-1, FieldType::Int32, &p));
        assert!(!check(150, FieldType::Int32, &p));
    }

    #[test]
    fn malformed_numeric_bound_fails_the_check() {
        let p = params(json!({ "min": "abc" }));
        assert!(!check(5, FieldType::Int32, &p));
        let p = params(json!({ "max": [1] }));
        assert!(!check(5.5, FieldType::Decimal, &p));
    }

    // ── Decimal / Boolean / dates ────────────────────────────────────────────

    #[test]
    fn decimal_accepts_any_number() {
        let p = params(json!({ "min": 0.5, "max": 1.5 }));
        assert!(check(1, FieldType::Decimal, &p));
        assert!(check(0.5, FieldType::Decimal, &p));
        assert!(!check(1.51, FieldType::Decimal, &p));
        assert!(!check("1.0", FieldType::Decimal, &p));
    }

    #[test]
    fn boolean_is_exact() {
        assert!(check(true, FieldType::Boolean, &no_params()));
        assert!(!check("true", FieldType::Boolean, &no_params()));
        assert!(!check(1, FieldType::Boolean, &no_params()));
    }

    #[test]
    fn date_kinds_require_matching_precision() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let date_time = date.and_hms_opt(9, 30, 0).unwrap();
        let zoned = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap().fixed_offset();
        let p = no_params();

        assert!(check(date, FieldType::Date, &p));
        assert!(!check(date_time, FieldType::Date, &p));
        assert!(check(date_time, FieldType::DateTime, &p));
        assert!(!check(zoned, FieldType::DateTime, &p));
        assert!(check(zoned, FieldType::ZonedDateTime, &p));
        assert!(!check("2024-05-01", FieldType::Date, &p), "strings are not parsed");
    }

    // ── Composites ───────────────────────────────────────────────────────────

    #[test]
    fn object_excludes_scalars_and_collections() {
        let p = no_params();
        assert!(check(Record::new().with("a", 1), FieldType::Object, &p));
        assert!(check(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), FieldType::Object, &p));
        assert!(!check(FieldValue::from(json!({ "a": 1 })), FieldType::Object, &p));
        assert!(!check(FieldValue::from(json!([1])), FieldType::Object, &p));
        assert!(!check("x", FieldType::Object, &p));
    }

    #[test]
    fn array_and_map_sizes() {
        let p = params(json!({ "minSize": 1, "maxSize": 2 }));
        assert!(check(FieldValue::from(json!([1, 2])), FieldType::Array, &p));
        assert!(!check(FieldValue::from(json!([])), FieldType::Array, &p));
        assert!(!check(FieldValue::from(json!([1, 2, 3])), FieldType::Array, &p));
        assert!(check(FieldValue::from(json!({ "k": 1 })), FieldType::Map, &p));
        assert!(!check(FieldValue::from(json!({ "k": 1 })), FieldType::Array, &p));
        assert!(!check(FieldValue::from(json!([1])), FieldType::Map, &p));
    }

    // ── Formats ──────────────────────────────────────────────────────────────

    #[test]
    fn email_format() {
        let p = no_params();
        assert!(check("ada.lovelace+x@example.com", FieldType::Email, &p));
        assert!(!check("no-at-sign.example.com", FieldType::Email, &p));
        assert!(!check("spaces in@example.com", FieldType::Email, &p));
        assert!(!check("@example.com", FieldType::Email, &p));

        let short = params(json!({ "maxLength": 5 }));
        assert!(!check("a@example.com", FieldType::Email, &short));
    }

    #[test]
    fn uuid_format_is_canonical() {
        let p = no_params();
        assert!(check("67e55044-10b1-426f-9247-bb680e5fe0c8", FieldType::Uuid, &p));
        assert!(!check("67e5504410b1426f9247bb680e5fe0c8", FieldType::Uuid, &p));
        assert!(!check("not-a-uuid", FieldType::Uuid, &p));
    }

    #[test]
    fn phone_format() {
        let p = no_params();
        assert!(check("+1 (555) 010-9999", FieldType::Phone, &p));
        assert!(!check("555-CALL-NOW", FieldType::Phone, &p));
    }

    #[test]
    fn url_format() {
        let p = no_params();
        assert!(check("https://example.com/path?q=1", FieldType::Url, &p));
        assert!(!check("example dot com", FieldType::Url, &p));
        assert!(!check("/relative/path", FieldType::Url, &p));
    }
}
