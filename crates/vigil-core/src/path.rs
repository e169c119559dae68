//! Dotted field-path resolution and nested writes.
//!
//! Paths are plain dot-separated property names (`"address.city"`), with an
//! optional JSONPath-style `$.` root marker. Array indices and wildcards are
//! not supported. Resolution walks `Map` keys and `Record` properties; a
//! missing segment, or a `Null` anywhere along the way, resolves to `None`.

use std::collections::BTreeMap;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    value::{FieldValue, Record},
};

/// Split `path` into its segments, dropping a leading `$.` or `$`.
///
/// Returns an empty vector for an empty path or a bare `$`.
pub fn segments(path: &str) -> Vec<&str> {
    let trimmed = path.trim();
    let trimmed = trimmed
        .strip_prefix("$.")
        .or_else(|| trimmed.strip_prefix('$'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('.').collect()
}

/// Resolve already-split `segments` below `value`.
pub fn resolve_segments<'v>(value: &'v FieldValue, segments: &[&str]) -> Option<&'v FieldValue> {
    let mut current = value;
    for segment in segments {
        current = current.child(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Resolve `path` below `value`. An empty path resolves to `value` itself.
pub fn resolve<'v>(value: &'v FieldValue, path: &str) -> Option<&'v FieldValue> {
    resolve_segments(value, &segments(path))
}

/// Resolve `path` against the properties of `record`.
pub fn resolve_record<'v>(record: &'v Record, path: &str) -> Option<&'v FieldValue> {
    let segs = segments(path);
    let (first, rest) = segs.split_first()?;
    resolve_segments(record.get(first)?, rest)
}

/// Write `value` at `path` inside `record`, creating intermediate `Map`
/// nodes on demand and overwriting whatever is already at the final segment.
///
/// An intermediate node that is neither a `Map` nor a `Record` is replaced by
/// an empty `Map`. Fails only when the path is empty or has an empty segment.
pub fn set_nested_value(record: &mut Record, path: &str, value: FieldValue) -> VigilResult<()> {
    let segs = checked_segments(path)?;
    let Some((first, rest)) = segs.split_first() else {
        return Err(invalid(path, "path is empty"));
    };
    if rest.is_empty() {
        record.insert(*first, value);
        return Ok(());
    }
    if record.get(first).is_none() {
        record.insert(*first, FieldValue::Map(BTreeMap::new()));
    }
    let slot = record
        .get_mut(first)
        .ok_or_else(|| invalid(path, "intermediate node vanished"))?;
    set_in_value(slot, rest, value);
    Ok(())
}

/// Write `value` at already-validated `segments` below `target`.
///
/// `target` is turned into an empty `Map` first when it cannot hold children.
pub fn set_in_value(target: &mut FieldValue, segments: &[&str], value: FieldValue) {
    let Some((first, rest)) = segments.split_first() else {
        *target = value;
        return;
    };
    if !matches!(target, FieldValue::Map(_) | FieldValue::Record(_)) {
        *target = FieldValue::Map(BTreeMap::new());
    }
    let child = match target {
        FieldValue::Map(map) => map
            .entry((*first).to_string())
            .or_insert(FieldValue::Null),
        FieldValue::Record(record) => {
            if record.get(first).is_none() {
                record.insert(*first, FieldValue::Null);
            }
            match record.get_mut(first) {
                Some(child) => child,
                None => return,
            }
        }
        _ => return,
    };
    set_in_value(child, rest, value);
}

/// Split `path` and reject empty paths and empty segments (`"a..b"`).
pub fn checked_segments(path: &str) -> VigilResult<Vec<&str>> {
    let segs = segments(path);
    if segs.is_empty() {
        return Err(invalid(path, "path is empty"));
    }
    if segs.iter().any(|s| s.is_empty()) {
        return Err(invalid(path, "path contains an empty segment"));
    }
    Ok(segs)
}

fn invalid(path: &str, reason: &str) -> VigilError {
    VigilError::InvalidPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
