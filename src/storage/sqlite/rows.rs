//! Column accessors used when shaping rows into models.
//!
//! Keys are stored as text in the reference database but may be integers in
//! a rebuilt one, so key columns are read through [`key`]. Descriptive
//! columns are read through [`text`], which yields `None` for a column the
//! table does not have.

use rusqlite::Row;
use rusqlite::types::ValueRef;
use std::collections::BTreeMap;

fn value_to_string(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}

/// Reads a required key column as a string. `NULL` reads as an empty string.
///
/// # Errors
///
/// Fails if the column does not exist.
pub fn key(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(value_to_string(row.get_ref(column)?).unwrap_or_default())
}

/// Reads an optional descriptive column.
///
/// A column missing from the result set reads as `None`.
///
/// # Errors
///
/// Fails only on driver errors for a column that exists.
pub fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    if row.as_ref().column_index(column).is_err() {
        return Ok(None);
    }
    Ok(value_to_string(row.get_ref(column)?))
}

/// Reads an optional numeric column, accepting numbers stored as text.
///
/// # Errors
///
/// Fails only on driver errors for a column that exists.
pub fn real(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<f64>> {
    if row.as_ref().column_index(column).is_err() {
        return Ok(None);
    }
    Ok(match row.get_ref(column)? {
        #[allow(clippy::cast_precision_loss)]
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .ok()
            .and_then(|s| s.trim().parse().ok()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    })
}

/// Reads an embedded JSON object column (reciter id to URL).
///
/// `NULL`, empty text and a missing column decode to an empty map. Text that
/// is not a JSON object logs a warning and also decodes to an empty map.
/// Non-string values are kept in their JSON text form.
///
/// # Errors
///
/// Fails only on driver errors for a column that exists.
pub fn json_map(row: &Row<'_>, column: &str) -> rusqlite::Result<BTreeMap<String, String>> {
    let Some(raw) = text(row, column)? else {
        return Ok(BTreeMap::new());
    };
    Ok(decode_json_map(column, &raw))
}

/// Decodes embedded JSON map text. See [`json_map`].
#[must_use]
pub fn decode_json_map(column: &str, raw: &str) -> BTreeMap<String, String> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(raw) {
        Ok(object) => object
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect(),
        Err(e) => {
            tracing::warn!(column, error = %e, "Ignoring malformed embedded JSON");
            BTreeMap::new()
        },
    }
}
