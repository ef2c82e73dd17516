//! Conversion between a [`Grid`] and the text stored after `#` in the URL.
//!
//! The fragment is the grid as a JSON array of arrays of strings, percent-encoded
//! so it survives copy/paste of the link. There is no version tag; old links stay
//! readable as long as the shape checks below keep accepting them.

use crate::error::CodecError;
use crate::grid::{COLS, Grid, ROWS};
use serde_json::Value;

/// Serialize the grid into a fragment (without the leading `#`).
pub fn encode(grid: &Grid) -> String {
    // A grid of plain strings always has a JSON form.
    let json = serde_json::to_string(grid).unwrap_or_default();
    urlencoding::encode(&json).into_owned()
}

/// Decode a fragment, returning `None` when it holds no usable state.
///
/// Failures are logged and swallowed; the caller keeps whatever grid it had.
pub fn decode(fragment: &str) -> Option<Grid> {
    match try_decode(fragment) {
        Ok(grid) => Some(grid),
        Err(err) => {
            log::warn!("Failed to decode state from URL: {}", err);
            None
        }
    }
}

/// Decode the raw value of `location.hash`, with or without its leading `#`.
///
/// An empty hash means "no state" and is not reported as a failure.
pub fn decode_hash(hash: &str) -> Option<Grid> {
    let fragment = hash.strip_prefix('#').unwrap_or(hash);
    if fragment.is_empty() {
        return None;
    }
    decode(fragment)
}

/// Decode a fragment and report why it was rejected.
///
/// The outer array must have exactly `ROWS` entries. A row that is not an
/// array of exactly `COLS` entries is replaced by an empty row instead of
/// rejecting the whole sheet, so partially damaged links still open.
pub fn try_decode(fragment: &str) -> Result<Grid, CodecError> {
    check_escapes(fragment)?;
    let text = urlencoding::decode(fragment)?;
    let parsed: Value = serde_json::from_str(&text)?;

    let rows = match parsed {
        Value::Array(rows) if rows.len() == ROWS => rows,
        other => {
            return Err(CodecError::Shape {
                expected: ROWS,
                found: describe(&other),
            });
        }
    };

    let cells = std::array::from_fn(|r| coerce_row(r, &rows[r]));
    Ok(Grid::from_rows(cells))
}

// urlencoding passes a bad escape through as literal text; a fragment with one
// was not produced by `encode` and is rejected outright.
fn check_escapes(fragment: &str) -> Result<(), CodecError> {
    let bytes = fragment.as_bytes();
    for (position, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'%') {
        let well_formed = bytes
            .get(position + 1..position + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !well_formed {
            return Err(CodecError::MalformedEscape { position });
        }
    }
    Ok(())
}

fn coerce_row(index: usize, row: &Value) -> [String; COLS] {
    match row {
        Value::Array(cells) if cells.len() == COLS => std::array::from_fn(|c| coerce_cell(&cells[c])),
        other => {
            log::debug!("row {} is {}, replacing with empty cells", index + 1, describe(other));
            Default::default()
        }
    }
}

/// Loose string conversion of one stored cell.
///
/// Falsy JSON values (`null`, `false`, `0`, `""`) become the empty string;
/// anything else takes its plain-text form.
pub fn coerce_cell(value: &Value) -> String {
    if is_falsy(value) {
        String::new()
    } else {
        stringify(value)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { stringify(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Number to text the way a browser prints it: every number is a double,
/// and very large or very small magnitudes switch to exponent form (`1e+21`, `1e-7`).
fn format_number(f: f64) -> String {
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", f);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        }
    } else {
        // Display prints integral values without a fraction ("3", not "3.0").
        f.to_string()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("an array of {}", items.len()),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
