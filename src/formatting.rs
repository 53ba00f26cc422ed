//! Rendering of measurements into the line protocol.
//!
//! ```text
//! <NAME>[,<TAG_KEY>=<TAG_VALUE>]* <FIELD_KEY>=<FIELD_VALUE>[,<FIELD_KEY>=<FIELD_VALUE>]* [<TIMESTAMP>]
//! ```
//!
//! Tags and fields are emitted sorted by key. Field values are rendered as follows:
//!
//! - integers: `123i`
//! - unsigned integers: `123u`
//! - floats: the shortest representation that parses back to the same value (`64.5`, `1`)
//! - booleans: `true` / `false`
//! - strings: `"text"`, with `"` and `\` escaped
use std::fmt::Write as _;

use crate::common::EncodeError;
use crate::measurement::{FieldValue, Measurement};

/// Renders a measurement as a single line, without the line terminator.
///
/// ## Errors
///
/// If the measurement has an empty name, no fields, an empty key, a line break outside a string
/// field, a name or key or tag value ending in a backslash, or a non-finite float field, an error
/// variant will be returned describing the problem.
pub fn encode(measurement: &Measurement) -> Result<String, EncodeError> {
    let mut buffer = String::new();
    write_measurement_line(&mut buffer, measurement)?;
    Ok(buffer)
}

/// Appends a measurement, rendered as a single line without terminator, to `buffer`.
///
/// The measurement is fully validated first, so `buffer` is left untouched on error.
pub fn write_measurement_line(
    buffer: &mut String,
    measurement: &Measurement,
) -> Result<(), EncodeError> {
    let mut tags: Vec<_> = measurement.tags.iter().collect();
    tags.sort_by(|a, b| a.0.cmp(b.0));
    let mut fields: Vec<_> = measurement.fields.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    validate(&measurement.name, &tags, &fields)?;

    buffer.push_str(&escape_name(&measurement.name));

    for (key, value) in tags {
        buffer.push(',');
        buffer.push_str(&escape_tag(key));
        buffer.push('=');
        buffer.push_str(&escape_tag(value));
    }

    let mut first = true;
    for (key, value) in fields {
        if first {
            buffer.push(' ');
            first = false;
        } else {
            buffer.push(',');
        }
        buffer.push_str(&escape_tag(key));
        buffer.push('=');
        write_field_value(buffer, value);
    }

    if let Some(timestamp) = measurement.timestamp {
        buffer.push(' ');
        buffer.push_str(timestamp.to_string().as_str());
    }

    Ok(())
}

// Runs over tags and fields in rendering order, so the reported error does not depend on the
// order they were added in.
fn validate(
    name: &str,
    tags: &[(&String, &String)],
    fields: &[(&String, &FieldValue)],
) -> Result<(), EncodeError> {
    if name.is_empty() {
        return Err(EncodeError::EmptyName);
    }
    check_unescaped_text(name)?;

    if fields.is_empty() {
        return Err(EncodeError::EmptyFields);
    }

    for (key, value) in tags {
        if key.is_empty() {
            return Err(EncodeError::EmptyKey);
        }
        check_unescaped_text(key)?;
        check_unescaped_text(value)?;
    }

    for (key, value) in fields {
        if key.is_empty() {
            return Err(EncodeError::EmptyKey);
        }
        check_unescaped_text(key)?;
        if let FieldValue::Float(f) = value {
            if !f.is_finite() {
                return Err(EncodeError::NonFiniteField {
                    key: key.to_string(),
                });
            }
        }
    }

    Ok(())
}

// Names, tag keys, tag values and field keys have no escape for line breaks, and a trailing
// backslash would escape the delimiter rendered after it.
fn check_unescaped_text(s: &str) -> Result<(), EncodeError> {
    if s.contains(is_line_break) {
        return Err(EncodeError::LineBreak(s.to_string()));
    }
    if s.ends_with('\\') {
        return Err(EncodeError::TrailingBackslash(s.to_string()));
    }
    Ok(())
}

fn write_field_value(buffer: &mut String, value: &FieldValue) {
    // Writing into a `String` cannot fail.
    let _ = match value {
        FieldValue::Integer(i) => write!(buffer, "{}i", i),
        FieldValue::UInteger(u) => write!(buffer, "{}u", u),
        FieldValue::Float(f) => write!(buffer, "{}", f),
        FieldValue::Boolean(b) => write!(buffer, "{}", b),
        FieldValue::String(s) => write!(buffer, "\"{}\"", escape_string_field(s)),
    };
}

/// Escapes a measurement name.
///
/// Commas, equals signs and spaces are prefixed with a backslash.
pub fn escape_name(name: &str) -> String {
    escape_with(name, needs_tag_escape)
}

/// Escapes a tag key, tag value or field key.
///
/// Commas, equals signs and spaces are prefixed with a backslash.
pub fn escape_tag(key: &str) -> String {
    escape_with(key, needs_tag_escape)
}

/// Escapes the contents of a string field value, without the surrounding quotes.
///
/// Double quotes and backslashes are prefixed with a backslash.
pub fn escape_string_field(value: &str) -> String {
    escape_with(value, needs_string_escape)
}

fn escape_with(s: &str, needs_escape: fn(char) -> bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if needs_escape(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[inline]
fn needs_tag_escape(c: char) -> bool {
    c == ',' || c == '=' || c == ' '
}

#[inline]
fn needs_string_escape(c: char) -> bool {
    c == '"' || c == '\\'
}

#[inline]
fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}
