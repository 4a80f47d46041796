//! Shared formatting helpers for table cells and detail panels.
//!
//! Functions that differ between compact table columns and verbose detail
//! panels are parameterized via [`FmtStyle`].

use crate::record::FieldValue;

/// Controls compact (table columns) vs verbose (detail panel) output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FmtStyle {
    /// Compact: `"2026-02-07"`, `"1234.50"`, `"yes"`, `"-"` for empty
    Compact,
    /// Detail: `"07 Feb 2026"`, `"1234.5"`, `"Yes"`, `"(none)"` for empty
    Detail,
}

// ---------------------------------------------------------------------------
// Style-parameterized functions
// ---------------------------------------------------------------------------

/// Format a field value for display.
pub fn format_value(value: &FieldValue, style: FmtStyle) -> String {
    match (value, style) {
        (FieldValue::Null, FmtStyle::Compact) => "-".to_string(),
        (FieldValue::Null, FmtStyle::Detail) => "(none)".to_string(),
        (FieldValue::Bool(b), FmtStyle::Compact) => if *b { "yes" } else { "no" }.to_string(),
        (FieldValue::Bool(b), FmtStyle::Detail) => if *b { "Yes" } else { "No" }.to_string(),
        (FieldValue::Integer(v), _) => v.to_string(),
        (FieldValue::Float(v), FmtStyle::Compact) => format!("{:.2}", v),
        (FieldValue::Float(v), FmtStyle::Detail) => v.to_string(),
        (FieldValue::Date(d), FmtStyle::Compact) => d.format("%Y-%m-%d").to_string(),
        (FieldValue::Date(d), FmtStyle::Detail) => d.format("%d %b %Y").to_string(),
        (FieldValue::DateTime(dt), FmtStyle::Compact) => dt.format("%Y-%m-%d %H:%M").to_string(),
        (FieldValue::DateTime(dt), FmtStyle::Detail) => {
            dt.format("%d %b %Y %H:%M:%S").to_string()
        }
        (FieldValue::Text(s), FmtStyle::Compact) => normalize_for_display(s),
        (FieldValue::Text(s), FmtStyle::Detail) => s.clone(),
    }
}

/// Format a possibly missing field.
pub fn format_opt_value(value: Option<&FieldValue>, style: FmtStyle) -> String {
    match value {
        Some(v) => format_value(v, style),
        None => format_value(&FieldValue::Null, style),
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Truncate to `max_chars` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Single-line form of free text: newlines and tabs become spaces and runs
/// of spaces collapse.
pub fn normalize_for_display(s: &str) -> String {
    let s = s.replace('\n', " ").replace('\r', "").replace('\t', " ");
    let mut result = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch == ' ' {
            if !prev_space {
                result.push(ch);
            }
            prev_space = true;
        } else {
            result.push(ch);
            prev_space = false;
        }
    }
    result.trim().to_string()
}
