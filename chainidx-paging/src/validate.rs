//! SQL identifier validation.
//!
//! Column and table names are interpolated into generated SQL, so every name
//! that reaches the renderer is checked here first. Values are always bound
//! as parameters and never pass through this module.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Whether `s` is a plain SQL identifier: an ASCII letter or underscore
/// followed by ASCII letters, digits, or underscores, at most 63 bytes.
///
/// ```
/// use chainidx_paging::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("vega_time"));
/// assert!(!is_valid_sql_identifier("vega-time"));
/// assert!(!is_valid_sql_identifier("1st"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Assert that a string is a valid SQL identifier.
///
/// For names fixed in code (tables, entity columns). Runtime input goes
/// through [`is_valid_sql_identifier`] and a typed error instead.
///
/// # Panics
///
/// Panics with a descriptive message if the identifier is invalid.
#[inline]
pub fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
             contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}
