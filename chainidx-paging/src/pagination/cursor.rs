//! Cursor encoding/decoding for pagination.

use crate::builder::{Value, ValueKind};

use super::encoding::{CURSOR_VERSION, base64_decode, encode_envelope, parse_envelope};

/// Default maximum cursor token size in bytes (4KB).
pub const DEFAULT_MAX_CURSOR_LEN: usize = 4 * 1024;

/// Maximum number of fields allowed in a cursor.
const MAX_CURSOR_FIELDS: usize = 16;

/// A cursor for cursor-based pagination.
///
/// Holds the named sort-column values of one row. Encoded, it becomes the
/// opaque token handed to callers; [`SortSpec::key_from_cursor`] turns a
/// decoded cursor back into a [`CursorKey`] after checking its shape.
///
/// # Security Note
///
/// Tokens are base64, **not encryption**. Clients can read them, so only sort
/// column values belong in a cursor.
///
/// [`SortSpec::key_from_cursor`]: super::SortSpec::key_from_cursor
/// [`CursorKey`]: super::CursorKey
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use = "cursor must be encoded with .encode() or matched against a SortSpec"]
pub struct Cursor {
    /// Field values that define the cursor position.
    pub fields: Vec<(String, Value)>,
}

impl Cursor {
    /// Create a new empty cursor.
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Add a field value to the cursor.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add an integer field.
    pub fn int(self, name: impl Into<String>, value: i64) -> Self {
        self.field(name, Value::Int(value))
    }

    /// Add a ledger timestamp field (nanoseconds since the Unix epoch).
    pub fn timestamp(self, name: impl Into<String>, nanos: i64) -> Self {
        self.field(name, Value::Timestamp(nanos))
    }

    /// Add a text field.
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, Value::Text(value.into()))
    }

    /// Encode the cursor to an opaque token.
    ///
    /// The same fields always produce the same token.
    #[must_use]
    pub fn encode(&self) -> String {
        encode_envelope(&self.fields)
    }

    /// Decode a token using the default size limit.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        Self::decode_with_limit(token, DEFAULT_MAX_CURSOR_LEN)
    }

    /// Decode a token, rejecting tokens longer than `max_len` bytes before
    /// doing any other work.
    pub fn decode_with_limit(token: &str, max_len: usize) -> Result<Self, CursorError> {
        if token.is_empty() {
            return Err(CursorError::Empty);
        }
        if token.len() > max_len {
            return Err(CursorError::TooLarge {
                len: token.len(),
                max: max_len,
            });
        }

        let bytes = base64_decode(token).map_err(|_| CursorError::InvalidEncoding)?;
        let envelope =
            parse_envelope(&bytes).map_err(|err| CursorError::InvalidFormat(err.to_string()))?;

        if envelope.v != CURSOR_VERSION {
            return Err(CursorError::UnsupportedVersion(envelope.v));
        }
        if envelope.f.len() > MAX_CURSOR_FIELDS {
            return Err(CursorError::TooManyFields);
        }

        Ok(Self { fields: envelope.f })
    }
}

/// Errors that can occur when decoding a cursor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CursorError {
    /// The token is an empty string.
    #[error("cursor token is empty")]
    Empty,
    /// The token exceeds the size limit.
    #[error("cursor token is {len} bytes, above the {max} byte limit")]
    TooLarge {
        /// Token length.
        len: usize,
        /// Configured limit.
        max: usize,
    },
    /// The base64 encoding is invalid.
    #[error("invalid base64 encoding in cursor")]
    InvalidEncoding,
    /// The decoded payload is not a cursor envelope.
    #[error("invalid cursor format: {0}")]
    InvalidFormat(String),
    /// The envelope version is not understood.
    #[error("unsupported cursor version {0}")]
    UnsupportedVersion(u8),
    /// The cursor has too many fields.
    #[error("cursor has too many fields (max {MAX_CURSOR_FIELDS})")]
    TooManyFields,
    /// The cursor has the wrong number of fields for the sort order.
    #[error("cursor has {found} fields, expected {expected}")]
    FieldCount {
        /// Columns in the sort order.
        expected: usize,
        /// Fields in the cursor.
        found: usize,
    },
    /// A field name does not match the sort column at its position.
    #[error("cursor field {position} is '{found}', expected '{expected}'")]
    FieldName {
        /// Zero-based field position.
        position: usize,
        /// Sort column name.
        expected: String,
        /// Name found in the cursor.
        found: String,
    },
    /// A field value has the wrong kind for its column.
    #[error("cursor field '{field}' holds a {found} value, expected {expected}")]
    FieldKind {
        /// Sort column name.
        field: String,
        /// Declared kind.
        expected: ValueKind,
        /// Kind found in the cursor.
        found: ValueKind,
    },
}

impl CursorError {
    /// Returns `true` if the token itself could not be read.
    ///
    /// Includes `Empty`, `InvalidEncoding`, `InvalidFormat`, and
    /// `UnsupportedVersion`.
    #[inline]
    #[must_use]
    pub const fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Empty | Self::InvalidEncoding | Self::InvalidFormat(_) | Self::UnsupportedVersion(_)
        )
    }

    /// Returns `true` if this is a size/limit error.
    ///
    /// Includes `TooLarge` and `TooManyFields`.
    #[inline]
    #[must_use]
    pub const fn is_limit_error(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::TooManyFields)
    }

    /// Returns `true` if the token decoded but belongs to another sort order.
    #[inline]
    #[must_use]
    pub const fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::FieldCount { .. } | Self::FieldName { .. } | Self::FieldKind { .. }
        )
    }
}
