//! Sort specifications: the fixed total order of an entity type.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::builder::{SortDir, SortField, Value, ValueKind};
use crate::is_valid_sql_identifier;

use super::cursor::{Cursor, CursorError, DEFAULT_MAX_CURSOR_LEN};
use super::key::{CursorKey, compare_values};

/// One column of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortColumn {
    name: String,
    dir: SortDir,
    kind: ValueKind,
    unique: bool,
}

impl SortColumn {
    /// An ascending column holding values of `kind`.
    pub fn asc(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, SortDir::Asc, kind)
    }

    /// A descending column holding values of `kind`.
    pub fn desc(name: impl Into<String>, kind: ValueKind) -> Self {
        Self::new(name, SortDir::Desc, kind)
    }

    /// A column with an explicit direction.
    pub fn new(name: impl Into<String>, dir: SortDir, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            dir,
            kind,
            unique: false,
        }
    }

    /// Mark the column as unique per row.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared direction.
    pub const fn dir(&self) -> SortDir {
        self.dir
    }

    /// Kind of value the column holds.
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the column alone identifies a row.
    pub const fn is_unique(&self) -> bool {
        self.unique
    }
}

/// Errors raised while building a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SortSpecError {
    /// No columns were given.
    #[error("sort specification has no columns")]
    Empty,
    /// A column name is not a plain SQL identifier.
    #[error("invalid sort column name '{0}'")]
    InvalidColumn(String),
    /// A column is listed twice.
    #[error("sort column '{0}' appears more than once")]
    DuplicateColumn(String),
    /// A column holds values that cannot be part of a cursor key.
    #[error("sort column '{column}' holds {kind} values, which cannot form a cursor key")]
    UnsupportedKind {
        /// Offending column.
        column: String,
        /// Its declared kind.
        kind: ValueKind,
    },
    /// The columns do not identify a row, so pages could split ties.
    #[error("sort specification is not a total order: '{0}' is not unique")]
    NotTotal(String),
}

/// An ordered list of columns forming a total order over an entity's rows.
///
/// Either the last column is marked [`unique`](SortColumn::unique)
/// ([`SortSpec::new`]) or the column combination is declared unique
/// ([`SortSpec::composite`]). Both rule out ties, which is what lets a cursor
/// name an exact position.
///
/// ```
/// use chainidx_paging::{SortColumn, SortSpec, ValueKind};
///
/// let spec = SortSpec::new([
///     SortColumn::asc("vega_time", ValueKind::Timestamp),
///     SortColumn::asc("id", ValueKind::Text).unique(),
/// ])
/// .unwrap();
/// assert_eq!(spec.len(), 2);
///
/// // A lone non-unique column could tie
/// assert!(SortSpec::new([SortColumn::asc("vega_time", ValueKind::Timestamp)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    columns: Vec<SortColumn>,
}

impl SortSpec {
    /// Build a specification whose last column is unique.
    pub fn new(columns: impl IntoIterator<Item = SortColumn>) -> Result<Self, SortSpecError> {
        let columns: Vec<SortColumn> = columns.into_iter().collect();
        Self::check_columns(&columns)?;
        match columns.last() {
            Some(last) if last.unique => Ok(Self { columns }),
            Some(last) => Err(SortSpecError::NotTotal(last.name.clone())),
            None => Err(SortSpecError::Empty),
        }
    }

    /// Build a specification whose column combination is unique, such as
    /// `(block_height, node_id)`. Needs at least two columns; a single column
    /// must be declared unique through [`SortSpec::new`].
    pub fn composite(columns: impl IntoIterator<Item = SortColumn>) -> Result<Self, SortSpecError> {
        let columns: Vec<SortColumn> = columns.into_iter().collect();
        Self::check_columns(&columns)?;
        match columns.as_slice() {
            [] => Err(SortSpecError::Empty),
            [only] if !only.unique => Err(SortSpecError::NotTotal(only.name.clone())),
            _ => Ok(Self { columns }),
        }
    }

    fn check_columns(columns: &[SortColumn]) -> Result<(), SortSpecError> {
        if columns.is_empty() {
            return Err(SortSpecError::Empty);
        }
        let mut seen = HashSet::new();
        for column in columns {
            if !is_valid_sql_identifier(&column.name) {
                return Err(SortSpecError::InvalidColumn(column.name.clone()));
            }
            if !column.kind.is_key_kind() {
                return Err(SortSpecError::UnsupportedKind {
                    column: column.name.clone(),
                    kind: column.kind,
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(SortSpecError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(())
    }

    /// The columns in order.
    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    /// Number of columns (and of components in every key).
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always `false`; construction rejects empty specifications.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The effective column order. `newest_first` flips every column.
    pub fn base_order(&self, newest_first: bool) -> Vec<SortField> {
        self.columns
            .iter()
            .map(|column| {
                let dir = if newest_first {
                    column.dir.reversed()
                } else {
                    column.dir
                };
                SortField::new(column.name.clone(), dir)
            })
            .collect()
    }

    /// Compare two keys under the effective order.
    ///
    /// Keys must have this specification's shape (see [`SortSpec::check_key`]).
    pub fn compare(&self, a: &CursorKey, b: &CursorKey, newest_first: bool) -> Ordering {
        compare_values(&self.base_order(newest_first), a.values(), b.values())
    }

    /// Verify that `key` has one component per column, of the declared kind.
    pub fn check_key(&self, key: &CursorKey) -> Result<(), CursorError> {
        if key.len() != self.columns.len() {
            return Err(CursorError::FieldCount {
                expected: self.columns.len(),
                found: key.len(),
            });
        }
        for (column, value) in self.columns.iter().zip(key.values()) {
            check_kind(column, value)?;
        }
        Ok(())
    }

    /// Name the components of `key`, producing the cursor to encode.
    pub fn cursor_for(&self, key: &CursorKey) -> Cursor {
        self.columns
            .iter()
            .zip(key.values())
            .fold(Cursor::new(), |cursor, (column, value)| {
                cursor.field(column.name.clone(), value.clone())
            })
    }

    /// Encode `key` as an opaque token.
    pub fn encode_key(&self, key: &CursorKey) -> String {
        self.cursor_for(key).encode()
    }

    /// Decode a token produced by [`SortSpec::encode_key`] for a specification
    /// of the same shape.
    pub fn decode_key(&self, token: &str) -> Result<CursorKey, CursorError> {
        self.decode_key_with_limit(token, DEFAULT_MAX_CURSOR_LEN)
    }

    /// [`SortSpec::decode_key`] with an explicit token length limit.
    pub fn decode_key_with_limit(
        &self,
        token: &str,
        max_len: usize,
    ) -> Result<CursorKey, CursorError> {
        let cursor = Cursor::decode_with_limit(token, max_len)?;
        self.key_from_cursor(cursor)
    }

    /// Match a decoded cursor against the columns: same count, same names in
    /// the same order, same kinds.
    pub fn key_from_cursor(&self, cursor: Cursor) -> Result<CursorKey, CursorError> {
        if cursor.fields.len() != self.columns.len() {
            return Err(CursorError::FieldCount {
                expected: self.columns.len(),
                found: cursor.fields.len(),
            });
        }

        let mut values = Vec::with_capacity(self.columns.len());
        for (position, (column, (name, value))) in
            self.columns.iter().zip(cursor.fields).enumerate()
        {
            if name != column.name {
                return Err(CursorError::FieldName {
                    position,
                    expected: column.name.clone(),
                    found: name,
                });
            }
            check_kind(column, &value)?;
            values.push(value);
        }
        Ok(CursorKey::new(values))
    }
}

fn check_kind(column: &SortColumn, value: &Value) -> Result<(), CursorError> {
    if value.kind() == column.kind {
        Ok(())
    } else {
        Err(CursorError::FieldKind {
            field: column.name.clone(),
            expected: column.kind,
            found: value.kind(),
        })
    }
}
