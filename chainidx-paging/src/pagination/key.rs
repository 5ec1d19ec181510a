//! Cursor keys: the sort-column values of one row.

use std::cmp::Ordering;

use crate::builder::{SortField, Value};

use super::SortSpec;

/// An ordered tuple of sort-column values, one per column of a
/// [`SortSpec`](super::SortSpec), in column order.
///
/// Keys are compared only through a sort order (see
/// [`SortSpec::compare`](super::SortSpec::compare)); they have no intrinsic
/// ordering of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CursorKey(Vec<Value>);

impl CursorKey {
    /// Create a key from column values in sort-column order.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// The column values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode the key as an opaque token under `spec`'s column names.
    ///
    /// Shorthand for [`SortSpec::encode_key`].
    #[must_use]
    pub fn encode(&self, spec: &SortSpec) -> String {
        spec.encode_key(self)
    }

    /// Consume the key, returning its values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for CursorKey {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for CursorKey {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Lexicographic comparison of two value tuples under `order`.
///
/// Column `i` of each tuple is compared with the direction of `order[i]`; the
/// first non-equal column decides. Components that cannot be compared (a kind
/// mismatch, which validated keys never contain) count as equal.
pub(crate) fn compare_values(order: &[SortField], a: &[Value], b: &[Value]) -> Ordering {
    order
        .iter()
        .zip(a.iter().zip(b))
        .map(|(sort, (left, right))| {
            sort.dir
                .apply(left.compare(right).unwrap_or(Ordering::Equal))
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
