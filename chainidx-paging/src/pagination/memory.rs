//! In-memory row source.

use std::convert::Infallible;

use crate::builder::Record;

use super::assemble::{Cursored, RowSource};
use super::key::compare_values;
use super::query::PageQuery;

/// Rows held in memory, queried the way a database would answer the
/// rendered SQL: filter, bound, order, limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySource<T> {
    rows: Vec<T>,
}

impl<T> MemorySource<T> {
    /// Wrap rows in any order.
    pub const fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    /// Add a row.
    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// The stored rows, in insertion order.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for MemorySource<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> FromIterator<T> for MemorySource<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Cursored + Record + Clone> RowSource for MemorySource<T> {
    type Row = T;
    type Error = Infallible;

    fn fetch(&self, query: &PageQuery<'_>) -> Result<Vec<T>, Infallible> {
        Ok(select(&self.rows, query))
    }
}

/// Answer `query` over borrowed rows, cloning only the rows returned.
pub fn select<'a, T, I>(rows: I, query: &PageQuery<'_>) -> Vec<T>
where
    T: Cursored + Record + Clone + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut matched: Vec<_> = rows
        .into_iter()
        .filter(|row| query.filter().is_none_or(|filter| filter.matches(*row)))
        .map(|row| (row.cursor_key(), row))
        .filter(|(key, _)| query.bound().is_none_or(|bound| bound.admits(key)))
        .collect();

    matched.sort_by(|(a, _), (b, _)| compare_values(query.order(), a.values(), b.values()));

    let limit = query
        .limit()
        .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
    matched
        .into_iter()
        .take(limit)
        .map(|(_, row)| row.clone())
        .collect()
}
