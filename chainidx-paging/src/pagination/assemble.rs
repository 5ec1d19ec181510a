//! Page assembly: one bounded fetch, probe-row trimming, and page metadata.

use tracing::{debug, warn};

use crate::builder::FilterExpr;
use crate::error::{BoxError, CursorParam, PaginationError};

use super::key::CursorKey;
use super::page_info::{Page, PageInfo};
use super::query::PageQuery;
use super::request::{Direction, Pagination};
use super::sort::SortSpec;

/// Extraction of a row's position in its entity's sort order.
pub trait Cursored {
    /// The row's sort-column values, in [`SortSpec`] column order.
    fn cursor_key(&self) -> CursorKey;
}

impl<T: Cursored + ?Sized> Cursored for &T {
    fn cursor_key(&self) -> CursorKey {
        (**self).cursor_key()
    }
}

/// Something that can execute a [`PageQuery`].
///
/// Implementations must return rows matching the query's filter and bound,
/// in exactly the query's order, and no more than its limit.
pub trait RowSource {
    /// Row type produced.
    type Row;
    /// Failure type, surfaced as [`PaginationError::SourceUnavailable`].
    type Error: Into<BoxError>;

    /// Run the query.
    fn fetch(&self, query: &PageQuery<'_>) -> Result<Vec<Self::Row>, Self::Error>;
}

impl<S: RowSource + ?Sized> RowSource for &S {
    type Row = S::Row;
    type Error = S::Error;

    fn fetch(&self, query: &PageQuery<'_>) -> Result<Vec<Self::Row>, Self::Error> {
        (**self).fetch(query)
    }
}

/// Fetch one page of rows from `source`.
///
/// Issues exactly one [`RowSource::fetch`]. Bounded windows ask for one row
/// more than the page size; finding it means another page exists in the
/// direction of travel. Backward pages are read in flipped order and turned
/// back before returning, so rows always come out in base order.
///
/// `filter` is AND-ed with the keyset bound and applies to every page alike.
///
/// # Errors
///
/// [`PaginationError::MalformedCursor`] if the request's cursor does not have
/// one component per column of `spec`, each of the declared kind.
/// [`PaginationError::SourceUnavailable`] if the source fails. No partial
/// page is ever returned.
pub fn paginate<S>(
    spec: &SortSpec,
    pagination: &Pagination,
    source: &S,
    filter: Option<&FilterExpr>,
) -> Result<Page<S::Row>, PaginationError>
where
    S: RowSource + ?Sized,
    S::Row: Cursored,
{
    if let Some(key) = pagination.cursor() {
        let param = match pagination.direction() {
            Direction::Forward => CursorParam::After,
            Direction::Backward => CursorParam::Before,
        };
        spec.check_key(key)
            .map_err(|source| PaginationError::MalformedCursor { param, source })?;
    }

    let query = PageQuery::plan(spec, pagination, filter);
    let mut rows = source.fetch(&query).map_err(|err| {
        let err: BoxError = err.into();
        warn!(error = %err, "row source failed");
        PaginationError::SourceUnavailable(err)
    })?;

    let direction = pagination.direction();
    let (has_next_page, has_previous_page) = match pagination.limit() {
        None => (false, false),
        Some(limit) => {
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            let overflow = rows.len() > limit;
            if overflow {
                debug!(limit, fetched = rows.len(), "probe row present, trimming");
            }
            rows.truncate(limit);
            let from_cursor = pagination.cursor().is_some();
            match direction {
                Direction::Forward => (overflow, from_cursor),
                Direction::Backward => (from_cursor, overflow),
            }
        },
    };

    if direction == Direction::Backward {
        rows.reverse();
    }

    let page_info = PageInfo {
        has_next_page,
        has_previous_page,
        start_cursor: rows.first().map(|row| spec.encode_key(&row.cursor_key())),
        end_cursor: rows.last().map(|row| spec.encode_key(&row.cursor_key())),
    };
    Ok(Page { rows, page_info })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::convert::Infallible;

    use super::*;
    use crate::builder::{Value, ValueKind};
    use crate::pagination::SortColumn;
    use crate::pagination::cursor::CursorError;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Row(i64);

    impl Cursored for Row {
        fn cursor_key(&self) -> CursorKey {
            CursorKey::new(vec![Value::Int(self.0)])
        }
    }

    fn spec() -> SortSpec {
        SortSpec::new([SortColumn::asc("seq", ValueKind::Int).unique()]).unwrap()
    }

    /// Returns a fixed batch and counts calls.
    struct Canned {
        rows: Vec<Row>,
        calls: Cell<usize>,
    }

    impl Canned {
        fn new(rows: &[i64]) -> Self {
            Self {
                rows: rows.iter().copied().map(Row).collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl RowSource for Canned {
        type Row = Row;
        type Error = Infallible;

        fn fetch(&self, _query: &PageQuery<'_>) -> Result<Vec<Row>, Infallible> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.rows.clone())
        }
    }

    struct Broken;

    impl RowSource for Broken {
        type Row = Row;
        type Error = std::io::Error;

        fn fetch(&self, _query: &PageQuery<'_>) -> Result<Vec<Row>, std::io::Error> {
            Err(std::io::Error::other("connection refused"))
        }
    }

    #[test]
    fn test_forward_overflow_trims_probe_row() {
        let source = Canned::new(&[1, 2, 3, 4]);
        let request = Pagination::forward(Some(3), None).unwrap();
        let page = paginate(&spec(), &request, &source, None).unwrap();
        assert_eq!(page.rows, vec![Row(1), Row(2), Row(3)]);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_forward_without_overflow() {
        let source = Canned::new(&[5, 6]);
        let after = CursorKey::new(vec![Value::Int(4)]);
        let request = Pagination::forward(Some(3), Some(after)).unwrap();
        let page = paginate(&spec(), &request, &source, None).unwrap();
        assert_eq!(page.len(), 2);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_backward_reverses_into_base_order() {
        // Source answers in flipped order: nearest the end first
        let source = Canned::new(&[20, 19, 18, 17]);
        let request = Pagination::backward(Some(3), None).unwrap();
        let page = paginate(&spec(), &request, &source, None).unwrap();
        assert_eq!(page.rows, vec![Row(18), Row(19), Row(20)]);
        assert!(page.page_info.has_previous_page);
        assert!(!page.page_info.has_next_page);
    }

    #[test]
    fn test_backward_from_cursor_sets_next() {
        let source = Canned::new(&[3, 2]);
        let before = CursorKey::new(vec![Value::Int(4)]);
        let request = Pagination::backward(Some(2), Some(before)).unwrap();
        let page = paginate(&spec(), &request, &source, None).unwrap();
        assert_eq!(page.rows, vec![Row(2), Row(3)]);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_unbounded_returns_everything() {
        let source = Canned::new(&[1, 2, 3]);
        let page = paginate(&spec(), &Pagination::default(), &source, None).unwrap();
        assert_eq!(page.len(), 3);
        assert!(!page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_cursors_come_from_edge_rows() {
        let spec = spec();
        let source = Canned::new(&[7, 8, 9]);
        let request = Pagination::forward(Some(2), None).unwrap();
        let page = paginate(&spec, &request, &source, None).unwrap();
        let start = page.page_info.start_cursor.as_deref().unwrap();
        let end = page.page_info.end_cursor.as_deref().unwrap();
        assert_eq!(spec.decode_key(start).unwrap(), Row(7).cursor_key());
        assert_eq!(spec.decode_key(end).unwrap(), Row(8).cursor_key());
    }

    #[test]
    fn test_empty_page_has_no_cursors() {
        let source = Canned::new(&[]);
        let request = Pagination::forward(Some(5), None).unwrap();
        let page = paginate(&spec(), &request, &source, None).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.page_info, PageInfo::default());
    }

    #[test]
    fn test_extra_rows_past_probe_are_discarded() {
        let source = Canned::new(&[1, 2, 3, 4, 5, 6]);
        let request = Pagination::forward(Some(2), None).unwrap();
        let page = paginate(&spec(), &request, &source, None).unwrap();
        assert_eq!(page.rows, vec![Row(1), Row(2)]);
        assert!(page.page_info.has_next_page);
    }

    #[test]
    fn test_source_failure_passes_through() {
        let err = paginate(&spec(), &Pagination::default(), &Broken, None).unwrap_err();
        assert!(err.is_source_error());
        assert!(err.to_string().contains("connection refused"));
    }

    /// (vega_time, id) rows; the bare spec() above has a single column.
    fn timed_spec() -> SortSpec {
        SortSpec::new([
            SortColumn::asc("vega_time", ValueKind::Timestamp),
            SortColumn::asc("id", ValueKind::Text).unique(),
        ])
        .unwrap()
    }

    #[test]
    fn test_short_cursor_key_rejected() {
        let source = Canned::new(&[1, 2, 3]);
        let after = CursorKey::new(vec![Value::Timestamp(2)]);
        let request = Pagination::forward(Some(2), Some(after)).unwrap();
        let err = paginate(&timed_spec(), &request, &source, None).unwrap_err();
        assert!(matches!(
            err,
            PaginationError::MalformedCursor {
                param: CursorParam::After,
                source: CursorError::FieldCount {
                    expected: 2,
                    found: 1
                }
            }
        ));
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_long_cursor_key_rejected() {
        let source = Canned::new(&[1, 2, 3]);
        let before = CursorKey::new(vec![Value::Int(2), Value::Int(3)]);
        let request = Pagination::backward(Some(2), Some(before)).unwrap();
        let err = paginate(&spec(), &request, &source, None).unwrap_err();
        assert!(matches!(
            err,
            PaginationError::MalformedCursor {
                param: CursorParam::Before,
                source: CursorError::FieldCount { .. }
            }
        ));
    }

    #[test]
    fn test_wrong_kind_cursor_key_rejected() {
        let source = Canned::new(&[1, 2, 3]);
        let after = CursorKey::new(vec![Value::Int(1), Value::Text("a".into())]);
        let request = Pagination::forward(Some(2), Some(after)).unwrap();
        let err = paginate(&timed_spec(), &request, &source, None).unwrap_err();
        assert!(err.is_client_error());
        assert!(matches!(
            err,
            PaginationError::MalformedCursor {
                source: CursorError::FieldKind { .. },
                ..
            }
        ));
        assert_eq!(source.calls.get(), 0);
    }

    #[test]
    fn test_unused_cursor_key_not_checked() {
        // Unbounded requests carry no cursor
        let source = Canned::new(&[1, 2]);
        let request = Pagination::forward(None, Some(CursorKey::new(vec![]))).unwrap();
        let page = paginate(&timed_spec(), &request, &source, None).unwrap();
        assert_eq!(page.len(), 2);
    }
}
