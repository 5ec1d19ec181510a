//! Page and PageInfo types for pagination responses.

use serde::{Deserialize, Serialize};

use super::assemble::Cursored;
use super::sort::SortSpec;

/// Page information for paginated responses.
///
/// Serializes in connection style:
///
/// ```
/// use chainidx_paging::PageInfo;
///
/// let info = PageInfo {
///     has_next_page: true,
///     start_cursor: Some("abc".into()),
///     ..PageInfo::default()
/// };
/// assert_eq!(
///     serde_json::to_string(&info).unwrap(),
///     r#"{"hasNextPage":true,"hasPreviousPage":false,"startCursor":"abc","endCursor":null}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether rows exist after this page.
    pub has_next_page: bool,
    /// Whether rows exist before this page.
    pub has_previous_page: bool,
    /// Token of the first row on the page.
    pub start_cursor: Option<String>,
    /// Token of the last row on the page.
    pub end_cursor: Option<String>,
}

/// One page of rows in base order, plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows in the requested order.
    pub rows: Vec<T>,
    /// Navigation metadata.
    pub page_info: PageInfo,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            page_info: PageInfo::default(),
        }
    }
}

impl<T> Page<T> {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the page has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert every row, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }

    /// Split into rows and metadata.
    pub fn into_parts(self) -> (Vec<T>, PageInfo) {
        (self.rows, self.page_info)
    }

    /// Pair every row with its own cursor token.
    pub fn edges<'a>(&'a self, spec: &'a SortSpec) -> impl Iterator<Item = Edge<'a, T>> + 'a
    where
        T: Cursored,
    {
        self.rows.iter().map(move |node| Edge {
            cursor: spec.encode_key(&node.cursor_key()),
            node,
        })
    }
}

/// A row together with the token that resumes pagination at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<'a, T> {
    /// The row.
    pub node: &'a T,
    /// Token for paging onward from this row.
    pub cursor: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Value, ValueKind};
    use crate::pagination::{CursorKey, SortColumn};

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64);

    impl Cursored for Row {
        fn cursor_key(&self) -> CursorKey {
            CursorKey::new(vec![Value::Int(self.0)])
        }
    }

    #[test]
    fn test_page_info_json() {
        let info = PageInfo {
            has_next_page: false,
            has_previous_page: true,
            start_cursor: Some("a".into()),
            end_cursor: Some("b".into()),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["hasPreviousPage"], true);
        assert_eq!(json["endCursor"], "b");
        let back: PageInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, info);
    }

    #[test]
    fn test_map_keeps_page_info() {
        let page = Page {
            rows: vec![Row(1), Row(2)],
            page_info: PageInfo {
                has_next_page: true,
                ..PageInfo::default()
            },
        };
        let mapped = page.map(|row| row.0 * 10);
        assert_eq!(mapped.rows, vec![10, 20]);
        assert!(mapped.page_info.has_next_page);
    }

    #[test]
    fn test_edges_carry_row_cursors() {
        let spec = SortSpec::new([SortColumn::asc("seq", ValueKind::Int).unique()]).unwrap();
        let page = Page {
            rows: vec![Row(3), Row(4)],
            page_info: PageInfo::default(),
        };
        let edges: Vec<_> = page.edges(&spec).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].node, &Row(4));
        assert_eq!(
            spec.decode_key(&edges[0].cursor).unwrap(),
            CursorKey::new(vec![Value::Int(3)])
        );
    }

    #[test]
    fn test_empty_page() {
        let page: Page<Row> = Page::default();
        assert!(page.is_empty());
        let (rows, info) = page.into_parts();
        assert!(rows.is_empty());
        assert_eq!(info, PageInfo::default());
    }
}
