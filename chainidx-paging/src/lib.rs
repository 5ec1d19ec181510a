// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Column names in docs read better unticked
#![allow(clippy::return_self_not_must_use)] // Builder pattern methods return Self by design
#![allow(clippy::format_push_string)] // String building style preference
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing))]

//! # chainidx-paging - Cursor-based bidirectional pagination
//!
//! Keyset pagination for ledger-indexed records: page forward or backward
//! through a result set ordered by several columns, resume from an opaque
//! token, and learn whether more pages exist either way, with one fetch per
//! page and no counting query.
//!
//! ## Quick Start
//!
//! ```
//! # use chainidx_paging::prelude::*;
//! let spec = SortSpec::new([
//!     SortColumn::asc("vega_time", ValueKind::Timestamp),
//!     SortColumn::asc("id", ValueKind::Text).unique(),
//! ])
//! .unwrap();
//!
//! // first: 20, after: <token of the previous page's last row>
//! let after = CursorKey::new(vec![Value::Timestamp(1_700_000_000), Value::Text("p9".into())])
//!     .encode(&spec);
//! let request = Pagination::new(&spec, Some(20), Some(&after), None, None, false).unwrap();
//!
//! // Render the single query a SQL row source runs
//! let query = PageQuery::plan(&spec, &request, None);
//! let result = query.to_sql(Postgres, "proposals", &[]);
//! assert_eq!(
//!     result.sql,
//!     "SELECT * FROM proposals WHERE (vega_time > $1 OR (vega_time = $2 AND id > $3)) \
//!      ORDER BY vega_time ASC, id ASC LIMIT 21"
//! );
//! ```
//!
//! ## Backward and newest-first
//!
//! `last`/`before` read the flipped order and reverse the rows, so pages
//! always come back in the requested order:
//!
//! ```
//! # use chainidx_paging::prelude::*;
//! let spec = SortSpec::new([SortColumn::asc("id", ValueKind::Int).unique()]).unwrap();
//!
//! let request = Pagination::new(&spec, None, None, Some(5), None, false).unwrap();
//! let sql = PageQuery::plan(&spec, &request, None).to_sql(Sqlite, "nodes", &["id"]).sql;
//! assert_eq!(sql, "SELECT id FROM nodes ORDER BY id DESC LIMIT 6");
//!
//! let request = Pagination::new(&spec, Some(5), None, None, None, true).unwrap();
//! let sql = PageQuery::plan(&spec, &request, None).to_sql(Sqlite, "nodes", &["id"]).sql;
//! assert_eq!(sql, "SELECT id FROM nodes ORDER BY id DESC LIMIT 6");
//! ```
//!
//! ## Errors
//!
//! | Error | Cause |
//! |-------|-------|
//! | [`PaginationError::InvalidPagination`] | `first` and `last` together, a limit ≤ 0, a limit above the configured maximum |
//! | [`PaginationError::MalformedCursor`] | a token that does not decode for this sort order |
//! | [`PaginationError::SourceUnavailable`] | the row source failed |

mod builder;
mod dialect;
mod error;
mod pagination;
mod validate;

pub use builder::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, QueryResult, Record, SelectBuilder,
    SortDir, SortField, Value, ValueKind, and, not, or, simple,
};
pub use dialect::{Dialect, Postgres, Sqlite};
pub use error::{BoxError, CursorParam, InvalidPagination, LimitParam, PaginationError};
pub use pagination::{
    Cursor, CursorError, CursorKey, Cursored, DEFAULT_MAX_CURSOR_LEN, Direction, Edge,
    KeysetCondition, MemorySource, Page, PageInfo, PageQuery, Pagination, PagingConfig,
    RawPagination, RowSource, SortColumn, SortSpec, SortSpecError, Window, paginate, select,
};
pub use validate::{assert_valid_sql_identifier, is_valid_sql_identifier};

/// Build a Postgres `SELECT` on `table`.
///
/// ```
/// # use chainidx_paging::prelude::*;
/// let result = postgres("votes")
///     .fields(&["party_id", "value"])
///     .filter(simple("proposal_id", Operator::Eq, "p1"))
///     .build();
/// assert_eq!(result.sql, "SELECT party_id, value FROM votes WHERE proposal_id = $1");
/// ```
#[must_use]
pub fn postgres(table: &str) -> SelectBuilder<Postgres> {
    SelectBuilder::new(Postgres, table)
}

/// Build a `SQLite` `SELECT` on `table` (`?1`, `?2` placeholders).
#[must_use]
pub fn sqlite(table: &str) -> SelectBuilder<Sqlite> {
    SelectBuilder::new(Sqlite, table)
}

/// Prelude module for convenient imports.
///
/// ```
/// use chainidx_paging::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CompoundFilter, Cursor, CursorError, CursorKey, Cursored, Dialect, Direction, Edge,
        Filter, FilterExpr, KeysetCondition, LogicalOp, MemorySource, Operator, Page, PageInfo,
        PageQuery, Pagination, PaginationError, PagingConfig, Postgres, QueryResult,
        RawPagination, Record, RowSource, SelectBuilder, SortColumn, SortDir, SortField, SortSpec,
        Sqlite, Value, ValueKind, and, not, or, paginate, postgres, simple, sqlite,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
