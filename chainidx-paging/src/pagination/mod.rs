//! Cursor-based, bidirectional keyset pagination.
//!
//! A page request flows through four steps:
//!
//! 1. [`Pagination`] validates `first`/`after`/`last`/`before`/`newestFirst`
//!    and decodes cursors against the entity's [`SortSpec`].
//! 2. [`PageQuery::plan`] derives the column order, the [`KeysetCondition`]
//!    bound, and the probe limit.
//! 3. A [`RowSource`] answers the query: [`MemorySource`] in memory, or a
//!    database running [`PageQuery::to_sql`].
//! 4. [`paginate`] trims the probe row, restores base order for backward
//!    pages, and fills in [`PageInfo`].
//!
//! # Example
//!
//! ```
//! use chainidx_paging::prelude::*;
//!
//! #[derive(Clone)]
//! struct Rotation {
//!     block_height: i64,
//!     node_id: String,
//! }
//!
//! impl Cursored for Rotation {
//!     fn cursor_key(&self) -> CursorKey {
//!         CursorKey::new(vec![Value::Int(self.block_height), Value::Text(self.node_id.clone())])
//!     }
//! }
//!
//! impl Record for Rotation {
//!     fn field(&self, name: &str) -> Option<Value> {
//!         match name {
//!             "block_height" => Some(Value::Int(self.block_height)),
//!             "node_id" => Some(Value::Text(self.node_id.clone())),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let spec = SortSpec::composite([
//!     SortColumn::asc("block_height", ValueKind::Int),
//!     SortColumn::asc("node_id", ValueKind::Text),
//! ])
//! .unwrap();
//!
//! let source: MemorySource<Rotation> = (1..=5)
//!     .map(|h| Rotation { block_height: h, node_id: "n1".into() })
//!     .collect();
//!
//! let request = Pagination::new(&spec, Some(2), None, None, None, false).unwrap();
//! let page = paginate(&spec, &request, &source, None).unwrap();
//! assert_eq!(page.len(), 2);
//! assert!(page.page_info.has_next_page);
//!
//! // Resume from the end cursor
//! let after = page.page_info.end_cursor.as_deref();
//! let request = Pagination::new(&spec, Some(2), after, None, None, false).unwrap();
//! let page = paginate(&spec, &request, &source, None).unwrap();
//! assert_eq!(page.rows[0].block_height, 3);
//! assert!(page.page_info.has_previous_page);
//! ```

mod assemble;
mod config;
mod cursor;
mod encoding;
mod key;
mod keyset;
mod memory;
mod page_info;
mod query;
mod request;
mod sort;
mod value_conv;

pub use assemble::{Cursored, RowSource, paginate};
pub use config::PagingConfig;
pub use cursor::{Cursor, CursorError, DEFAULT_MAX_CURSOR_LEN};
pub use key::CursorKey;
pub use keyset::KeysetCondition;
pub use memory::{MemorySource, select};
pub use page_info::{Edge, Page, PageInfo};
pub use query::PageQuery;
pub use request::{Direction, Pagination, RawPagination, Window};
pub use sort::{SortColumn, SortSpec, SortSpecError};
