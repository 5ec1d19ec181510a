//! Versioned ledger tables read through the pagination engine.
//!
//! Every write is a row version stamped with the ledger time it was made at.
//! Reads only ever see the newest version of each row, so a vote changed in a
//! later block replaces the earlier vote in every listing.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard};

use chainidx_paging::{
    Cursored, FilterExpr, Page, PageQuery, Pagination, PagingConfig, RawPagination, Record,
    RowSource, SortSpec, SortSpecError, paginate, select,
};
use tracing::trace;

use crate::error::StoreError;

/// A row type kept in a [`Table`].
pub trait LedgerRow: Cursored + Record + Clone {
    /// Table name used in logs and errors.
    const TABLE: &'static str;

    /// Identity shared by every version of the same row.
    type Key: Eq + Hash + Debug;

    /// This row's identity.
    fn key(&self) -> Self::Key;

    /// Ledger time the version was written at, in nanoseconds.
    fn vega_time(&self) -> i64;

    /// The fixed order rows of this type are listed in.
    fn sort_spec() -> Result<SortSpec, SortSpecError>;
}

/// Versions of every row, by key, oldest first.
type Versions<T> = HashMap<<T as LedgerRow>::Key, Vec<T>>;

/// Row versions of one entity behind a reader-writer lock.
#[derive(Debug)]
pub struct Table<T: LedgerRow> {
    spec: SortSpec,
    paging: PagingConfig,
    rows: RwLock<Versions<T>>,
}

impl<T: LedgerRow> Table<T> {
    /// Empty table validating requests against `paging`.
    pub fn new(paging: PagingConfig) -> Result<Self, StoreError> {
        let spec = T::sort_spec().map_err(|source| StoreError::SortSpec {
            table: T::TABLE,
            source,
        })?;
        Ok(Self {
            spec,
            paging,
            rows: RwLock::new(HashMap::new()),
        })
    }

    /// The order rows are listed in.
    pub const fn spec(&self) -> &SortSpec {
        &self.spec
    }

    /// Validate caller arguments against this table's order and limits.
    pub fn pagination(&self, raw: &RawPagination) -> Result<Pagination, StoreError> {
        Ok(Pagination::from_raw(&self.spec, raw, &self.paging)?)
    }

    /// Write a row version.
    ///
    /// A stored version with the same key and ledger time is replaced;
    /// anything else is kept and the new version is added alongside it.
    pub fn upsert(&self, row: T) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| poisoned::<T>())?;
        let vega_time = row.vega_time();
        let versions = rows.entry(row.key()).or_default();
        let pos = versions.partition_point(|stored| stored.vega_time() < vega_time);
        match versions.get_mut(pos) {
            Some(stored) if stored.vega_time() == vega_time => {
                trace!(table = T::TABLE, vega_time, "replacing row version");
                *stored = row;
            },
            // Late arrivals slot in behind newer versions
            _ => versions.insert(pos, row),
        }
        Ok(())
    }

    /// Newest version of every row, in listing order.
    pub fn current(&self) -> Result<Vec<T>, StoreError> {
        self.find(None)
    }

    /// Current rows matching `filter`, in listing order.
    pub fn find(&self, filter: Option<&FilterExpr>) -> Result<Vec<T>, StoreError> {
        let query = PageQuery::plan(&self.spec, &Pagination::default(), filter);
        self.fetch(&query)
    }

    /// One page of current rows matching `filter`.
    pub fn page(
        &self,
        pagination: &Pagination,
        filter: Option<&FilterExpr>,
    ) -> Result<Page<T>, StoreError> {
        Ok(paginate(&self.spec, pagination, self, filter)?)
    }

    /// Stored versions, superseded ones included.
    pub fn versions(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.values().map(Vec::len).sum())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Versions<T>>, StoreError> {
        self.rows.read().map_err(|_| poisoned::<T>())
    }
}

impl<T: LedgerRow> RowSource for Table<T> {
    type Row = T;
    type Error = StoreError;

    fn fetch(&self, query: &PageQuery<'_>) -> Result<Vec<T>, StoreError> {
        let rows = self.read()?;
        Ok(select(rows.values().filter_map(|versions| versions.last()), query))
    }
}

fn poisoned<T: LedgerRow>() -> StoreError {
    StoreError::Poisoned { table: T::TABLE }
}
