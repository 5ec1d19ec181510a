//! Store error taxonomy.

use chainidx_paging::{PaginationError, SortSpecError};

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The request was invalid or the table could not be read.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    /// A lookup by identifier matched nothing.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name, e.g. `node`.
        entity: &'static str,
        /// Identifier looked up.
        id: String,
    },
    /// A writer panicked while holding the table lock.
    #[error("table {table} is poisoned")]
    Poisoned {
        /// Table name.
        table: &'static str,
    },
    /// An entity declared an unusable sort order.
    #[error("invalid sort order for {table}: {source}")]
    SortSpec {
        /// Table name.
        table: &'static str,
        /// Why the order was rejected.
        #[source]
        source: SortSpecError,
    },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns `true` when the caller sent something unusable.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Pagination(err) => err.is_client_error(),
            Self::NotFound { .. } => true,
            Self::Poisoned { .. } | Self::SortSpec { .. } => false,
        }
    }
}
