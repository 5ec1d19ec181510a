//! Pagination error taxonomy.

use std::error::Error as StdError;
use std::fmt;

use crate::pagination::CursorError;

/// Boxed error returned by a failing row source.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A page-size argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitParam {
    /// `first`
    First,
    /// `last`
    Last,
}

impl fmt::Display for LimitParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::First => "first",
            Self::Last => "last",
        })
    }
}

/// A cursor argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorParam {
    /// `after`
    After,
    /// `before`
    Before,
}

impl CursorParam {
    /// The limit that gives this cursor a meaning.
    #[must_use]
    pub const fn paired_limit(self) -> LimitParam {
        match self {
            Self::After => LimitParam::First,
            Self::Before => LimitParam::Last,
        }
    }
}

impl fmt::Display for CursorParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::After => "after",
            Self::Before => "before",
        })
    }
}

/// Contradictory or out-of-range pagination arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum InvalidPagination {
    /// `first` and `last` were both supplied.
    #[error("cannot pass both first and last")]
    BothLimits,
    /// A limit was zero or negative.
    #[error("{param} must be positive, got {value}")]
    NonPositiveLimit {
        /// Offending argument.
        param: LimitParam,
        /// Value supplied.
        value: i64,
    },
    /// A limit exceeded the configured maximum page size.
    #[error("{param} must be at most {max}, got {value}")]
    LimitTooLarge {
        /// Offending argument.
        param: LimitParam,
        /// Value supplied.
        value: i64,
        /// Configured maximum.
        max: u32,
    },
    /// A cursor was supplied without its limit while strict cursors are on.
    #[error("{param} requires {expected}")]
    UnpairedCursor {
        /// Cursor argument.
        param: CursorParam,
        /// Limit argument it needs.
        expected: LimitParam,
    },
}

/// Errors returned by [`paginate`](crate::paginate) and request validation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PaginationError {
    /// The caller's arguments are contradictory or out of range.
    #[error("invalid pagination: {0}")]
    InvalidPagination(#[from] InvalidPagination),
    /// A cursor token could not be decoded for this sort order.
    #[error("malformed {param} cursor: {source}")]
    MalformedCursor {
        /// Argument that carried the token.
        param: CursorParam,
        /// Decoding failure.
        #[source]
        source: CursorError,
    },
    /// The row source failed; passed through unchanged.
    #[error("row source unavailable: {0}")]
    SourceUnavailable(#[source] BoxError),
}

impl PaginationError {
    /// Wrap a row-source failure.
    pub fn source_unavailable(err: impl Into<BoxError>) -> Self {
        Self::SourceUnavailable(err.into())
    }

    /// Returns `true` if the caller's input is at fault.
    #[inline]
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPagination(_) | Self::MalformedCursor { .. }
        )
    }

    /// Returns `true` if the row source failed.
    #[inline]
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }
}
