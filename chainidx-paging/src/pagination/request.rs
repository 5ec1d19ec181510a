//! Pagination requests: raw caller arguments and their validated form.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CursorParam, InvalidPagination, LimitParam, PaginationError};

use super::config::PagingConfig;
use super::key::CursorKey;
use super::sort::SortSpec;

/// Which way a page extends from its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the end of the ordered set (`first`/`after`).
    Forward,
    /// Toward the beginning of the ordered set (`last`/`before`).
    Backward,
}

/// The window of rows a request selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Window {
    /// Every matching row, no page-size trimming.
    #[default]
    All,
    /// Up to `limit` rows strictly after `after` (or from the start).
    Forward {
        /// Page size.
        limit: u32,
        /// Exclusive lower position.
        after: Option<CursorKey>,
    },
    /// Up to `limit` rows strictly before `before` (or up to the end).
    Backward {
        /// Page size.
        limit: u32,
        /// Exclusive upper position.
        before: Option<CursorKey>,
    },
}

/// Pagination arguments exactly as a caller sends them.
///
/// ```
/// use chainidx_paging::RawPagination;
///
/// let raw: RawPagination =
///     serde_json::from_str(r#"{"first": 10, "after": "abc", "newestFirst": true}"#).unwrap();
/// assert_eq!(raw.first, Some(10));
/// assert!(raw.newest_first);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPagination {
    /// Page size when paging forward.
    pub first: Option<i64>,
    /// Token to page forward from.
    pub after: Option<String>,
    /// Page size when paging backward.
    pub last: Option<i64>,
    /// Token to page backward from.
    pub before: Option<String>,
    /// Flip the entity's natural order.
    pub newest_first: bool,
}

/// A validated pagination request.
///
/// Built once per query from caller arguments; cursors are already decoded
/// against the entity's [`SortSpec`]. The default request returns every row
/// oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    window: Window,
    newest_first: bool,
}

impl Pagination {
    /// Validate caller arguments with the default [`PagingConfig`].
    ///
    /// ```
    /// use chainidx_paging::{Direction, Pagination, SortColumn, SortSpec, ValueKind};
    ///
    /// let spec = SortSpec::new([SortColumn::asc("id", ValueKind::Text).unique()]).unwrap();
    ///
    /// let page = Pagination::new(&spec, Some(10), None, None, None, false).unwrap();
    /// assert_eq!(page.limit(), Some(10));
    /// assert_eq!(page.direction(), Direction::Forward);
    ///
    /// assert!(Pagination::new(&spec, Some(10), None, Some(10), None, false).is_err());
    /// ```
    pub fn new(
        spec: &SortSpec,
        first: Option<i64>,
        after: Option<&str>,
        last: Option<i64>,
        before: Option<&str>,
        newest_first: bool,
    ) -> Result<Self, PaginationError> {
        Self::validate(
            spec,
            Args {
                first,
                after,
                last,
                before,
                newest_first,
            },
            &PagingConfig::default(),
        )
    }

    /// Validate deserialized caller arguments.
    pub fn from_raw(
        spec: &SortSpec,
        raw: &RawPagination,
        config: &PagingConfig,
    ) -> Result<Self, PaginationError> {
        Self::validate(
            spec,
            Args {
                first: raw.first,
                after: raw.after.as_deref(),
                last: raw.last,
                before: raw.before.as_deref(),
                newest_first: raw.newest_first,
            },
            config,
        )
    }

    /// Every row, in natural order or newest first.
    #[must_use]
    pub const fn all(newest_first: bool) -> Self {
        Self {
            window: Window::All,
            newest_first,
        }
    }

    /// Up to `limit` rows after `after`.
    ///
    /// `None` for `limit` is the unbounded request; the cursor is then
    /// dropped. The key's shape is checked against the entity's
    /// [`SortSpec`] when the page is fetched.
    ///
    /// # Errors
    ///
    /// [`InvalidPagination::NonPositiveLimit`] for a zero limit.
    pub fn forward(
        limit: Option<u32>,
        after: Option<CursorKey>,
    ) -> Result<Self, InvalidPagination> {
        let window = match limit {
            None => Window::All,
            Some(limit) => Window::Forward {
                limit: nonzero(LimitParam::First, limit)?,
                after,
            },
        };
        Ok(Self {
            window,
            newest_first: false,
        })
    }

    /// Up to `limit` rows before `before`.
    ///
    /// # Errors
    ///
    /// [`InvalidPagination::NonPositiveLimit`] for a zero limit.
    pub fn backward(
        limit: Option<u32>,
        before: Option<CursorKey>,
    ) -> Result<Self, InvalidPagination> {
        let window = match limit {
            None => Window::All,
            Some(limit) => Window::Backward {
                limit: nonzero(LimitParam::Last, limit)?,
                before,
            },
        };
        Ok(Self {
            window,
            newest_first: false,
        })
    }

    /// Set the global order toggle.
    #[must_use]
    pub const fn with_newest_first(mut self, newest_first: bool) -> Self {
        self.newest_first = newest_first;
        self
    }

    /// The selected window.
    pub const fn window(&self) -> &Window {
        &self.window
    }

    /// Whether the entity's natural order is flipped.
    pub const fn newest_first(&self) -> bool {
        self.newest_first
    }

    /// Navigation direction; the unbounded request reads forward.
    pub const fn direction(&self) -> Direction {
        match self.window {
            Window::All | Window::Forward { .. } => Direction::Forward,
            Window::Backward { .. } => Direction::Backward,
        }
    }

    /// Page size, if bounded.
    pub const fn limit(&self) -> Option<u32> {
        match self.window {
            Window::All => None,
            Window::Forward { limit, .. } | Window::Backward { limit, .. } => Some(limit),
        }
    }

    /// The cursor the window extends from.
    pub const fn cursor(&self) -> Option<&CursorKey> {
        match &self.window {
            Window::All => None,
            Window::Forward { after: cursor, .. } | Window::Backward { before: cursor, .. } => {
                cursor.as_ref()
            },
        }
    }

    fn validate(
        spec: &SortSpec,
        args: Args<'_>,
        config: &PagingConfig,
    ) -> Result<Self, PaginationError> {
        if args.first.is_some() && args.last.is_some() {
            return Err(InvalidPagination::BothLimits.into());
        }
        let first = args
            .first
            .map(|value| check_limit(LimitParam::First, value, config))
            .transpose()?;
        let last = args
            .last
            .map(|value| check_limit(LimitParam::Last, value, config))
            .transpose()?;

        // Malformed tokens are reported even when the window ignores them
        let after = decode_cursor(spec, CursorParam::After, args.after, config)?;
        let before = decode_cursor(spec, CursorParam::Before, args.before, config)?;

        let window = match (first, last) {
            (Some(limit), _) => {
                unpaired(CursorParam::Before, before.is_some(), config)?;
                Window::Forward { limit, after }
            },
            (None, Some(limit)) => {
                unpaired(CursorParam::After, after.is_some(), config)?;
                Window::Backward { limit, before }
            },
            (None, None) => {
                unpaired(CursorParam::After, after.is_some(), config)?;
                unpaired(CursorParam::Before, before.is_some(), config)?;
                Window::All
            },
        };

        let pagination = Self {
            window,
            newest_first: args.newest_first,
        };
        debug!(
            direction = ?pagination.direction(),
            limit = ?pagination.limit(),
            has_cursor = pagination.cursor().is_some(),
            newest_first = pagination.newest_first,
            "pagination request validated"
        );
        Ok(pagination)
    }
}

struct Args<'a> {
    first: Option<i64>,
    after: Option<&'a str>,
    last: Option<i64>,
    before: Option<&'a str>,
    newest_first: bool,
}

fn check_limit(
    param: LimitParam,
    value: i64,
    config: &PagingConfig,
) -> Result<u32, InvalidPagination> {
    if value <= 0 {
        return Err(InvalidPagination::NonPositiveLimit { param, value });
    }
    let max = config.max_page_size.map_or(u32::MAX, NonZeroU32::get);
    match u32::try_from(value) {
        Ok(limit) if limit <= max => Ok(limit),
        _ => Err(InvalidPagination::LimitTooLarge { param, value, max }),
    }
}

const fn nonzero(param: LimitParam, limit: u32) -> Result<u32, InvalidPagination> {
    if limit == 0 {
        return Err(InvalidPagination::NonPositiveLimit { param, value: 0 });
    }
    Ok(limit)
}

fn decode_cursor(
    spec: &SortSpec,
    param: CursorParam,
    token: Option<&str>,
    config: &PagingConfig,
) -> Result<Option<CursorKey>, PaginationError> {
    token
        .map(|token| {
            spec.decode_key_with_limit(token, config.max_cursor_len)
                .map_err(|source| PaginationError::MalformedCursor { param, source })
        })
        .transpose()
}

/// Handle a decoded cursor that the chosen window does not use.
fn unpaired(
    param: CursorParam,
    present: bool,
    config: &PagingConfig,
) -> Result<(), InvalidPagination> {
    if !present {
        return Ok(());
    }
    if config.strict_cursors {
        return Err(InvalidPagination::UnpairedCursor {
            param,
            expected: param.paired_limit(),
        });
    }
    debug!(%param, "ignoring cursor without its matching limit");
    Ok(())
}
