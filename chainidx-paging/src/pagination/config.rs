//! Limits and strictness settings for request validation.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::cursor::DEFAULT_MAX_CURSOR_LEN;

/// Settings applied when turning raw caller arguments into a
/// [`Pagination`](super::Pagination).
///
/// ```
/// use std::num::NonZeroU32;
///
/// use chainidx_paging::PagingConfig;
///
/// let config: PagingConfig = serde_json::from_str(r#"{"max_page_size": 100}"#).unwrap();
/// assert_eq!(config.max_page_size, NonZeroU32::new(100));
/// assert_eq!(config.max_cursor_len, 4096);
/// assert!(!config.strict_cursors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagingConfig {
    /// Largest accepted `first`/`last`. `None` leaves page size unbounded;
    /// zero is refused when deserializing.
    pub max_page_size: Option<NonZeroU32>,
    /// Longest accepted cursor token, in bytes.
    pub max_cursor_len: usize,
    /// Reject a cursor that has no matching limit instead of ignoring it.
    pub strict_cursors: bool,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            max_page_size: None,
            max_cursor_len: DEFAULT_MAX_CURSOR_LEN,
            strict_cursors: false,
        }
    }
}

impl PagingConfig {
    /// Cap page sizes at `max`. Zero leaves page size unbounded.
    #[must_use]
    pub const fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = NonZeroU32::new(max);
        self
    }

    /// Reject unpaired cursors.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict_cursors = true;
        self
    }
}
