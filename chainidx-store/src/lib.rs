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
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing))]

//! # chainidx-store - Ledger tables with paged reads
//!
//! In-memory tables for indexed chain entities. Writes are row versions
//! stamped with ledger time; reads see the newest version of each row and
//! come back one page at a time through [`chainidx_paging`].
//!
//! ```
//! use chainidx_paging::Pagination;
//! use chainidx_store::{KeyRotation, Store, StoreConfig};
//!
//! let store = Store::open(&StoreConfig::default()).unwrap();
//! for height in 1..=5 {
//!     store.key_rotations().add(KeyRotation {
//!         node_id: "deadbeef01".into(),
//!         old_pub_key: format!("cafed00d{height:02}"),
//!         new_pub_key: format!("cafed00d{:02}", height + 1),
//!         block_height: height,
//!         vega_time: height * 1_000_000_000,
//!         tx_hash: format!("tx{height}"),
//!     })
//!     .unwrap();
//! }
//!
//! let page = store
//!     .key_rotations()
//!     .list_by_node("deadbeef01", &Pagination::forward(Some(2), None).unwrap())
//!     .unwrap();
//! assert_eq!(page.len(), 2);
//! assert!(page.page_info.has_next_page);
//! ```

mod config;
mod delegations;
mod error;
mod key_rotations;
pub mod logging;
mod nodes;
mod proposals;
mod store;
mod table;
mod votes;

pub use config::{ConfigError, StoreConfig};
pub use delegations::{Delegation, DelegationFilter, Delegations};
pub use error::StoreError;
pub use key_rotations::{KeyRotation, KeyRotations};
pub use nodes::{Node, NodeStatus, Nodes};
pub use proposals::{Proposal, ProposalFilter, ProposalState, Proposals};
pub use store::Store;
pub use table::{LedgerRow, Table};
pub use votes::{Vote, VoteFilter, VoteValue, Votes};

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
