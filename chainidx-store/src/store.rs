//! All entity tables behind one handle.

use tracing::info;

use crate::config::StoreConfig;
use crate::delegations::Delegations;
use crate::error::StoreError;
use crate::key_rotations::KeyRotations;
use crate::nodes::Nodes;
use crate::proposals::Proposals;
use crate::votes::Votes;

/// Every table, sharing one paging configuration.
///
/// Tables lock independently; share the store behind an `Arc` to read and
/// write from several threads.
#[derive(Debug)]
pub struct Store {
    proposals: Proposals,
    votes: Votes,
    nodes: Nodes,
    delegations: Delegations,
    key_rotations: KeyRotations,
}

impl Store {
    /// Empty tables validating requests against `config.paging`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let paging = &config.paging;
        let store = Self {
            proposals: Proposals::new(paging.clone())?,
            votes: Votes::new(paging.clone())?,
            nodes: Nodes::new(paging.clone())?,
            delegations: Delegations::new(paging.clone())?,
            key_rotations: KeyRotations::new(paging.clone())?,
        };
        info!(
            max_page_size = ?paging.max_page_size,
            strict_cursors = paging.strict_cursors,
            "store opened"
        );
        Ok(store)
    }

    /// Governance proposals.
    pub const fn proposals(&self) -> &Proposals {
        &self.proposals
    }

    /// Governance votes.
    pub const fn votes(&self) -> &Votes {
        &self.votes
    }

    /// Registered nodes.
    pub const fn nodes(&self) -> &Nodes {
        &self.nodes
    }

    /// Stake delegations.
    pub const fn delegations(&self) -> &Delegations {
        &self.delegations
    }

    /// Node key rotations.
    pub const fn key_rotations(&self) -> &KeyRotations {
        &self.key_rotations
    }
}
