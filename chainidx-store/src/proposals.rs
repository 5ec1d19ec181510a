//! Governance proposals.

use std::fmt;

use chainidx_paging::{
    CursorKey, Cursored, FilterExpr, Operator, Page, Pagination, PagingConfig, Record, SortColumn,
    SortSpec, SortSpecError, Value, ValueKind, simple,
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::table::{LedgerRow, Table};

/// Lifecycle state of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalState {
    /// Accepted for voting.
    Open,
    /// Rejected before voting began.
    Rejected,
    /// Vote closed without reaching the required majority.
    Declined,
    /// Vote closed in favour.
    Passed,
    /// Passed and applied.
    Enacted,
    /// Could not be applied.
    Failed,
    /// Waiting for validators to confirm.
    WaitingForNodeVote,
}

impl ProposalState {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Rejected => "rejected",
            Self::Declined => "declined",
            Self::Passed => "passed",
            Self::Enacted => "enacted",
            Self::Failed => "failed",
            Self::WaitingForNodeVote => "waiting_for_node_vote",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A governance proposal as of one ledger time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal ID.
    pub id: String,
    /// Client-chosen reference.
    pub reference: String,
    /// Party that submitted it.
    pub party_id: String,
    /// Current state.
    pub state: ProposalState,
    /// Ledger time of this version.
    pub vega_time: i64,
    /// Transaction that produced this version.
    pub tx_hash: String,
}

impl Cursored for Proposal {
    fn cursor_key(&self) -> CursorKey {
        CursorKey::new(vec![
            Value::Timestamp(self.vega_time),
            Value::Text(self.id.clone()),
        ])
    }
}

impl Record for Proposal {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some((&self.id).into()),
            "reference" => Some((&self.reference).into()),
            "party_id" => Some((&self.party_id).into()),
            "state" => Some(self.state.as_str().into()),
            "vega_time" => Some(Value::Timestamp(self.vega_time)),
            "tx_hash" => Some((&self.tx_hash).into()),
            _ => None,
        }
    }
}

impl LedgerRow for Proposal {
    const TABLE: &'static str = "proposals";
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn vega_time(&self) -> i64 {
        self.vega_time
    }

    fn sort_spec() -> Result<SortSpec, SortSpecError> {
        SortSpec::new([
            SortColumn::asc("vega_time", ValueKind::Timestamp),
            SortColumn::asc("id", ValueKind::Text).unique(),
        ])
    }
}

/// Narrows a proposal listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalFilter {
    /// Only proposals in this state.
    pub state: Option<ProposalState>,
    /// Only proposals submitted by this party.
    pub party_id: Option<String>,
    /// Only the proposal with this reference.
    pub reference: Option<String>,
}

impl ProposalFilter {
    fn to_expr(&self) -> Option<FilterExpr> {
        [
            self.state
                .map(|state| simple("state", Operator::Eq, state.as_str())),
            self.party_id
                .as_ref()
                .map(|party| simple("party_id", Operator::Eq, party)),
            self.reference
                .as_ref()
                .map(|reference| simple("reference", Operator::Eq, reference)),
        ]
        .into_iter()
        .fold(None, FilterExpr::conjoin)
    }
}

/// Proposal table.
#[derive(Debug)]
pub struct Proposals {
    table: Table<Proposal>,
}

impl Proposals {
    /// Empty table.
    pub fn new(paging: PagingConfig) -> Result<Self, StoreError> {
        Ok(Self {
            table: Table::new(paging)?,
        })
    }

    /// Underlying table, for pagination and raw access.
    pub const fn table(&self) -> &Table<Proposal> {
        &self.table
    }

    /// Record a proposal version.
    pub fn add(&self, proposal: Proposal) -> Result<(), StoreError> {
        self.table.upsert(proposal)
    }

    /// Current version of proposal `id`.
    pub fn get_by_id(&self, id: &str) -> Result<Proposal, StoreError> {
        self.table
            .find(Some(&simple("id", Operator::Eq, id)))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("proposal", id))
    }

    /// Current version of the proposal submitted with `reference`.
    pub fn get_by_reference(&self, reference: &str) -> Result<Proposal, StoreError> {
        self.table
            .find(Some(&simple("reference", Operator::Eq, reference)))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("proposal", reference))
    }

    /// One page of proposals matching `filter`.
    pub fn list(
        &self,
        filter: &ProposalFilter,
        pagination: &Pagination,
    ) -> Result<Page<Proposal>, StoreError> {
        self.table.page(pagination, filter.to_expr().as_ref())
    }
}
