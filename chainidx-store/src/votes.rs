//! Governance votes.

use std::fmt;

use chainidx_paging::{
    CursorKey, Cursored, FilterExpr, Operator, Page, Pagination, PagingConfig, Record, SortColumn,
    SortSpec, SortSpecError, Value, ValueKind, simple,
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::table::{LedgerRow, Table};

/// A party's choice on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    /// In favour.
    Yes,
    /// Against.
    No,
}

impl VoteValue {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One party's vote on one proposal, as of one ledger time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Proposal voted on.
    pub proposal_id: String,
    /// Voting party.
    pub party_id: String,
    /// Choice.
    pub value: VoteValue,
    /// Governance token balance backing the vote, as a decimal string.
    pub total_governance_token_balance: String,
    /// Ledger time of this version.
    pub vega_time: i64,
    /// Transaction that cast this version.
    pub tx_hash: String,
}

impl Cursored for Vote {
    fn cursor_key(&self) -> CursorKey {
        CursorKey::new(vec![
            Value::Timestamp(self.vega_time),
            Value::Text(self.party_id.clone()),
            Value::Text(self.proposal_id.clone()),
        ])
    }
}

impl Record for Vote {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "proposal_id" => Some((&self.proposal_id).into()),
            "party_id" => Some((&self.party_id).into()),
            "value" => Some(self.value.as_str().into()),
            "vega_time" => Some(Value::Timestamp(self.vega_time)),
            "tx_hash" => Some((&self.tx_hash).into()),
            _ => None,
        }
    }
}

impl LedgerRow for Vote {
    const TABLE: &'static str = "votes";
    type Key = (String, String);

    fn key(&self) -> (String, String) {
        (self.proposal_id.clone(), self.party_id.clone())
    }

    fn vega_time(&self) -> i64 {
        self.vega_time
    }

    fn sort_spec() -> Result<SortSpec, SortSpecError> {
        SortSpec::composite([
            SortColumn::asc("vega_time", ValueKind::Timestamp),
            SortColumn::asc("party_id", ValueKind::Text),
            SortColumn::asc("proposal_id", ValueKind::Text),
        ])
    }
}

/// Narrows a vote listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteFilter {
    /// Only votes on this proposal.
    pub proposal_id: Option<String>,
    /// Only votes cast by this party.
    pub party_id: Option<String>,
    /// Only votes with this choice.
    pub value: Option<VoteValue>,
}

impl VoteFilter {
    /// Votes cast by `party_id`.
    pub fn by_party(party_id: impl Into<String>) -> Self {
        Self {
            party_id: Some(party_id.into()),
            ..Self::default()
        }
    }

    fn to_expr(&self) -> Option<FilterExpr> {
        [
            self.proposal_id
                .as_ref()
                .map(|id| simple("proposal_id", Operator::Eq, id)),
            self.party_id
                .as_ref()
                .map(|party| simple("party_id", Operator::Eq, party)),
            self.value
                .map(|value| simple("value", Operator::Eq, value.as_str())),
        ]
        .into_iter()
        .fold(None, FilterExpr::conjoin)
    }
}

/// Vote table.
#[derive(Debug)]
pub struct Votes {
    table: Table<Vote>,
}

impl Votes {
    /// Empty table.
    pub fn new(paging: PagingConfig) -> Result<Self, StoreError> {
        Ok(Self {
            table: Table::new(paging)?,
        })
    }

    /// Underlying table, for pagination and raw access.
    pub const fn table(&self) -> &Table<Vote> {
        &self.table
    }

    /// Record a vote. A second vote by the same party on the same proposal
    /// in the same block replaces the first.
    pub fn add(&self, vote: Vote) -> Result<(), StoreError> {
        self.table.upsert(vote)
    }

    /// Current votes cast in transaction `tx_hash`.
    pub fn get_by_tx_hash(&self, tx_hash: &str) -> Result<Vec<Vote>, StoreError> {
        self.table
            .find(Some(&simple("tx_hash", Operator::Eq, tx_hash)))
    }

    /// One page of votes matching `filter`.
    pub fn list(&self, filter: &VoteFilter, pagination: &Pagination) -> Result<Page<Vote>, StoreError> {
        self.table.page(pagination, filter.to_expr().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(party: &str, proposal: &str, value: VoteValue, vega_time: i64, tx: &str) -> Vote {
        Vote {
            proposal_id: proposal.to_string(),
            party_id: party.to_string(),
            value,
            total_governance_token_balance: "100".to_string(),
            vega_time,
            tx_hash: tx.to_string(),
        }
    }

    /// Two parties, two proposals; party2 changes one vote in the same block
    /// and the other in a later block.
    fn store() -> Votes {
        let store = Votes::new(PagingConfig::default()).unwrap();
        for row in [
            vote("party1", "prop1", VoteValue::Yes, 1, "tx_vote_1"),
            vote("party1", "prop2", VoteValue::Yes, 1, "tx_vote_2"),
            vote("party2", "prop1", VoteValue::Yes, 1, "tx_vote_3"),
            vote("party2", "prop1", VoteValue::No, 1, "tx_vote_4"),
            vote("party2", "prop2", VoteValue::Yes, 1, "tx_vote_5"),
            vote("party2", "prop2", VoteValue::No, 2, "tx_vote_6"),
        ] {
            store.add(row).unwrap();
        }
        store
    }

    fn txs(votes: &[Vote]) -> Vec<&str> {
        votes.iter().map(|v| v.tx_hash.as_str()).collect()
    }

    fn list(filter: &VoteFilter) -> Vec<Vote> {
        store().list(filter, &Pagination::default()).unwrap().rows
    }

    #[test]
    fn test_list_all_current_votes() {
        let votes = list(&VoteFilter::default());
        assert_eq!(txs(&votes), vec!["tx_vote_1", "tx_vote_2", "tx_vote_4", "tx_vote_6"]);
    }

    #[test]
    fn test_get_by_tx_hash() {
        let store = store();
        assert_eq!(txs(&store.get_by_tx_hash("tx_vote_1").unwrap()), vec!["tx_vote_1"]);
        assert_eq!(txs(&store.get_by_tx_hash("tx_vote_2").unwrap()), vec!["tx_vote_2"]);
        // Replaced in the same block
        assert!(store.get_by_tx_hash("tx_vote_3").unwrap().is_empty());
    }

    #[test]
    fn test_by_proposal() {
        let filter = VoteFilter {
            proposal_id: Some("prop1".into()),
            ..VoteFilter::default()
        };
        assert_eq!(txs(&list(&filter)), vec!["tx_vote_1", "tx_vote_4"]);
    }

    #[test]
    fn test_by_party() {
        assert_eq!(
            txs(&list(&VoteFilter::by_party("party1"))),
            vec!["tx_vote_1", "tx_vote_2"]
        );
    }

    #[test]
    fn test_by_value() {
        let filter = VoteFilter {
            value: Some(VoteValue::No),
            ..VoteFilter::default()
        };
        assert_eq!(txs(&list(&filter)), vec!["tx_vote_4", "tx_vote_6"]);
    }

    #[test]
    fn test_by_everything() {
        let filter = VoteFilter {
            proposal_id: Some("prop1".into()),
            party_id: Some("party1".into()),
            value: Some(VoteValue::Yes),
        };
        assert_eq!(txs(&list(&filter)), vec!["tx_vote_1"]);
    }

    #[test]
    fn test_party_votes_paged_newest_first() {
        let store = Votes::new(PagingConfig::default()).unwrap();
        for i in 0..10 {
            store
                .add(vote("party", &format!("prop{i:02}"), VoteValue::Yes, i, &format!("tx{i}")))
                .unwrap();
        }
        let request = Pagination::forward(Some(3), None).unwrap().with_newest_first(true);
        let page = store.list(&VoteFilter::by_party("party"), &request).unwrap();
        assert_eq!(txs(&page.rows), vec!["tx9", "tx8", "tx7"]);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }
}
