//! Stake delegations per epoch.

use chainidx_paging::{
    CursorKey, Cursored, FilterExpr, Operator, Page, Pagination, PagingConfig, Record, SortColumn,
    SortSpec, SortSpecError, Value, ValueKind, simple,
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::table::{LedgerRow, Table};

/// Stake a party has delegated to a node for one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    /// Delegating party.
    pub party_id: String,
    /// Receiving node.
    pub node_id: String,
    /// Epoch the delegation applies to.
    pub epoch_id: i64,
    /// Amount delegated, as a decimal string.
    pub amount: String,
    /// Ledger time of this version.
    pub vega_time: i64,
}

impl Cursored for Delegation {
    fn cursor_key(&self) -> CursorKey {
        CursorKey::new(vec![
            Value::Int(self.epoch_id),
            Value::Text(self.party_id.clone()),
            Value::Text(self.node_id.clone()),
        ])
    }
}

impl Record for Delegation {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "party_id" => Some((&self.party_id).into()),
            "node_id" => Some((&self.node_id).into()),
            "epoch_id" => Some(Value::Int(self.epoch_id)),
            "amount" => Some((&self.amount).into()),
            "vega_time" => Some(Value::Timestamp(self.vega_time)),
            _ => None,
        }
    }
}

impl LedgerRow for Delegation {
    const TABLE: &'static str = "delegations";
    type Key = (String, String, i64);

    fn key(&self) -> (String, String, i64) {
        (self.party_id.clone(), self.node_id.clone(), self.epoch_id)
    }

    fn vega_time(&self) -> i64 {
        self.vega_time
    }

    fn sort_spec() -> Result<SortSpec, SortSpecError> {
        SortSpec::composite([
            SortColumn::asc("epoch_id", ValueKind::Int),
            SortColumn::asc("party_id", ValueKind::Text),
            SortColumn::asc("node_id", ValueKind::Text),
        ])
    }
}

/// Narrows a delegation listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegationFilter {
    /// Only delegations from this party.
    pub party_id: Option<String>,
    /// Only delegations to this node.
    pub node_id: Option<String>,
    /// Only delegations for this epoch.
    pub epoch_id: Option<i64>,
}

impl DelegationFilter {
    fn to_expr(&self) -> Option<FilterExpr> {
        [
            self.party_id
                .as_ref()
                .map(|party| simple("party_id", Operator::Eq, party)),
            self.node_id
                .as_ref()
                .map(|node| simple("node_id", Operator::Eq, node)),
            self.epoch_id
                .map(|epoch| simple("epoch_id", Operator::Eq, epoch)),
        ]
        .into_iter()
        .fold(None, FilterExpr::conjoin)
    }
}

/// Delegation table.
#[derive(Debug)]
pub struct Delegations {
    table: Table<Delegation>,
}

impl Delegations {
    /// Empty table.
    pub fn new(paging: PagingConfig) -> Result<Self, StoreError> {
        Ok(Self {
            table: Table::new(paging)?,
        })
    }

    /// Underlying table, for pagination and raw access.
    pub const fn table(&self) -> &Table<Delegation> {
        &self.table
    }

    /// Record a delegation version.
    pub fn add(&self, delegation: Delegation) -> Result<(), StoreError> {
        self.table.upsert(delegation)
    }

    /// One page of delegations matching `filter`.
    pub fn list(
        &self,
        filter: &DelegationFilter,
        pagination: &Pagination,
    ) -> Result<Page<Delegation>, StoreError> {
        self.table.page(pagination, filter.to_expr().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delegation(party: &str, node: &str, epoch_id: i64, amount: u32) -> Delegation {
        Delegation {
            party_id: party.to_string(),
            node_id: node.to_string(),
            epoch_id,
            amount: amount.to_string(),
            vega_time: epoch_id * 1_000,
        }
    }

    fn store() -> Delegations {
        let store = Delegations::new(PagingConfig::default()).unwrap();
        for epoch in 1..=3 {
            for party in ["party1", "party2"] {
                for node in ["node1", "node2"] {
                    store.add(delegation(party, node, epoch, 100)).unwrap();
                }
            }
        }
        store
    }

    fn keys(page: &Page<Delegation>) -> Vec<(i64, &str, &str)> {
        page.rows
            .iter()
            .map(|d| (d.epoch_id, d.party_id.as_str(), d.node_id.as_str()))
            .collect()
    }

    #[test]
    fn test_filter_by_party_node_and_epoch() {
        let filter = DelegationFilter {
            party_id: Some("party2".into()),
            node_id: Some("node1".into()),
            epoch_id: Some(2),
        };
        let page = store().list(&filter, &Pagination::default()).unwrap();
        assert_eq!(keys(&page), vec![(2, "party2", "node1")]);
    }

    #[test]
    fn test_epoch_pages_walk_composite_order() {
        let store = store();
        let filter = DelegationFilter {
            epoch_id: Some(1),
            ..DelegationFilter::default()
        };
        let page = store
            .list(&filter, &Pagination::forward(Some(3), None).unwrap())
            .unwrap();
        assert_eq!(
            keys(&page),
            vec![(1, "party1", "node1"), (1, "party1", "node2"), (1, "party2", "node1")]
        );
        assert!(page.page_info.has_next_page);

        let after = store
            .table()
            .spec()
            .decode_key(page.page_info.end_cursor.as_deref().unwrap())
            .unwrap();
        let page = store
            .list(&filter, &Pagination::forward(Some(3), Some(after)).unwrap())
            .unwrap();
        assert_eq!(keys(&page), vec![(1, "party2", "node2")]);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_node_delegations_newest_epoch_first() {
        let filter = DelegationFilter {
            node_id: Some("node2".into()),
            ..DelegationFilter::default()
        };
        let request = Pagination::forward(Some(2), None).unwrap().with_newest_first(true);
        let page = store().list(&filter, &request).unwrap();
        assert_eq!(keys(&page), vec![(3, "party2", "node2"), (3, "party1", "node2")]);
    }

    #[test]
    fn test_amount_update_in_epoch() {
        let store = store();
        let mut update = delegation("party1", "node1", 1, 250);
        update.vega_time += 1;
        store.add(update).unwrap();

        let filter = DelegationFilter {
            party_id: Some("party1".into()),
            node_id: Some("node1".into()),
            epoch_id: Some(1),
        };
        let page = store.list(&filter, &Pagination::default()).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.rows[0].amount, "250");
    }
}
