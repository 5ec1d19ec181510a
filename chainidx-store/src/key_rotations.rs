//! Node public key rotations.

use chainidx_paging::{
    CursorKey, Cursored, Operator, Page, Pagination, PagingConfig, Record, SortColumn, SortSpec,
    SortSpecError, Value, ValueKind, simple,
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::table::{LedgerRow, Table};

/// A node replacing its public key at a block height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRotation {
    /// Rotating node.
    pub node_id: String,
    /// Key being retired.
    pub old_pub_key: String,
    /// Key taking over.
    pub new_pub_key: String,
    /// Height the new key becomes active at.
    pub block_height: i64,
    /// Ledger time the rotation was recorded.
    pub vega_time: i64,
    /// Transaction that submitted the rotation.
    pub tx_hash: String,
}

impl Cursored for KeyRotation {
    fn cursor_key(&self) -> CursorKey {
        CursorKey::new(vec![
            Value::Int(self.block_height),
            Value::Text(self.node_id.clone()),
        ])
    }
}

impl Record for KeyRotation {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "node_id" => Some((&self.node_id).into()),
            "old_pub_key" => Some((&self.old_pub_key).into()),
            "new_pub_key" => Some((&self.new_pub_key).into()),
            "block_height" => Some(Value::Int(self.block_height)),
            "vega_time" => Some(Value::Timestamp(self.vega_time)),
            "tx_hash" => Some((&self.tx_hash).into()),
            _ => None,
        }
    }
}

impl LedgerRow for KeyRotation {
    const TABLE: &'static str = "key_rotations";
    type Key = (String, i64);

    fn key(&self) -> (String, i64) {
        (self.node_id.clone(), self.block_height)
    }

    fn vega_time(&self) -> i64 {
        self.vega_time
    }

    fn sort_spec() -> Result<SortSpec, SortSpecError> {
        SortSpec::composite([
            SortColumn::asc("block_height", ValueKind::Int),
            SortColumn::asc("node_id", ValueKind::Text),
        ])
    }
}

/// Key rotation table.
#[derive(Debug)]
pub struct KeyRotations {
    table: Table<KeyRotation>,
}

impl KeyRotations {
    /// Empty table.
    pub fn new(paging: PagingConfig) -> Result<Self, StoreError> {
        Ok(Self {
            table: Table::new(paging)?,
        })
    }

    /// Underlying table, for pagination and raw access.
    pub const fn table(&self) -> &Table<KeyRotation> {
        &self.table
    }

    /// Record a rotation.
    pub fn add(&self, rotation: KeyRotation) -> Result<(), StoreError> {
        self.table.upsert(rotation)
    }

    /// One page of rotations across every node.
    pub fn list_all(&self, pagination: &Pagination) -> Result<Page<KeyRotation>, StoreError> {
        self.table.page(pagination, None)
    }

    /// One page of rotations for `node_id`.
    pub fn list_by_node(
        &self,
        node_id: &str,
        pagination: &Pagination,
    ) -> Result<Page<KeyRotation>, StoreError> {
        let filter = simple("node_id", Operator::Eq, node_id);
        self.table.page(pagination, Some(&filter))
    }

    /// Rotations submitted in transaction `tx_hash`.
    pub fn get_by_tx_hash(&self, tx_hash: &str) -> Result<Vec<KeyRotation>, StoreError> {
        self.table
            .find(Some(&simple("tx_hash", Operator::Eq, tx_hash)))
    }
}
