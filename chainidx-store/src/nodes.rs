//! Validator nodes.

use chainidx_paging::{
    CursorKey, Cursored, Operator, Page, Pagination, PagingConfig, Record, SortColumn, SortSpec,
    SortSpecError, Value, ValueKind, simple,
};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::table::{LedgerRow, Table};

/// Whether a node takes part in consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Tendermint validator.
    Validator,
    /// Registered but not validating.
    NonValidator,
}

impl NodeStatus {
    /// Stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validator => "validator",
            Self::NonValidator => "non_validator",
        }
    }
}

/// A registered node, as of one ledger time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID.
    pub id: String,
    /// Current public key.
    pub pub_key: String,
    /// Consensus public key.
    pub tm_pub_key: String,
    /// Display name.
    pub name: String,
    /// Consensus role.
    pub status: NodeStatus,
    /// Ledger time of this version.
    pub vega_time: i64,
}

impl Cursored for Node {
    fn cursor_key(&self) -> CursorKey {
        CursorKey::new(vec![Value::Text(self.id.clone())])
    }
}

impl Record for Node {
    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some((&self.id).into()),
            "pub_key" => Some((&self.pub_key).into()),
            "tm_pub_key" => Some((&self.tm_pub_key).into()),
            "name" => Some((&self.name).into()),
            "status" => Some(self.status.as_str().into()),
            "vega_time" => Some(Value::Timestamp(self.vega_time)),
            _ => None,
        }
    }
}

impl LedgerRow for Node {
    const TABLE: &'static str = "nodes";
    type Key = String;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn vega_time(&self) -> i64 {
        self.vega_time
    }

    fn sort_spec() -> Result<SortSpec, SortSpecError> {
        SortSpec::new([SortColumn::asc("id", ValueKind::Text).unique()])
    }
}

/// Node table.
#[derive(Debug)]
pub struct Nodes {
    table: Table<Node>,
}

impl Nodes {
    /// Empty table.
    pub fn new(paging: PagingConfig) -> Result<Self, StoreError> {
        Ok(Self {
            table: Table::new(paging)?,
        })
    }

    /// Underlying table, for pagination and raw access.
    pub const fn table(&self) -> &Table<Node> {
        &self.table
    }

    /// Record a node version.
    pub fn upsert(&self, node: Node) -> Result<(), StoreError> {
        self.table.upsert(node)
    }

    /// Current version of node `id`.
    pub fn get_by_id(&self, id: &str) -> Result<Node, StoreError> {
        self.table
            .find(Some(&simple("id", Operator::Eq, id)))?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("node", id))
    }

    /// One page of nodes, ordered by ID.
    pub fn list(&self, pagination: &Pagination) -> Result<Page<Node>, StoreError> {
        self.table.page(pagination, None)
    }
}
