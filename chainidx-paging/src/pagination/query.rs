//! Planning the single fetch behind a page.

use tracing::debug;

use crate::builder::{FilterExpr, QueryResult, SelectBuilder, SortField};
use crate::dialect::Dialect;

use super::keyset::KeysetCondition;
use super::request::{Direction, Pagination};
use super::sort::SortSpec;

/// What a row source must return for one page: rows matching `filter` and
/// `bound`, in `order`, at most `limit` of them.
///
/// For a bounded window `limit` is the page size plus one probe row.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery<'a> {
    order: Vec<SortField>,
    bound: Option<KeysetCondition>,
    filter: Option<&'a FilterExpr>,
    limit: Option<u64>,
    direction: Direction,
}

impl<'a> PageQuery<'a> {
    /// Derive ordering, bound, and fetch limit from a validated request.
    ///
    /// Forward windows read in the base order and start strictly after the
    /// cursor. Backward windows read in the flipped base order and start
    /// strictly after the cursor under that order, which is strictly before
    /// it in base order.
    pub fn plan(spec: &SortSpec, pagination: &Pagination, filter: Option<&'a FilterExpr>) -> Self {
        let base = spec.base_order(pagination.newest_first());
        let direction = pagination.direction();
        let order: Vec<SortField> = match direction {
            Direction::Forward => base,
            Direction::Backward => base.iter().map(SortField::reversed).collect(),
        };
        let bound = pagination
            .cursor()
            .map(|key| KeysetCondition::after(&order, key));
        let limit = pagination.limit().map(|limit| u64::from(limit) + 1);

        debug!(
            ?direction,
            ?limit,
            bounded = bound.is_some(),
            filtered = filter.is_some(),
            "planned page query"
        );

        Self {
            order,
            bound,
            filter,
            limit,
            direction,
        }
    }

    /// Column order rows must come back in.
    pub fn order(&self) -> &[SortField] {
        &self.order
    }

    /// Keyset bound, absent on the first page in either direction.
    pub const fn bound(&self) -> Option<&KeysetCondition> {
        self.bound.as_ref()
    }

    /// Caller-supplied predicate.
    pub const fn filter(&self) -> Option<&'a FilterExpr> {
        self.filter
    }

    /// Maximum rows to return, probe row included.
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Navigation direction the order was derived for.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Render as one parameterized `SELECT`.
    ///
    /// An empty `fields` selects `*`.
    ///
    /// # Panics
    ///
    /// Panics if `table` or a field name is not a valid SQL identifier.
    pub fn to_sql<D: Dialect>(&self, dialect: D, table: &str, fields: &[&str]) -> QueryResult {
        SelectBuilder::new(dialect, table)
            .fields(fields)
            .page(self)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Operator, SortDir, Value, ValueKind, simple};
    use crate::dialect::{Postgres, Sqlite};
    use crate::pagination::{CursorKey, SortColumn};

    fn spec() -> SortSpec {
        SortSpec::composite([
            SortColumn::asc("block_height", ValueKind::Int),
            SortColumn::asc("node_id", ValueKind::Text),
        ])
        .unwrap()
    }

    fn key(height: i64, node: &str) -> CursorKey {
        CursorKey::new(vec![Value::Int(height), Value::Text(node.into())])
    }

    #[test]
    fn test_unbounded_plan() {
        let query = PageQuery::plan(&spec(), &Pagination::default(), None);
        assert_eq!(query.limit(), None);
        assert!(query.bound().is_none());
        assert_eq!(query.order()[0], SortField::new("block_height", SortDir::Asc));
    }

    #[test]
    fn test_forward_plan_probes_one_extra() {
        let request = Pagination::forward(Some(3), Some(key(1, "a"))).unwrap();
        let query = PageQuery::plan(&spec(), &request, None);
        assert_eq!(query.limit(), Some(4));
        assert_eq!(query.direction(), Direction::Forward);
        let bound = query.bound().unwrap();
        assert!(bound.admits(&key(1, "b")));
        assert!(!bound.admits(&key(0, "z")));
    }

    #[test]
    fn test_backward_plan_flips_order() {
        let query = PageQuery::plan(
            &spec(),
            &Pagination::backward(Some(2), Some(key(5, "m"))).unwrap(),
            None,
        );
        assert_eq!(
            query.order(),
            &[
                SortField::new("block_height", SortDir::Desc),
                SortField::new("node_id", SortDir::Desc),
            ]
        );
        let bound = query.bound().unwrap();
        assert!(bound.admits(&key(5, "a")));
        assert!(!bound.admits(&key(5, "z")));
    }

    #[test]
    fn test_newest_first_backward_reads_ascending() {
        let page = Pagination::backward(Some(2), None).unwrap().with_newest_first(true);
        let query = PageQuery::plan(&spec(), &page, None);
        assert!(query.order().iter().all(|sort| sort.dir == SortDir::Asc));
    }

    #[test]
    fn test_to_sql_postgres() {
        let filter = simple("node_id", Operator::Eq, "n1");
        let query = PageQuery::plan(
            &spec(),
            &Pagination::forward(Some(10), Some(key(7, "n1"))).unwrap(),
            Some(&filter),
        );
        let result = query.to_sql(Postgres, "key_rotations", &[]);
        assert_eq!(
            result.sql,
            "SELECT * FROM key_rotations WHERE (node_id = $1 AND (block_height > $2 OR \
             (block_height = $3 AND node_id > $4))) ORDER BY block_height ASC, node_id ASC LIMIT 11"
        );
        assert_eq!(
            result.params,
            vec![
                Value::Text("n1".into()),
                Value::Int(7),
                Value::Int(7),
                Value::Text("n1".into()),
            ]
        );
    }

    #[test]
    fn test_to_sql_unbounded() {
        let query = PageQuery::plan(&spec(), &Pagination::all(true), None);
        let result = query.to_sql(Sqlite, "key_rotations", &["block_height", "node_id"]);
        assert_eq!(
            result.sql,
            "SELECT block_height, node_id FROM key_rotations ORDER BY block_height DESC, node_id DESC"
        );
        assert!(result.params.is_empty());
    }
}
