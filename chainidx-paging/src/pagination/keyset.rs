//! Keyset pagination condition generation.

use std::cmp::Ordering;

use crate::builder::{FilterExpr, Operator, SortDir, SortField, Value, and, or, simple};

use super::key::{CursorKey, compare_values};

/// Keyset pagination condition.
///
/// Keeps rows whose key sorts strictly after a cursor key under a query
/// order. Backward navigation passes the direction-flipped order, so "before
/// the cursor" never needs a separate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetCondition {
    order: Vec<SortField>,
    values: Vec<Value>,
}

impl KeysetCondition {
    /// Rows strictly after `key` under `order`.
    ///
    /// `order` and `key` must have one entry per sort column.
    #[must_use]
    pub fn after(order: &[SortField], key: &CursorKey) -> Self {
        Self {
            order: order.to_vec(),
            values: key.values().to_vec(),
        }
    }

    /// The query order the bound is expressed in.
    pub fn order(&self) -> &[SortField] {
        &self.order
    }

    /// The cursor values, one per column.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Whether a row with `key` lies strictly past the cursor.
    #[must_use]
    pub fn admits(&self, key: &CursorKey) -> bool {
        self.admits_values(key.values())
    }

    /// [`KeysetCondition::admits`] over bare column values.
    #[must_use]
    pub fn admits_values(&self, values: &[Value]) -> bool {
        compare_values(&self.order, values, &self.values) == Ordering::Greater
    }

    /// Convert to a filter expression for the query builder.
    ///
    /// For a single field, generates: `field > $1` (or `<` for DESC)
    ///
    /// For multiple fields, generates compound OR conditions:
    /// `(a, b) > (1, 2)` becomes: `(a > 1) OR (a = 1 AND b > 2)`
    ///
    /// For 3+ fields: `(a > 1) OR (a = 1 AND b > 2) OR (a = 1 AND b = 2 AND c > 3)`
    ///
    /// Each column takes its own operator, so mixed directions such as
    /// `block_height DESC, node_id ASC` are expressed exactly, which a row
    /// value comparison cannot do. See: <https://use-the-index-luke.com/no-offset>
    #[must_use]
    pub fn to_filter_expr(&self) -> FilterExpr {
        let mut branches: Vec<FilterExpr> = self
            .order
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(i, (sort, value))| {
                let mut terms: Vec<FilterExpr> = self
                    .order
                    .iter()
                    .zip(&self.values)
                    .take(i)
                    .map(|(prev, prev_value)| {
                        simple(prev.field.clone(), Operator::Eq, prev_value.clone())
                    })
                    .collect();
                terms.push(simple(
                    sort.field.clone(),
                    strictly_after(sort.dir),
                    value.clone(),
                ));
                if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    and(terms)
                }
            })
            .collect();

        if branches.len() == 1 {
            branches.remove(0)
        } else {
            or(branches)
        }
    }
}

const fn strictly_after(dir: SortDir) -> Operator {
    match dir {
        SortDir::Asc => Operator::Gt,
        SortDir::Desc => Operator::Lt,
    }
}
