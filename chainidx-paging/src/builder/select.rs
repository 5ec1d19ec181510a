//! SELECT query builder.

use crate::dialect::Dialect;
use crate::pagination::PageQuery;
use crate::validate::assert_valid_sql_identifier;

use super::filter::build_filter_expr_impl;
use super::types::{FilterExpr, QueryResult, SortField};

/// SQL query builder with dialect support.
///
/// Renders the ordering, keyset bound, and probe limit of a [`PageQuery`] as a
/// single parameterized statement, so a SQL-backed row source issues exactly
/// one query per page.
#[derive(Debug, Clone)]
pub struct SelectBuilder<D: Dialect> {
    dialect: D,
    table: String,
    fields: Vec<String>,
    filter: Option<FilterExpr>,
    sorts: Vec<SortField>,
    limit: Option<u64>,
}

impl<D: Dialect> SelectBuilder<D> {
    /// Create a new query builder for the given table.
    ///
    /// # Panics
    ///
    /// Panics if the table name is not a valid SQL identifier.
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        let table = table.into();
        assert_valid_sql_identifier(&table, "table");
        Self {
            dialect,
            table,
            fields: Vec::new(),
            filter: None,
            sorts: Vec::new(),
            limit: None,
        }
    }

    /// Set the fields to SELECT.
    ///
    /// # Panics
    ///
    /// Panics if any field name is not a valid SQL identifier.
    pub fn fields(mut self, fields: &[&str]) -> Self {
        for field in fields {
            assert_valid_sql_identifier(field, "field");
        }
        self.fields = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Add a predicate, AND-ed with any predicate already present.
    pub fn filter(mut self, expr: FilterExpr) -> Self {
        self.filter = FilterExpr::conjoin(self.filter.take(), Some(expr));
        self
    }

    /// Apply a planned page: caller filter, keyset bound, ordering, and
    /// probe limit.
    pub fn page(mut self, query: &PageQuery<'_>) -> Self {
        let bound = query.bound().map(|bound| bound.to_filter_expr());
        self.filter = FilterExpr::conjoin(self.filter.take(), query.filter().cloned());
        self.filter = FilterExpr::conjoin(self.filter.take(), bound);
        self.sorts = query.order().to_vec();
        self.limit = query.limit();
        self
    }

    /// Build the SQL query and parameters.
    pub fn build(self) -> QueryResult {
        let mut params = Vec::new();

        let select_str = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };
        let mut sql = format!("SELECT {select_str} FROM {}", self.table);

        if let Some(ref expr) = self.filter {
            // ORDER BY and LIMIT carry no parameters, the next index is unused
            let (condition, new_params, _next_idx) =
                build_filter_expr_impl(&self.dialect, expr, 1);
            sql.push_str(" WHERE ");
            sql.push_str(&condition);
            params.extend(new_params);
        }

        if !self.sorts.is_empty() {
            let sort_parts: Vec<String> = self.sorts.iter().map(SortField::to_sql).collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&sort_parts.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        QueryResult { sql, params }
    }
}
