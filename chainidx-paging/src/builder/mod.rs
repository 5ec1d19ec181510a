//! Value, ordering, and predicate model plus SQL rendering.

mod eval;
mod filter;
mod select;
mod types;

pub use eval::Record;
pub(crate) use filter::build_filter_expr_impl;
pub use select::SelectBuilder;
pub use types::{
    CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, QueryResult, SortDir, SortField,
    Value, ValueKind, and, not, or, simple,
};
