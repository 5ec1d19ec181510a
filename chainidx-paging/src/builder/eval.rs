//! In-memory evaluation of filter expressions.
//!
//! Evaluation follows SQL three-valued logic so that an in-memory row source
//! admits exactly the rows the rendered `WHERE` clause would: a comparison
//! against `NULL` or a value of another kind is `UNKNOWN`, and only rows whose
//! predicate is `TRUE` pass.

use super::types::{CompoundFilter, Filter, FilterExpr, LogicalOp, Operator, Value};

/// Named field access for rows evaluated in memory.
pub trait Record {
    /// The value stored in `name`, or `None` when the row has no such column.
    fn field(&self, name: &str) -> Option<Value>;
}

impl FilterExpr {
    /// Whether `record` satisfies this predicate.
    #[must_use]
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.eval(record) == Some(true)
    }

    fn eval<R: Record + ?Sized>(&self, record: &R) -> Option<bool> {
        match self {
            Self::Simple(filter) => eval_condition(filter, record),
            Self::Compound(compound) => eval_compound(compound, record),
        }
    }
}

fn eval_compound<R: Record + ?Sized>(compound: &CompoundFilter, record: &R) -> Option<bool> {
    match compound.op {
        LogicalOp::And => {
            let mut unknown = false;
            for expr in &compound.filters {
                match expr.eval(record) {
                    Some(false) => return Some(false),
                    None => unknown = true,
                    Some(true) => {},
                }
            }
            if unknown { None } else { Some(true) }
        },
        LogicalOp::Or => {
            let mut unknown = false;
            for expr in &compound.filters {
                match expr.eval(record) {
                    Some(true) => return Some(true),
                    None => unknown = true,
                    Some(false) => {},
                }
            }
            if unknown { None } else { Some(false) }
        },
        LogicalOp::Not => compound
            .filters
            .first()
            .map_or(Some(true), |expr| expr.eval(record).map(|b| !b)),
    }
}

fn eval_condition<R: Record + ?Sized>(filter: &Filter, record: &R) -> Option<bool> {
    let actual = record.field(&filter.field).unwrap_or(Value::Null);

    match (filter.op, &filter.value) {
        (Operator::Eq, Value::Null) => Some(actual == Value::Null),
        (Operator::Ne, Value::Null) => Some(actual != Value::Null),
        (Operator::In, Value::Array(values)) => eval_membership(&actual, values),
        (Operator::NotIn, Value::Array(values)) => eval_membership(&actual, values).map(|b| !b),
        (Operator::In, value) => actual.compare(value).map(|o| o.is_eq()),
        (Operator::NotIn, value) => actual.compare(value).map(|o| o.is_ne()),
        (op, value) => actual.compare(value).map(|ordering| op.admits(ordering)),
    }
}

fn eval_membership(actual: &Value, values: &[Value]) -> Option<bool> {
    let mut unknown = false;
    for candidate in values {
        match actual.compare(candidate) {
            Some(ordering) if ordering.is_eq() => return Some(true),
            Some(_) => {},
            None => unknown = true,
        }
    }
    if unknown { None } else { Some(false) }
}
