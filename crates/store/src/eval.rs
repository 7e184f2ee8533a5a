//! Evaluation of filter and sort descriptors against serialized documents.

use std::cmp::Ordering;

use serde_json::Value;

use trailhead_query::{ComparisonOp, FilterExpression, Predicate, SortDirection, SortSpec};

/// Does `doc` satisfy every predicate in `filter`?
///
/// A missing field never matches a predicate; an empty filter matches all.
pub(crate) fn matches_filter(filter: &FilterExpression, doc: &Value) -> bool {
    filter.fields().all(|(field, predicate)| {
        let Some(actual) = doc.get(field) else {
            return false;
        };
        match predicate {
            Predicate::Equals(expected) => values_equal(actual, expected),
            Predicate::Compare(ops) => ops.iter().all(|(op, bound)| {
                compare_values(actual, bound)
                    .is_some_and(|ordering| op_holds(*op, ordering))
            }),
        }
    })
}

fn op_holds(op: ComparisonOp, ordering: Ordering) -> bool {
    match op {
        ComparisonOp::Gte => ordering != Ordering::Less,
        ComparisonOp::Gt => ordering == Ordering::Greater,
        ComparisonOp::Lte => ordering != Ordering::Greater,
        ComparisonOp::Lt => ordering == Ordering::Less,
    }
}

/// Equality with numeric widening (`5 == 5.0`).
fn values_equal(a: &Value, b: &Value) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Ordering between two scalar values of compatible type, `None` otherwise.
///
/// Range predicates on incompatible types simply fail to match, mirroring a
/// document store's typed comparison semantics.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

fn as_number(v: &Value) -> Option<f64> {
    v.as_f64()
}

/// Stable sort of documents per `spec`; earlier keys dominate, equal-key
/// documents keep their existing relative order.
pub(crate) fn sort_documents(docs: &mut [Value], spec: &SortSpec) {
    docs.sort_by(|a, b| {
        for key in spec.keys() {
            let left = a.get(&key.field).unwrap_or(&Value::Null);
            let right = b.get(&key.field).unwrap_or(&Value::Null);
            let ordering = total_order(left, right);
            let ordering = match key.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Total order across JSON values: rank by type, then by value within type.
/// Absent fields sort as null, i.e. first ascending.
fn total_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => type_rank(a).cmp(&type_rank(b)),
        },
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
