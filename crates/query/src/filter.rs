//! Filter predicates derived from non-reserved query parameters.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::params::{split_key, RawQueryParams};

/// Closed set of range operators a query string may carry.
///
/// The store-facing spelling is the `$`-prefixed form; the mapping is done
/// here, over typed tokens, rather than by rewriting serialized JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonOp {
    Gte,
    Gt,
    Lte,
    Lt,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 4] = [Self::Gte, Self::Gt, Self::Lte, Self::Lt];

    /// Parse a bare operator token as it appears inside a bracketed key.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "gte" => Some(Self::Gte),
            "gt" => Some(Self::Gt),
            "lte" => Some(Self::Lte),
            "lt" => Some(Self::Lt),
            _ => None,
        }
    }

    /// The document-store spelling of this operator.
    pub fn store_key(self) -> &'static str {
        match self {
            Self::Gte => "$gte",
            Self::Gt => "$gt",
            Self::Lte => "$lte",
            Self::Lt => "$lt",
        }
    }
}

/// Predicate applied to a single document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Literal equality.
    Equals(Value),
    /// One or more range comparisons, all of which must hold.
    Compare(BTreeMap<ComparisonOp, Value>),
}

/// A conjunction of per-field predicates.
///
/// Invariant: reserved control keys (`page`, `sort`, `limit`, `fields`) never
/// appear here; derivation skips them up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpression {
    fields: BTreeMap<String, Predicate>,
}

impl FilterExpression {
    /// Derive the filter from raw parameters.
    ///
    /// Keys with an unknown bracketed token are dropped: the operator set is
    /// closed, so nothing unrecognized can reach the store.
    pub fn from_params(params: &RawQueryParams) -> Self {
        let mut fields: BTreeMap<String, Predicate> = BTreeMap::new();

        for (key, raw) in params.filter_entries() {
            let value = coerce_scalar(raw);
            match split_key(key) {
                (field, None) => {
                    fields.insert(field.to_string(), Predicate::Equals(value));
                }
                (field, Some(token)) => {
                    let Some(op) = ComparisonOp::parse(token) else {
                        continue;
                    };
                    match fields.get_mut(field) {
                        Some(Predicate::Compare(ops)) => {
                            ops.insert(op, value);
                        }
                        _ => {
                            fields.insert(
                                field.to_string(),
                                Predicate::Compare(BTreeMap::from([(op, value)])),
                            );
                        }
                    }
                }
            }
        }

        Self { fields }
    }

    /// An empty filter matches every document.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.fields.get(field)
    }

    /// Render the filter in the store's native shape, with `$`-prefixed
    /// operator keys: `{"duration": {"$gte": 5}, "difficulty": "easy"}`.
    pub fn to_store_document(&self) -> Value {
        let mut doc = serde_json::Map::new();
        for (field, predicate) in &self.fields {
            let rendered = match predicate {
                Predicate::Equals(v) => v.clone(),
                Predicate::Compare(ops) => {
                    let mut inner = serde_json::Map::new();
                    for (op, v) in ops {
                        inner.insert(op.store_key().to_string(), v.clone());
                    }
                    Value::Object(inner)
                }
            };
            doc.insert(field.clone(), rendered);
        }
        Value::Object(doc)
    }
}

/// Coerce a query-string scalar into a typed JSON value.
///
/// Query strings are untyped; the document mapper would normally cast per
/// schema. Numbers and booleans are recognized here so that range predicates
/// compare numerically instead of lexicographically.
pub(crate) fn coerce_scalar(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RESERVED_KEYS;
    use serde_json::json;

    #[test]
    fn reserved_keys_never_become_predicates() {
        let params = RawQueryParams::from_pairs([
            ("page", "2"),
            ("sort", "price"),
            ("limit", "10"),
            ("fields", "name"),
            ("duration", "5"),
        ]);

        let filter = FilterExpression::from_params(&params);
        for key in RESERVED_KEYS {
            assert!(filter.get(key).is_none(), "reserved key {key} leaked");
        }
        assert_eq!(filter.get("duration"), Some(&Predicate::Equals(json!(5))));
    }

    #[test]
    fn bare_operators_are_rewritten_to_store_form() {
        let params = RawQueryParams::from_pairs([
            ("duration[gte]", "5"),
            ("price[lt]", "1500"),
            ("difficulty", "easy"),
        ]);

        let doc = FilterExpression::from_params(&params).to_store_document();
        assert_eq!(
            doc,
            json!({
                "difficulty": "easy",
                "duration": {"$gte": 5},
                "price": {"$lt": 1500},
            })
        );
    }

    #[test]
    fn multiple_operators_on_one_field_accumulate() {
        let params =
            RawQueryParams::from_pairs([("duration[gte]", "5"), ("duration[lte]", "9")]);

        let doc = FilterExpression::from_params(&params).to_store_document();
        assert_eq!(doc, json!({"duration": {"$gte": 5, "$lte": 9}}));
    }

    #[test]
    fn unknown_operator_tokens_are_dropped() {
        let params = RawQueryParams::from_pairs([("duration[near]", "5")]);
        assert!(FilterExpression::from_params(&params).is_empty());
    }

    #[test]
    fn operator_names_inside_values_are_untouched() {
        // "gte" as a literal *value* must survive as-is; only bracketed
        // operator tokens are mapped.
        let params = RawQueryParams::from_pairs([("name", "gte")]);
        let doc = FilterExpression::from_params(&params).to_store_document();
        assert_eq!(doc, json!({"name": "gte"}));
    }

    #[test]
    fn absent_filter_keys_yield_match_all() {
        let params = RawQueryParams::from_pairs([("page", "3")]);
        assert!(FilterExpression::from_params(&params).is_empty());
    }

    #[test]
    fn scalars_are_coerced() {
        assert_eq!(coerce_scalar("5"), json!(5));
        assert_eq!(coerce_scalar("4.7"), json!(4.7));
        assert_eq!(coerce_scalar("true"), json!(true));
        assert_eq!(coerce_scalar("easy"), json!("easy"));
    }
}
