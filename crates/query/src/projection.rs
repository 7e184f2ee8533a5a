//! Field selection derived from the `fields` query parameter.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::params::RawQueryParams;

/// Primary identifier field; included in every projection unless the client
/// excludes it explicitly.
pub const ID_FIELD: &str = "id";

/// Store-internal version counter; hidden by the default projection.
pub const VERSION_FIELD: &str = "version";

/// Which fields of a document make it into the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionSpec {
    /// Include exactly the named fields.
    Only(BTreeSet<String>),
    /// Include everything except the named fields.
    AllExcept(BTreeSet<String>),
}

impl ProjectionSpec {
    /// Derive the spec from raw parameters; absent `fields` hides only the
    /// internal version field.
    pub fn from_params(params: &RawQueryParams) -> Self {
        match params.get("fields") {
            Some(raw) => Self::parse(raw),
            None => Self::default(),
        }
    }

    /// Parse a comma-separated field list. A leading `-` marks an exclusion;
    /// a list with at least one plain token is an include list, otherwise an
    /// exclusion list. The identifier rides along with include lists unless
    /// `-id` was requested.
    pub fn parse(raw: &str) -> Self {
        let mut include: BTreeSet<String> = BTreeSet::new();
        let mut exclude: BTreeSet<String> = BTreeSet::new();

        for token in raw.split(',').map(str::trim) {
            if token.is_empty() || token == "-" {
                continue;
            }
            match token.strip_prefix('-') {
                Some(field) => {
                    exclude.insert(field.to_string());
                }
                None => {
                    include.insert(token.to_string());
                }
            }
        }

        if !include.is_empty() {
            if !exclude.contains(ID_FIELD) {
                include.insert(ID_FIELD.to_string());
            }
            Self::Only(include)
        } else if !exclude.is_empty() {
            Self::AllExcept(exclude)
        } else {
            Self::default()
        }
    }

    /// Apply the projection to a serialized document, in place.
    ///
    /// Non-object values are left untouched.
    pub fn apply(&self, doc: &mut Value) {
        let Value::Object(map) = doc else {
            return;
        };
        match self {
            Self::Only(fields) => map.retain(|k, _| fields.contains(k)),
            Self::AllExcept(fields) => map.retain(|k, _| !fields.contains(k)),
        }
    }
}

impl Default for ProjectionSpec {
    fn default() -> Self {
        Self::AllExcept(BTreeSet::from([VERSION_FIELD.to_string()]))
    }
}
