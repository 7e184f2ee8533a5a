//! Sort ordering derived from the `sort` query parameter.

use crate::params::RawQueryParams;

/// Field the default ordering falls back to when no `sort` key is present.
pub const CREATED_AT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One sort criterion; earlier keys take precedence, later keys break ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered sort criteria. The ordering contract is stable: documents that
/// compare equal on every key keep their relative store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Derive the spec from raw parameters; absent `sort` means newest first.
    pub fn from_params(params: &RawQueryParams) -> Self {
        match params.get("sort") {
            Some(raw) => Self::parse(raw),
            None => Self::created_at_descending(),
        }
    }

    /// Parse a comma-separated token list; a leading `-` flips direction.
    ///
    /// Empty tokens are skipped, so splitting never fails regardless of
    /// input shape. An entirely empty list degrades to the default.
    pub fn parse(raw: &str) -> Self {
        let keys: Vec<SortKey> = raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != "-")
            .map(|token| match token.strip_prefix('-') {
                Some(field) => SortKey {
                    field: field.to_string(),
                    direction: SortDirection::Descending,
                },
                None => SortKey {
                    field: token.to_string(),
                    direction: SortDirection::Ascending,
                },
            })
            .collect();

        if keys.is_empty() {
            Self::created_at_descending()
        } else {
            Self { keys }
        }
    }

    /// Default ordering: creation timestamp, newest first.
    pub fn created_at_descending() -> Self {
        Self {
            keys: vec![SortKey {
                field: CREATED_AT_FIELD.to_string(),
                direction: SortDirection::Descending,
            }],
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}
