//! Raw query-string parameters as received from a request.

/// Control keys that drive pagination, sorting, and projection.
///
/// These are never treated as filter predicates.
pub const RESERVED_KEYS: [&str; 4] = ["page", "sort", "limit", "fields"];

/// A flat, insertion-ordered key/value map taken from a request query string.
///
/// Keys carrying a bracketed operator segment (`duration[gte]=5`) are kept
/// verbatim here; [`crate::filter::FilterExpression`] splits them apart when
/// deriving predicates. Duplicate keys keep their first occurrence for
/// reserved-key lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQueryParams {
    entries: Vec<(String, String)>,
}

impl RawQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value recorded for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrite (or append) a parameter. Used by alias routes that preset
    /// reserved keys before the generic list handler runs.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// All entries, in query-string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries whose key is not one of [`RESERVED_KEYS`].
    ///
    /// Bracketed keys are compared on the segment before the bracket, so
    /// `page[gte]` would still be reserved.
    pub fn filter_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&base_key(k)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The field-name portion of a key, before any bracketed operator segment.
pub(crate) fn base_key(key: &str) -> &str {
    match key.find('[') {
        Some(idx) => &key[..idx],
        None => key,
    }
}

/// Split a key into its field name and optional bracketed operator token:
/// `duration[gte]` -> (`duration`, Some(`gte`)).
pub(crate) fn split_key(key: &str) -> (&str, Option<&str>) {
    match (key.find('['), key.ends_with(']')) {
        (Some(idx), true) => (&key[..idx], Some(&key[idx + 1..key.len() - 1])),
        _ => (key, None),
    }
}
