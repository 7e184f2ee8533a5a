//! Pagination derived from the `page` and `limit` query parameters.

use crate::params::RawQueryParams;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 100;

/// A validated page request: `page >= 1`, `limit >= 1`.
///
/// Malformed or non-positive input degrades to the defaults; pagination never
/// raises. Pages beyond the record count yield an empty result downstream,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    pub page: u64,
    pub limit: u64,
}

impl PageSpec {
    pub fn from_params(params: &RawQueryParams) -> Self {
        Self {
            page: parse_positive(params.get("page"), DEFAULT_PAGE),
            limit: parse_positive(params.get("limit"), DEFAULT_LIMIT),
        }
    }

    /// Number of documents to skip before the first returned one.
    ///
    /// Saturates instead of overflowing: a page number near `u64::MAX` is
    /// still a valid request and must degrade to an empty result downstream,
    /// never a panic.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Parse a positive integer, substituting `default` on failure or `0`.
fn parse_positive(raw: Option<&str>, default: u64) -> u64 {
    match raw.and_then(|s| s.trim().parse::<u64>().ok()) {
        Some(n) if n >= 1 => n,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_two_limit_ten_skips_ten() {
        let params = RawQueryParams::from_pairs([("page", "2"), ("limit", "10")]);
        let spec = PageSpec::from_params(&params);
        assert_eq!(spec.skip(), 10);
        assert_eq!(spec.limit, 10);
    }

    #[test]
    fn huge_page_numbers_saturate_instead_of_overflowing() {
        let params = RawQueryParams::from_pairs([
            ("page", "18446744073709551615"),
            ("limit", "100"),
        ]);
        let spec = PageSpec::from_params(&params);
        assert_eq!(spec.skip(), u64::MAX);

        // A wrap here would serve the first page instead of an empty one.
        let params = RawQueryParams::from_pairs([
            ("page", "9223372036854775809"),
            ("limit", "4"),
        ]);
        assert!(PageSpec::from_params(&params).skip() > 0);
    }

    #[test]
    fn absent_keys_default_to_first_page_of_one_hundred() {
        let spec = PageSpec::from_params(&RawQueryParams::new());
        assert_eq!(spec, PageSpec { page: 1, limit: 100 });
        assert_eq!(spec.skip(), 0);
    }

    #[test]
    fn non_numeric_input_falls_back_silently() {
        let params = RawQueryParams::from_pairs([("page", "abc"), ("limit", "-3")]);
        assert_eq!(PageSpec::from_params(&params), PageSpec::default());
    }

    #[test]
    fn zero_is_not_a_valid_page_or_limit() {
        let params = RawQueryParams::from_pairs([("page", "0"), ("limit", "0")]);
        assert_eq!(PageSpec::from_params(&params), PageSpec::default());
    }
}
