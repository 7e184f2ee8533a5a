//! `trailhead-query` — generic query-feature builder.
//!
//! Turns a flat query-parameter map plus an unconstrained "find all" request
//! into a filtered, sorted, projected, paginated [`QueryOptions`] descriptor.
//! The builder performs no I/O and raises no errors; executing the composed
//! descriptor is the store's job.

pub mod filter;
pub mod page;
pub mod params;
pub mod projection;
pub mod sort;

pub use filter::{ComparisonOp, FilterExpression, Predicate};
pub use page::PageSpec;
pub use params::{RawQueryParams, RESERVED_KEYS};
pub use projection::{ProjectionSpec, ID_FIELD, VERSION_FIELD};
pub use sort::{SortDirection, SortKey, SortSpec};

/// The composed request descriptor.
///
/// A `None` slot means the corresponding step was never applied and the store
/// leaves that aspect unconstrained: no filter, insertion order, all fields,
/// no paging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub filter: Option<FilterExpression>,
    pub sort: Option<SortSpec>,
    pub projection: Option<ProjectionSpec>,
    pub page: Option<PageSpec>,
}

impl QueryOptions {
    /// The unconstrained "find all records" request.
    pub fn all() -> Self {
        Self::default()
    }

    /// Shorthand for applying all four steps at once.
    pub fn from_params(params: &RawQueryParams) -> Self {
        QueryFeatures::new(params.clone())
            .filter()
            .sort()
            .limit_fields()
            .paginate()
            .build()
    }
}

/// Fluent builder over one request's query parameters.
///
/// Each step consumes the builder, derives its slot from the immutable
/// parameters, and returns an updated snapshot. Because no step reads another
/// step's output, any call order — and any number of repeats — produces the
/// same [`QueryOptions`].
#[derive(Debug, Clone)]
pub struct QueryFeatures {
    params: RawQueryParams,
    options: QueryOptions,
}

impl QueryFeatures {
    pub fn new(params: RawQueryParams) -> Self {
        Self {
            params,
            options: QueryOptions::all(),
        }
    }

    /// Narrow to documents matching the non-reserved parameters.
    pub fn filter(mut self) -> Self {
        self.options.filter = Some(FilterExpression::from_params(&self.params));
        self
    }

    /// Order per the `sort` parameter, newest-first when absent.
    pub fn sort(mut self) -> Self {
        self.options.sort = Some(SortSpec::from_params(&self.params));
        self
    }

    /// Project per the `fields` parameter, hiding only the internal version
    /// field when absent.
    pub fn limit_fields(mut self) -> Self {
        self.options.projection = Some(ProjectionSpec::from_params(&self.params));
        self
    }

    /// Page per the `page`/`limit` parameters, defaulting to (1, 100).
    pub fn paginate(mut self) -> Self {
        self.options.page = Some(PageSpec::from_params(&self.params));
        self
    }

    pub fn build(self) -> QueryOptions {
        self.options
    }
}
