//! `trailhead-store` — document-collection abstraction and in-memory executor.
//!
//! The query builder only assembles a [`trailhead_query::QueryOptions`]
//! descriptor; executing it — filter, stable sort, skip/limit, projection —
//! happens here, once per request.

pub mod collection;
mod eval;
pub mod memory;

pub use collection::{Collection, StoreError};
pub use memory::MemoryCollection;
