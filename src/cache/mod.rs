//! Client-side cache for the users and posts collections.
//!
//! This module owns every piece of remote data the UI shows:
//! - One slot per collection, per entity id and per filtered query
//! - Background fetches de-duplicated across readers
//! - Stale-while-revalidate refetches after an invalidation
//! - Optimistic create/update/delete with explicit rollback records

mod collection;
mod patch;
mod store;
mod traits;

#[cfg(test)]
pub mod testing;

pub use collection::{CacheOptions, MutationError};
pub use store::Store;
pub use traits::{EntityKind, Resource};
