//! Product-location table and code lookup

pub mod card;
pub mod normalize;
pub mod query;
pub mod record;
pub mod store;

pub use normalize::{normalize_cell, normalize_code};
pub use query::{CodeKind, LookupPolicy, QueryError, QueryHit, QueryRouter, Truncated, MAX_RESULTS};
pub use record::{Column, ProductRecord};
pub use store::{Catalog, CatalogStats, LoadError, TableStore};
