//! Data module - source loading, table building, filtering and pivoting

mod builder;
mod cache;
mod filter;
mod loader;
mod pivot;

pub use builder::{BuildError, TableBuilder, UnifiedTable};
pub use cache::{CacheError, TableCache};
pub use filter::{reduce_to_countries, reduce_to_year};
pub use loader::{load_source, LoaderError, SCHEMA_FIELDS};
pub use pivot::{pivot, PivotError, WideRow, WideView};
