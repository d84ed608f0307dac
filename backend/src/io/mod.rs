//! Data loading, caching, and export.
//!
//! - [`loaders`]: the [`DataSource`] trait and its file/in-memory implementations
//! - [`cache`]: load-once memoization keyed by source identity
//! - [`export`]: CSV serialization of a record set
//! - [`checksum`]: content hashing for change detection

pub mod cache;
pub mod checksum;
pub mod export;
pub mod loaders;

pub use cache::{global_cache, DatasetCache};
pub use checksum::calculate_checksum;
pub use export::{export_file_name, records_to_csv, ExportError};
pub use loaders::{DataSource, Dataset, FileDataSource, LoadError, MemorySource, SourceFormat};
