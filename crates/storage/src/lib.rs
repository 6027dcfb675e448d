#![forbid(unsafe_code)]

pub mod catalog_source;
pub mod repository;

pub use catalog_source::{CategorySpec, load_catalog_sources, parse_category_source};
pub use repository::{InMemoryProgressRepository, ProgressRepository, Storage, StorageError};
