#![forbid(unsafe_code)]

pub mod catalog;
pub mod model;
pub mod time;

pub use catalog::{ALL_CATEGORY_KEY, Catalog, CategoryInfo, CategorySource, LoadError};
pub use time::Clock;
