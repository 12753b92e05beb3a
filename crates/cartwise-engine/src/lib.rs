pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod select;

pub use aggregate::aggregate;
pub use cache::CatalogCache;
pub use catalog::{normalize_catalog, normalize_record, RawProductRecord, StoreCatalog};
pub use engine::Engine;
pub use error::{CatalogError, EngineError};
pub use matcher::match_item;
pub use select::select_plan;
