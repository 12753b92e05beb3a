use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("normalization error for product \"{name}\": {reason}")]
    Normalization { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("shopping request contains no items")]
    EmptyRequest,
}
