use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("program identifier must not be empty")]
    EmptyIdentifier,
    #[error("duplicate program identifier: {0}")]
    DuplicateIdentifier(String),
}
