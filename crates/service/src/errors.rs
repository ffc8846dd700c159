use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown program: {0}")]
    UnknownProgram(String),
    #[error("admin credential mismatch")]
    Unauthorized,
    #[error("invalid count value: {0:?}")]
    InvalidValue(String),
    #[error("persistence error: {0}")]
    Persistence(String),
}
