#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Could not read image: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
