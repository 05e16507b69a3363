use thiserror::Error;

/// Failures raised by the durable store and propagated unchanged to callers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("record `{0}` already exists")]
    DuplicateId(String),
    #[error("record `{0}` not found")]
    NotFound(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Form-level input problems. Engines assume validated input but still skip
/// rows that would corrupt aggregates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("month must be between 1 and 12")]
    MonthOutOfRange,
    #[error("end date precedes start date")]
    EndBeforeStart,
}
