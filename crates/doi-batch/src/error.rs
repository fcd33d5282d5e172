use thiserror::Error;

/// Failure of the record store behind the batch driver.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    /// A remote sink refused the write (e.g. a registry validation error).
    #[error("Update of {id} rejected: {reason}")]
    Rejected { id: String, reason: String },
}
