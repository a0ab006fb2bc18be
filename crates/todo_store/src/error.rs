//! Todo store error types.

use thiserror::Error;

/// Errors that can occur during todo store operations.
///
/// Missing lists or todos are not errors: operations report them as `false`
/// or `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Caller supplied an unusable value, such as a blank title.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Another list of the same owner already uses this title.
    #[error("Todo list title already in use: {0}")]
    DuplicateTitle(String),

    /// The backend does not provide this operation.
    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The password verification capability failed.
    #[error("Password verification failed: {0}")]
    PasswordVerification(String),
}

impl StoreError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a duplicate title error.
    pub fn duplicate_title(title: impl Into<String>) -> Self {
        Self::DuplicateTitle(title.into())
    }
}

/// Result type for todo store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Rejects empty or whitespace-only titles.
pub(crate) fn validate_title(title: &str) -> StoreResult<()> {
    if title.trim().is_empty() {
        return Err(StoreError::invalid_input("title must not be empty"));
    }
    Ok(())
}
