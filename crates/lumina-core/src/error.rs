//! Error types module
//!
//! All catalog errors are unified under the `CatalogError` enum. Read misses
//! are never errors (repositories return `Option`/empty collections); typed
//! errors cover write conflicts, missing mutation targets, and store failures.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so the models can be used without pulling in the database stack.

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as read misses surfaced as mutations on absent ids
    Debug,
    /// Recoverable or caller-correctable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// How an error should be presented to callers; lets the API layer build
/// responses without matching on variants.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g. "CONFLICT")
    fn error_code(&self) -> &'static str;

    /// Whether the caller can usefully retry the same request
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Client-facing message (may hide internal detail)
    fn client_message(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// Mutation target does not exist. Read operations never raise this;
    /// they return `None`/empty instead.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation: duplicate content checksum or device-asset
    /// identity. The loser of a concurrent create race sees this and is
    /// expected to re-query for the winner.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation is logically inapplicable to the asset's current lifecycle
    /// state. Guarded even where the state machine should make it unreachable.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for CatalogError {
    fn from(err: SqlxError) -> Self {
        // Unique-index violations are the store-level dedup/identity guard;
        // surface them as conflicts rather than opaque database failures.
        if let SqlxError::Database(ref db) = err {
            if db.code().as_deref() == Some("23505") {
                return CatalogError::Conflict(db.message().to_string());
            }
        }
        CatalogError::Database(err)
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        CatalogError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for CatalogError {
    fn from(err: uuid::Error) -> Self {
        CatalogError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl CatalogError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            CatalogError::Database(_) => "Database",
            CatalogError::NotFound(_) => "NotFound",
            CatalogError::Conflict(_) => "Conflict",
            CatalogError::InvalidState(_) => "InvalidState",
            CatalogError::InvalidInput(_) => "InvalidInput",
            CatalogError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            CatalogError::Database(_) => "DATABASE_ERROR",
            CatalogError::NotFound(_) => "NOT_FOUND",
            CatalogError::Conflict(_) => "CONFLICT",
            CatalogError::InvalidState(_) => "INVALID_STATE",
            CatalogError::InvalidInput(_) => "INVALID_INPUT",
            CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Retrying a create that lost a uniqueness race is unsafe without
        // re-verifying by checksum, so Conflict is not marked recoverable.
        matches!(
            self,
            CatalogError::Database(_) | CatalogError::Internal(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            CatalogError::Database(_) | CatalogError::Internal(_) => LogLevel::Error,
            CatalogError::Conflict(_) | CatalogError::InvalidState(_) => LogLevel::Warn,
            CatalogError::NotFound(_) | CatalogError::InvalidInput(_) => LogLevel::Debug,
        }
    }

    fn client_message(&self) -> String {
        match self {
            CatalogError::Database(_) => "Failed to access catalog store".to_string(),
            CatalogError::Internal(_) => "Internal error".to_string(),
            CatalogError::NotFound(msg)
            | CatalogError::Conflict(msg)
            | CatalogError::InvalidState(msg)
            | CatalogError::InvalidInput(msg) => msg.clone(),
        }
    }
}
