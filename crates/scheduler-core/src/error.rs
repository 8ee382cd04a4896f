use thiserror::Error;

/// Reasons a repeat string is rejected by the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseRuleError {
    #[error("Unknown repeat rule kind: '{0}'")]
    UnknownRuleKind(String),

    #[error("Value out of range in repeat rule: {0}")]
    OutOfRange(String),

    #[error("Malformed repeat rule: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Parse(#[from] ParseRuleError),

    #[error("Invalid repeat rule: {0}")]
    InvalidRule(String),

    #[error("No date satisfies the repeat rule: {0}")]
    Unsatisfiable(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Task was modified concurrently: {0}")]
    Conflict(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid password")]
    InvalidCredentials,

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns true for failures caused by the request itself rather than
    /// by the storage layer.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            CoreError::Database(_) | CoreError::Migration(_) | CoreError::Io(_)
        )
    }
}
