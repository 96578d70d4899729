//! Unified error types for the innovation points ledger.
//!
//! Every operation in [`crate::core`] returns [`Result`]. Errors are recovered at the
//! request boundary (see [`crate::api`]) and are never fatal to the process.

use thiserror::Error;

/// All errors produced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is missing or malformed on create or update.
    #[error("Validation error: {message}")]
    Validation {
        /// Which field failed and why
        message: String,
    },

    /// An edit or delete referenced a record id that does not exist.
    #[error("Record not found: {id}")]
    RecordNotFound {
        /// The id that was looked up
        id: String,
    },

    /// A user operation referenced a username that does not exist.
    #[error("User not found: {username}")]
    UserNotFound {
        /// The username that was looked up
        username: String,
    },

    /// Bad credentials. Deliberately does not say which part was wrong.
    #[error("Invalid username or password")]
    AuthFailure,

    /// The acting user lacks the role required for the operation.
    #[error("Permission denied: {action} requires an admin account")]
    PermissionDenied {
        /// The attempted operation
        action: String,
    },

    /// Adding a user whose username is already taken.
    #[error("Username already exists: {username}")]
    DuplicateUsername {
        /// The conflicting username
        username: String,
    },

    /// The acting user tried to delete their own account.
    #[error("You cannot delete the account you are signed in with")]
    SelfDeletionDenied,

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Password hashing failed or a stored hash is unreadable.
    #[error("Password hash error: {message}")]
    PasswordHash {
        /// Description of the problem
        message: String,
    },

    /// Storage failure from the database layer.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config and legacy files, listener binding).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failure (legacy data files).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
