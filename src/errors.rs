//! Unified error type for the ledger.
//!
//! Core functions return [`Result`]; the HTTP layer turns each variant into a
//! status code and a `{"error": ...}` body (see `api::error`).

use thiserror::Error;

/// All failures the ledger can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// A request carried missing or malformed fields
    #[error("{message}")]
    Validation {
        /// Human-readable description
        message: String,
    },

    /// A monetary amount was negative, zero where forbidden, or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No student with this id exists
    #[error("Student not found: {id}")]
    StudentNotFound {
        /// The requested student id
        id: i64,
    },

    /// No class session with this id exists
    #[error("Class not found: {id}")]
    SessionNotFound {
        /// The requested session id
        id: i64,
    },

    /// Storage failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config file, socket bind)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable could not be read
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
