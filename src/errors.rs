//! Unified error type for the points ledger.
//!
//! Every failure an operation can produce is a variant here. The web layer maps
//! each variant onto an HTTP status and a user-facing message, see
//! [`crate::web::response`].

use thiserror::Error;

/// All errors produced by the ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// No participant is registered under this phone number
    #[error("Participant not found: {phone}")]
    ParticipantNotFound {
        /// Phone number that was looked up
        phone: String,
    },

    /// No booth is registered under this identifier
    #[error("Booth not found: {booth_id}")]
    BoothNotFound {
        /// Booth identifier that was looked up
        booth_id: String,
    },

    /// Supplied password does not match the stored credential
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Request carried no session credential
    #[error("Not authenticated")]
    Unauthenticated,

    /// Session credential is malformed, forged or expired
    #[error("Session expired or invalid")]
    SessionExpired,

    /// Participant balance cannot cover the transfer
    #[error("Insufficient funds: balance {current}, required {required}")]
    InsufficientFunds {
        /// Balance at the time of the check
        current: i64,
        /// Amount that was requested
        required: i64,
    },

    /// Malformed input (amount, phone, password, request body)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Startup configuration problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the misconfiguration
        message: String,
    },

    /// Record store failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Password hashing backend failure or unreadable stored hash
    #[error("Password hash error: {message}")]
    PasswordHash {
        /// Error reported by the hasher
        message: String,
    },

    /// Session token could not be minted
    #[error("Token error: {message}")]
    Token {
        /// Error reported by the signer
        message: String,
    },

    /// I/O failure (listener bind, roster file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error comes from a collaborator rather than the caller.
    ///
    /// Upstream failures are logged in full and reported to callers only as a
    /// generic message.
    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::PasswordHash { .. }
                | Self::Token { .. }
                | Self::Config { .. }
                | Self::Io(_)
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
