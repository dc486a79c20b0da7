//! # Vault Error Types
//!
//! Typed error handling for the card-vault tokenization pipeline.
//! All operations return `Result<T, VaultError>`, and every variant folds
//! into one of three caller-facing kinds.

use thiserror::Error;

/// Message surfaced for an internal failure that carries no message of its own.
pub const GENERIC_INTERNAL_MESSAGE: &str = "Something went wrong";

/// Core error type for all vault operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// No authenticated caller
    #[error("{0}")]
    Unauthenticated(String),

    /// Caller supplied an unusable payload
    #[error("{0}")]
    InvalidArgument(String),

    /// Gateway did not hand out an auth token
    #[error("Failed to authenticate with Paymob")]
    GatewayAuthentication,

    /// Gateway did not hand out a card token
    #[error("Failed to generate Paymob token")]
    GatewayTokenization,

    /// Network/HTTP error talking to the gateway
    #[error("{0}")]
    Network(String),

    /// Malformed JSON in either direction
    #[error("{0}")]
    Serialization(String),

    /// Persistence write or read failed
    #[error("{0}")]
    Storage(String),

    /// Missing keys, bad config values
    #[error("{0}")]
    Configuration(String),

    /// Anything else
    #[error("{0}")]
    Internal(String),
}

/// Caller-facing error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    Internal,
}

impl ErrorKind {
    /// Status string used on the callable wire protocol
    pub fn as_status(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::Internal => "INTERNAL",
        }
    }

    /// Returns the HTTP status code appropriate for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::Unauthenticated => 401,
            ErrorKind::InvalidArgument => 400,
            ErrorKind::Internal => 500,
        }
    }
}

impl VaultError {
    /// Standard rejection for a request with no identity attached
    pub fn unauthenticated() -> Self {
        VaultError::Unauthenticated("You must be logged in".to_string())
    }

    /// Standard rejection for an incomplete card payload
    pub fn missing_card_details() -> Self {
        VaultError::InvalidArgument("Missing card details".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            VaultError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            VaultError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            _ => ErrorKind::Internal,
        }
    }

    /// Message handed back to the caller.
    ///
    /// Falls back to a generic message when the underlying failure had none.
    pub fn message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_INTERNAL_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

/// Result type alias for vault operations
pub type VaultResult<T> = Result<T, VaultError>;
