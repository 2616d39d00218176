//! Error types for the cart store and its backend client.

use thiserror::Error;
use tixcart_runtime::StoreError;

/// Errors returned by a [`CartBackend`](crate::environment::CartBackend).
///
/// Errors travel inside actions and are recorded on the cart state, so they
/// are plain data: `Clone` and comparable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The request could not complete (connection, timeout, TLS)
    #[error("Request failed: {0}")]
    Network(String),

    /// The backend rejected the caller's credentials (401 or 403)
    #[error("Unauthorized (status {status})")]
    Unauthorized {
        /// HTTP status code
        status: u16,
    },

    /// The backend refused the request for another reason
    #[error("Cart backend error (status {status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message from the backend
        message: String,
    },

    /// A quantity that cannot be sent to the backend
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

impl CartError {
    /// Classify a non-success HTTP status
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            _ => Self::Rejected {
                status,
                message: message.into(),
            },
        }
    }

    /// Whether the failure was caused by missing or invalid credentials
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Short label used for metrics and logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Rejected { .. } => "rejected",
            Self::InvalidQuantity(_) => "invalid_quantity",
            Self::Decode(_) => "decode",
        }
    }
}

/// Errors surfaced by [`CartStore`](crate::store::CartStore) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartStoreError {
    /// A backend failure the caller must react to (authentication on add)
    #[error(transparent)]
    Backend(#[from] CartError),

    /// The underlying store runtime refused or lost the operation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task driving the operation panicked or was aborted
    #[error("Cart operation interrupted: {0}")]
    Interrupted(String),
}

impl CartStoreError {
    /// Whether the caller should treat this as "please log in"
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        match self {
            Self::Backend(error) => error.is_auth_error(),
            Self::Store(_) | Self::Interrupted(_) => false,
        }
    }
}
