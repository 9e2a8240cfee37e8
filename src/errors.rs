//! Unified error types for all workflow operations.
//!
//! Every workflow failure is local and non-fatal: the caller gets a typed
//! error plus a coarse [`ErrorKind`] classification the transport layer can
//! map to a response status. No error leaves partial ledger or balance
//! mutations behind; multi-step workflows run inside database transactions.

use thiserror::Error;

/// Coarse classification of an [`Error`], for the excluded transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input; caller's fault, no side effects
    Validation,
    /// The actor's role does not permit the operation
    Authorization,
    /// A state guard failed (duplicate submission, already approved, ...)
    Conflict,
    /// Not enough balance or stock
    ResourceExhausted,
    /// The target entity does not exist
    NotFound,
    /// Infrastructure failure (database, I/O, configuration)
    Internal,
}

/// Unified error type for all crate operations.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("{message}")]
    Validation { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("operation '{operation}' requires the admin role")]
    Forbidden { operation: &'static str },

    #[error("{message}")]
    Conflict { message: String },

    #[error("insufficient balance: have {current}, need {required}")]
    InsufficientBalance { current: i64, required: i64 },

    #[error("product is out of stock: {product}")]
    OutOfStock { product: String },

    #[error("product is not available: {product}")]
    InactiveProduct { product: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Maps the error to its coarse classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount { .. } | Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Authorization,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InsufficientBalance { .. }
            | Self::OutOfStock { .. }
            | Self::InactiveProduct { .. } => ErrorKind::ResourceExhausted,
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                ErrorKind::Internal
            }
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            Error::InvalidAmount { amount: 0 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::Forbidden { operation: "x" }.kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            Error::Conflict {
                message: "dup".to_string()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            Error::InsufficientBalance {
                current: 10,
                required: 20
            }
            .kind(),
            ErrorKind::ResourceExhausted
        );
        assert_eq!(
            Error::NotFound {
                entity: "account",
                id: "1".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );
    }
}
