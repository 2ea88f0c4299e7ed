//! Error types for gateway operations
//!
//! Nothing here crosses the public API as a fault: every operation turns
//! these into the `error` field of its envelope. The `Display` text is
//! exactly what the client sees.

use thiserror::Error;

/// Why the statement validator refused a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The lower-cased statement contains a blocklisted token
    ForbiddenToken(String),
    /// The statement does not start with `select`
    NotSelect,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::ForbiddenToken(token) => {
                write!(f, "statement contains forbidden operation: {}", token)
            }
            Rejection::NotSelect => write!(f, "only SELECT statements are allowed"),
        }
    }
}

/// Errors that can occur while serving a gateway operation
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The statement failed the safety policy and was never executed
    #[error("statement is unsafe or not permitted")]
    Rejected(Rejection),

    /// A session could not be established
    #[error("database connection failed: {0}")]
    Connection(String),

    /// No session is held after a connection attempt
    #[error("no active database connection")]
    NotConnected,

    /// Driver-level failure while preparing, executing or fetching
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Execution failure reported by a non-sqlx session
    #[error("{0}")]
    Execution(String),

    /// A bind parameter of a type the driver cannot bind
    #[error("unsupported parameter type: {0}")]
    UnsupportedParam(String),

    /// A cell could not be decoded into a gateway value
    #[error("failed to decode column {column}: {message}")]
    Decode {
        /// Column name as reported by the driver
        column: String,
        /// Underlying decode failure
        message: String,
    },
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
