//! Crate-level error type
//!
//! Covers the ambient concerns around the handler layer: loading
//! configuration, binding the listener and installing the tracing
//! subscriber. Per-request failures are [`ApiError`](crate::handlers::ApiError)s
//! and manager failures are [`ManagerError`](crate::manager::ManagerError)s.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing subscriber could not be installed
    #[error("Tracing initialization failed: {0}")]
    Tracing(String),
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
