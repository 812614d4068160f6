use thiserror::Error;

use crate::catalog::LoadError;

/// Centralized error types for the application
///
/// Domain errors (`LoadError`, `QueryError`) stay typed in the catalog module;
/// this enum is what the transport and the binary deal with.
///
/// # Example
///
/// ```no_run
/// use planogram_bot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Table load errors
    #[error("Table load error: {0}")]
    Load(#[from] LoadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (missing token, bad URL)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
