//! Error handling for wpscaffold.
//! Defines the error type and result alias used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while generating a plugin.
///
/// `ValidationError` is normally handled by the question runner and only
/// escapes in non-interactive modes. Every other variant terminates the
/// generation.
#[derive(Error, Debug)]
pub enum Error {
    /// File system errors while reading the template or writing the output
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// A template file that should be substituted is not valid UTF-8
    #[error("Template file '{}' is not valid UTF-8 text", path.display())]
    NotUtf8Error { path: PathBuf },

    /// Errors while walking the template directory
    #[error("Failed to walk template directory: {0}")]
    WalkError(#[from] walkdir::Error),

    /// Malformed template configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid include/exclude/conditional pattern
    #[error("Invalid path pattern: {0}")]
    PatternError(#[from] globset::Error),

    /// Failure while rendering a default value or a question message
    #[error("Template rendering error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// An answer was rejected by the question's validation rules
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The output directory exists and is not empty
    #[error("Output directory '{output_dir}' already exists and is not empty")]
    DestinationConflictError { output_dir: String },

    /// A substituted file path escapes the output directory or is empty
    #[error("Invalid output path '{path}' (from '{source_path}')")]
    InvalidOutputPath { path: String, source_path: String },

    /// The user aborted an interactive prompt
    #[error("Generation cancelled by user")]
    Cancelled,
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// Prints the error message to stderr and exits with status code 1.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
