//! Error types for portfolio behavior.

use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur while driving the page behavior.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The messaging deep link could not be built.
    #[error("Invalid deep link: {0}")]
    DeepLink(#[from] url::ParseError),

    /// Configuration serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required document element is missing.
    ///
    /// Optional elements are skipped silently; this is only raised for
    /// the handful of nodes the host cannot run without (window, document).
    #[error("Missing document element: {0}")]
    MissingElement(String),
}
