//! Error handling for StreamPanel
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.

use thiserror::Error;

/// Main error type for StreamPanel operations
#[derive(Error, Debug)]
pub enum PanelError {
    /// Socket-level failures; fatal to startup and surfaced to the user
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// A command did not complete before the configured read timeout
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The engine's response could not be interpreted
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A node listing carried a type tag outside the known set
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PanelError>,
    },
}

impl PanelError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PanelError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for StreamPanel operations
pub type Result<T> = std::result::Result<T, PanelError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PanelError::UnknownNodeType("bogus".to_string());
        assert_eq!(err.to_string(), "Unknown node type: bogus");
    }

    #[test]
    fn test_error_with_context() {
        let err = PanelError::MalformedResponse("stray token".to_string());
        let with_ctx = err.with_context("Failed to parse listing");
        assert!(with_ctx.to_string().contains("Failed to parse listing"));
        assert!(with_ctx.to_string().contains("stray token"));
    }

    #[test]
    fn test_result_context() {
        let res: Result<()> = Err(PanelError::Timeout("list".to_string()));
        let err = res.context("polling").unwrap_err();
        assert!(err.to_string().starts_with("polling"));
    }
}
