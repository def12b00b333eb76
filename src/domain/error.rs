//! Domain-level error types for fbexporter.
//!
//! All errors are typed with `thiserror`. Fatal variants abort a command;
//! the exporters downgrade per-page variants to warnings.

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration file missing, malformed or incomplete.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// JSON parsing or serialization failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The HTTP request itself failed (connect, TLS, body read).
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The Graph API answered with an error payload.
    #[error("Graph API error (HTTP {status}): {message}")]
    Graph { status: u16, message: String },

    /// Access token could not be resolved.
    #[error("Token error: {message}")]
    Token { message: String },

    /// Template could not be loaded, compiled or rendered.
    #[error("Template error: {message}")]
    Template {
        message: String,
        #[source]
        source: Option<minijinja::Error>,
    },
}

impl AppError {
    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }

    /// Create a transport error with context. The request URL is dropped:
    /// it carries access tokens and the app secret as query parameters.
    pub fn http(message: impl Into<String>, err: reqwest::Error) -> Self {
        let err = err.without_url();
        Self::Http {
            message: format!("{}: {err}", message.into()),
            source: Some(err),
        }
    }

    /// Create a template error with context.
    pub fn template(message: impl Into<String>, err: minijinja::Error) -> Self {
        Self::Template {
            message: format!("{}: {err}", message.into()),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
