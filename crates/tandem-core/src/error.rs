//! Error types for Tandem core library.

use thiserror::Error;

/// Result type alias using Tandem Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for startup resolution and web auth.
#[derive(Debug, Error)]
pub enum Error {
    /// A URL flag was given without a usable value.
    #[error("Missing value for {flag}. Example: {example}")]
    MissingFlagValue { flag: String, example: String },

    /// No server URL was resolved and the invocation is not help/version.
    #[error(
        "Missing required --server-url <url> argument. Example: tandem --server-url https://api.example.com"
    )]
    MissingServerUrl,

    /// Web auth was requested but no web-app URL is configured.
    #[error("Web auth requires --webapp-url <url> or TANDEM_WEBAPP_URL to be set.")]
    ConfigurationMissing,

    /// The user's home directory could not be determined.
    #[error("Cannot determine home directory")]
    HomeDirUnavailable,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
