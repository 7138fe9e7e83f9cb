//! Error types for the `chef-api` crate.
//!
//! Two kinds suffice: [`ConfigurationError`] for everything on the way to
//! a built client (credential lookup, knife.rb parsing, client
//! construction), and [`ApiError`] for a built — or half-built — client
//! failing against the server.

use chef_config::ParseError;

/// Boxed error used at the [`crate::ApiFactory`] seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// ConfigurationError
// ---------------------------------------------------------------------------

/// Errors raised while resolving configuration or constructing a client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The credential store holds no credentials at all.
    #[error("no Chef credentials found")]
    NoCredentials,

    /// No stored credential matches the requested id.
    #[error("no Chef credential matches id {0:?}; choose different credentials")]
    UnknownCredential(String),

    /// The underlying client library failed to construct an API handle.
    /// Carries the original cause verbatim.
    #[error("cannot build Chef API client: {0}")]
    Client(#[source] BoxError),

    /// The knife config could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors raised by a [`crate::ChefApi`] — while validating its parts at
/// construction time or while talking to the server afterwards.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The endpoint string is not a valid URL.
    #[error("invalid Chef server URL \"{url}\": {reason}")]
    InvalidEndpoint {
        /// The value that failed validation.
        url: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// The key material is not a readable RSA private key.
    #[error("invalid client key: {reason}")]
    InvalidKey {
        /// Human-readable explanation.
        reason: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Chef server returned {status} for {path}")]
    Status {
        /// HTTP status code of the response.
        status: reqwest::StatusCode,
        /// Request path that produced it.
        path: String,
    },

    /// A response body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request signing failed.
    #[error("request signing failed: {0}")]
    Sign(#[from] rsa::Error),
}
