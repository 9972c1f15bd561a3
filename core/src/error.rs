//! Error type shared by both request builders.
//!
//! # Design
//! URLs given to a builder are checked when they are set, so a bad one
//! surfaces as `MalformedUrl` or `UnsupportedScheme` before any handler is
//! involved. Everything raised while the exchange is in flight (`Transport`,
//! `Status`, `Io`, redirect failures, including a bad `Location` header) is
//! what handlers see. Reusing a builder is not represented here:
//! `submit`/`send` take the builder by value, so a second call is rejected by
//! the compiler.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or executing a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL string could not be parsed.
    #[error("malformed URL {url:?}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL parsed but its scheme is not one the transport speaks.
    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),

    /// A legacy request was submitted before a URL was configured.
    #[error("no URL configured for request")]
    MissingUrl,

    /// A header name or value could not be put on the wire.
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Connecting, sending, or receiving the response head failed.
    #[error("transport failure for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with an error status where a success body was
    /// expected. `body` is the captured error body.
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// Reading the response body failed.
    #[error("failed reading response body: {0}")]
    Io(#[from] std::io::Error),

    /// The response body was not the expected JSON.
    #[error("failed decoding response body: {0}")]
    Json(#[from] serde_json::Error),

    /// A redirect status arrived without a usable `Location` header.
    #[error("redirect status {code} without a Location header")]
    MissingLocation { code: u16 },

    /// The redirect chain exceeded the configured limit.
    #[error("gave up after {limit} redirects")]
    TooManyRedirects { limit: usize },
}

impl Error {
    pub(crate) fn transport(
        url: &url::Url,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transport {
            url: url.to_string(),
            source: source.into(),
        }
    }

    /// Numeric status for `Status` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
