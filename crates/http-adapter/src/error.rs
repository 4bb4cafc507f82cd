//! Adapter-local error types.
//!
//! None of these reach the dispatch core as-is: the client adapter folds
//! [`BuildError`] and [`TransportError`] into a `500` [`dispatch::StatusError`].

use thiserror::Error;

/// Boxed error used for type-erased body streams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while building an outbound wire request.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The remote address was empty.
    #[error("invalid remote address: empty")]
    EmptyRemoteAddress,

    /// The concatenated target could not be parsed as a URI.
    #[error("invalid request target '{target}': {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: http::Error,
    },

    /// A header value could not be encoded.
    #[error("invalid value for header '{header}'")]
    InvalidHeader {
        header: http::header::HeaderName,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

/// Failures performing the transport exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The HTTP client reported an error (connection refused, DNS, timeout...).
    #[error("transport request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport implementation failure.
    #[error("transport failure: {0}")]
    Other(String),
}

/// A duration string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,

    #[error("negative duration '{0}'")]
    Negative(String),

    #[error("invalid duration '{0}'")]
    Invalid(String),

    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),

    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit { unit: String, input: String },

    #[error("duration '{0}' overflows")]
    Overflow(String),
}

/// Invalid adapter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {message}")]
    Invalid { message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, AUTHORIZATION};

    #[test]
    fn invalid_header_names_the_header() {
        let source = HeaderValue::from_str("bad\nvalue").unwrap_err();
        let err = BuildError::InvalidHeader {
            header: crate::TIMEOUT_HEADER,
            source,
        };
        assert_eq!(err.to_string(), "invalid value for header 'x-dispatch-timeout'");

        let source = HeaderValue::from_str("\r").unwrap_err();
        let err = BuildError::InvalidHeader {
            header: AUTHORIZATION,
            source,
        };
        assert_eq!(err.to_string(), "invalid value for header 'authorization'");
    }
}
