//! Error taxonomy of the dispatch core.
//!
//! [`DispatchError`] covers every failure a dispatch core can report for a
//! request. [`StatusError`] is the one kind that carries a transport status
//! code; adapters convert every other kind into a [`StatusError`] at the wire
//! boundary, so it is the only error that survives a round trip unchanged.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Status-bearing error
// ---------------------------------------------------------------------------

/// An error carrying a transport status code and a free-text detail.
///
/// Displays as `"<reason phrase>[<text>]"`, where the reason phrase is the
/// standard phrase for `status_code` (empty when the code has none).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusError {
    status_code: u16,
    text: String,
}

impl StatusError {
    /// Creates a [`StatusError`] from a status code and detail text.
    pub fn new(status_code: u16, text: impl Into<String>) -> Self {
        Self {
            status_code,
            text: text.into(),
        }
    }

    /// Creates a [`StatusError`] with an empty detail text.
    pub fn from_code(status_code: u16) -> Self {
        Self::new(status_code, String::new())
    }

    /// Shorthand for a `500 Internal Server Error` with the given detail.
    pub fn internal(text: impl Into<String>) -> Self {
        Self::new(http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(), text)
    }

    /// Returns the transport status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Returns the free-text detail.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the standard reason phrase for the status code, if it has one.
    pub fn reason(&self) -> Option<&'static str> {
        http::StatusCode::from_u16(self.status_code)
            .ok()
            .and_then(|code| code.canonical_reason())
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.reason().unwrap_or_default(), self.text)
    }
}

impl std::error::Error for StatusError {}

// ---------------------------------------------------------------------------
// Dispatch-level errors
// ---------------------------------------------------------------------------

/// Errors a dispatch core may report for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The destination exists but does not implement the requested protocol.
    #[error("protocol not implemented: {0}")]
    ProtocolNotImplemented(String),

    /// No destination is registered for the request's address.
    #[error("destination not found: {0}")]
    DestinationNotFound(String),

    /// The request's deadline elapsed before a result was produced.
    #[error("deadline exceeded after {0:?}")]
    DeadlineExceeded(std::time::Duration),

    /// The execution context was canceled before a result was produced.
    #[error("context canceled")]
    Canceled,

    /// The handler faulted while processing the request.
    #[error("handler panicked: {0}")]
    Panic(String),

    /// An error that already carries a transport status code.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// Any other failure reported by a handler.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_combines_reason_and_text() {
        let err = StatusError::new(404, "no route for /a");
        assert_eq!(err.to_string(), "Not Found[no route for /a]");
    }

    #[test]
    fn status_error_with_unknown_code_has_empty_reason() {
        let err = StatusError::new(599, "odd");
        assert_eq!(err.reason(), None);
        assert_eq!(err.to_string(), "[odd]");
    }

    #[test]
    fn status_variant_displays_transparently() {
        let err = DispatchError::from(StatusError::from_code(408));
        assert_eq!(err.to_string(), "Request Timeout[]");
    }
}
