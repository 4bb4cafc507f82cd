//! Abstract request and response values.

use std::fmt;
use std::time::Duration;

use crate::{Address, Credentials, DispatchError, Sink};

// ---------------------------------------------------------------------------
// Verb
// ---------------------------------------------------------------------------

/// The invocation style a caller expects from the dispatch core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verb {
    /// Synchronous, deadline-bound call that produces a result.
    #[default]
    Call,
    /// Fire-and-acknowledge: only acceptance of the request is reported.
    Send,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verb::Call => f.write_str("Call"),
            Verb::Send => f.write_str("Send"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A request as seen by the dispatch core.
///
/// `credentials` and `deadline` are optional extensions; a request without a
/// deadline is bound by the core's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub address: Address,
    pub body: Option<Sink>,
    pub credentials: Option<Credentials>,
    pub deadline: Option<Duration>,
}

impl Request {
    /// Creates a request for `address` with no body or extensions.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            body: None,
            credentials: None,
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Sink) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// The outcome of dispatching a request.
///
/// - body, no error: success with payload
/// - no body, no error: success without payload
/// - error: failure; the body is conventionally absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub body: Option<Sink>,
    pub error: Option<DispatchError>,
}

impl Response {
    /// A successful response without payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A successful response carrying `body`.
    pub fn with_body(body: Sink) -> Self {
        Self {
            body: Some(body),
            error: None,
        }
    }

    /// A failed response carrying `error`.
    pub fn from_error(error: impl Into<DispatchError>) -> Self {
        Self {
            body: None,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if the response carries no error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusError;

    #[test]
    fn builder_sets_optional_fields() {
        let address = Address::new("/svc").unwrap();
        let req = Request::new(address)
            .with_body(Sink::text("x"))
            .with_credentials(Credentials::new("u", "p"))
            .with_deadline(Duration::from_secs(3));
        assert_eq!(req.body, Some(Sink::text("x")));
        assert_eq!(req.credentials.as_ref().map(Credentials::username), Some("u"));
        assert_eq!(req.deadline, Some(Duration::from_secs(3)));
    }

    #[test]
    fn response_outcomes() {
        assert!(Response::empty().is_success());
        assert!(Response::with_body(Sink::bytes(vec![0])).is_success());
        let failed = Response::from_error(StatusError::from_code(500));
        assert!(!failed.is_success());
        assert!(failed.body.is_none());
    }

    #[test]
    fn verb_display() {
        assert_eq!(Verb::Call.to_string(), "Call");
        assert_eq!(Verb::Send.to_string(), "Send");
    }
}
