//! Mapping from the dispatch error taxonomy to HTTP status codes.
//!
//! | Error kind | Status |
//! |------------|--------|
//! | `ProtocolNotImplemented` | 501 |
//! | `DestinationNotFound` | 404 |
//! | `DeadlineExceeded`, `Canceled` | 408 |
//! | `Panic` | 500 |
//! | `Status(e)` | `e` unchanged |
//! | `Other` | 500 |

use dispatch::{DispatchError, Response, StatusError};
use http::StatusCode;

/// Converts a dispatch error into the [`StatusError`] sent over the wire.
///
/// Total: every error maps to exactly one status code. The resulting text is
/// the original error's message; a [`StatusError`] is returned unchanged.
pub fn to_status_error(err: DispatchError) -> StatusError {
    let code = match &err {
        DispatchError::Status(status) => return status.clone(),
        DispatchError::ProtocolNotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        DispatchError::DestinationNotFound(_) => StatusCode::NOT_FOUND,
        DispatchError::DeadlineExceeded(_) | DispatchError::Canceled => StatusCode::REQUEST_TIMEOUT,
        DispatchError::Panic(_) | DispatchError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    StatusError::new(code.as_u16(), err.to_string())
}

/// Builds the response for an optional dispatch error.
///
/// `None` yields an empty success response; otherwise the error is mapped
/// through [`to_status_error`].
pub fn error_response(err: Option<DispatchError>) -> Response {
    match err {
        None => Response::empty(),
        Some(err) => Response::from_error(to_status_error(err)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn every_kind_maps_to_its_status() {
        let cases = [
            (DispatchError::ProtocolNotImplemented("grpc".into()), 501),
            (DispatchError::DestinationNotFound("/nowhere".into()), 404),
            (DispatchError::DeadlineExceeded(Duration::from_secs(1)), 408),
            (DispatchError::Canceled, 408),
            (DispatchError::Panic("boom".into()), 500),
            (DispatchError::Other("whatever".into()), 500),
        ];
        for (err, expected) in cases {
            let message = err.to_string();
            let mapped = to_status_error(err);
            assert_eq!(mapped.status_code(), expected);
            assert_eq!(mapped.text(), message);
        }
    }

    #[test]
    fn status_error_passes_through_unchanged() {
        let original = StatusError::new(418, "teapot");
        let mapped = to_status_error(DispatchError::Status(original.clone()));
        assert_eq!(mapped, original);
    }

    #[test]
    fn error_response_without_error_is_empty_success() {
        assert_eq!(error_response(None), Response::empty());
    }

    #[test]
    fn error_response_carries_mapped_error() {
        let rsp = error_response(Some(DispatchError::DestinationNotFound("/x".into())));
        assert!(rsp.body.is_none());
        match rsp.error {
            Some(DispatchError::Status(status)) => assert_eq!(status.status_code(), 404),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
