//! Outbound adapter: dispatch requests to a remote peer over HTTP.
//!
//! [`RemoteDest`] never fails with a transport error. Build and transport
//! failures come back as a [`Response`] carrying a `500` [`StatusError`].

use async_trait::async_trait;
use bytes::Bytes;
use dispatch::{Context, DispatchError, Dispatcher, Request, Response, StatusError, Verb};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::BodyExt;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::status::to_status_error;
use crate::{bridge, BoxError, BuildError, ConfigError, TransportError};

/// Type-erased body of a wire response handed back by a [`Transport`].
pub type WireBody = UnsyncBoxBody<Bytes, BoxError>;

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Performs one request/response exchange with a remote peer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<WireBody>, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
///
/// Connection pooling and timeouts are whatever the client was built with.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an already configured client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a client honouring the timeouts in `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        Ok(Self::new(builder.build()?))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn round_trip(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<WireBody>, TransportError> {
        let request = reqwest::Request::try_from(request)?;
        let response = self.client.execute(request).await?;

        let mut builder = http::Response::builder()
            .status(response.status())
            .version(response.version());
        if let Some(headers) = builder.headers_mut() {
            *headers = response.headers().clone();
        }

        let body = reqwest::Body::from(response)
            .map_err(|err| -> BoxError { Box::new(err) })
            .boxed_unsync();
        builder
            .body(body)
            .map_err(|err| TransportError::Other(err.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Adapter seam
// ---------------------------------------------------------------------------

/// The wire-facing operations used by [`RemoteDest`].
#[async_trait]
pub trait ClientAdapter: Send + Sync {
    fn build_request(
        &self,
        request: &Request,
        remote_addr: &str,
        verb: Verb,
    ) -> Result<http::Request<Bytes>, BuildError>;

    async fn resolve_response(&self, response: http::Response<WireBody>) -> Response;
}

/// Standard wire conventions from [`crate::bridge`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClientAdapter;

#[async_trait]
impl ClientAdapter for DefaultClientAdapter {
    fn build_request(
        &self,
        request: &Request,
        remote_addr: &str,
        verb: Verb,
    ) -> Result<http::Request<Bytes>, BuildError> {
        bridge::build_request(request, remote_addr, verb)
    }

    async fn resolve_response(&self, response: http::Response<WireBody>) -> Response {
        bridge::resolve_response(response).await
    }
}

// ---------------------------------------------------------------------------
// RemoteDest
// ---------------------------------------------------------------------------

/// A remote peer reachable over HTTP at a base address such as `http://host:8080/`.
pub struct RemoteDest<T = ReqwestTransport, A = DefaultClientAdapter> {
    addr: String,
    transport: T,
    adapter: A,
}

impl RemoteDest {
    /// A destination using a default `reqwest` client.
    pub fn new(addr: impl Into<String>) -> Self {
        Self::with_transport(addr, ReqwestTransport::default())
    }
}

impl<T: Transport> RemoteDest<T> {
    /// A destination using `transport` and the standard wire conventions.
    pub fn with_transport(addr: impl Into<String>, transport: T) -> Self {
        Self::with_parts(addr, transport, DefaultClientAdapter)
    }
}

impl<T: Transport, A: ClientAdapter> RemoteDest<T, A> {
    /// A destination with a custom transport and adapter.
    pub fn with_parts(addr: impl Into<String>, transport: T, adapter: A) -> Self {
        Self {
            addr: addr.into(),
            transport,
            adapter,
        }
    }

    /// The base address requests are sent to.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Calls the remote peer and waits for its result.
    ///
    /// A request without its own deadline carries the time left in `ctx`.
    /// An expired `ctx` fails with `408` before any I/O.
    pub async fn call(&self, ctx: &Context, mut request: Request) -> Response {
        if ctx.is_expired() {
            debug!(remote = %self.addr, address = %request.address, "context expired before call");
            return Response::from_error(to_status_error(DispatchError::DeadlineExceeded(
                ctx.timeout(),
            )));
        }
        if request.deadline.is_none() {
            request.deadline = Some(ctx.remaining());
        }
        self.do_remote_request(&request, Verb::Call).await
    }

    /// Hands the request to the remote peer for asynchronous processing.
    pub async fn send(&self, request: Request) -> Response {
        self.do_remote_request(&request, Verb::Send).await
    }

    #[instrument(
        name = "remote_request",
        skip(self, request, verb),
        fields(remote = %self.addr, address = %request.address, verb = %verb)
    )]
    async fn do_remote_request(&self, request: &Request, verb: Verb) -> Response {
        let wire = match self.adapter.build_request(request, &self.addr, verb) {
            Ok(wire) => wire,
            Err(err) => {
                warn!(error = %err, "failed to build remote request");
                return Response::from_error(StatusError::internal(err.to_string()));
            }
        };

        let response = match self.transport.round_trip(wire).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "remote request failed");
                return Response::from_error(StatusError::internal(err.to_string()));
            }
        };

        debug!(status = response.status().as_u16(), "remote peer responded");
        self.adapter.resolve_response(response).await
    }
}

#[async_trait]
impl<T: Transport, A: ClientAdapter> Dispatcher for RemoteDest<T, A> {
    async fn call(&self, ctx: &Context, request: Request) -> Response {
        RemoteDest::call(self, ctx, request).await
    }

    async fn send(&self, request: Request) -> Result<(), DispatchError> {
        match RemoteDest::send(self, request).await.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use dispatch::{Address, Sink};
    use http::header::CONTENT_TYPE;
    use http::{Method, StatusCode};
    use http_body_util::Full;

    fn wire_body(bytes: &'static [u8]) -> WireBody {
        Full::new(Bytes::from_static(bytes))
            .map_err(|never| match never {})
            .boxed_unsync()
    }

    /// Records outgoing requests and replies with a canned status, or fails.
    struct FakeTransport {
        seen: Mutex<Vec<http::Request<Bytes>>>,
        status: StatusCode,
        fail: bool,
    }

    impl FakeTransport {
        fn replying(status: StatusCode) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                status,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::replying(StatusCode::OK)
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn round_trip(
            &self,
            request: http::Request<Bytes>,
        ) -> Result<http::Response<WireBody>, TransportError> {
            self.seen.lock().unwrap().push(request);
            if self.fail {
                return Err(TransportError::Other("connection refused".into()));
            }
            Ok(http::Response::builder()
                .status(self.status)
                .header(CONTENT_TYPE, "text/plain")
                .body(wire_body(b"reply"))
                .unwrap())
        }
    }

    fn request(address: &str) -> Request {
        Request::new(Address::new(address).unwrap())
    }

    #[tokio::test]
    async fn target_does_not_double_separator() {
        let dest = RemoteDest::with_transport("http://h/", FakeTransport::replying(StatusCode::OK));
        let response = dest.send(request("/r")).await;

        assert!(response.error.is_none());
        let seen = dest.transport.seen.lock().unwrap();
        assert_eq!(seen[0].uri().to_string(), "http://h/r");
        assert_eq!(seen[0].method(), Method::POST);
    }

    #[tokio::test]
    async fn call_decodes_success_body() {
        let dest = RemoteDest::with_transport("http://h", FakeTransport::replying(StatusCode::OK));
        let response = dest
            .call(&Context::default(), request("/r").with_deadline(Duration::from_secs(2)))
            .await;

        assert_eq!(response.body, Some(Sink::text("reply")));
        assert!(response.error.is_none());
        let seen = dest.transport.seen.lock().unwrap();
        assert_eq!(seen[0].method(), Method::PUT);
        assert_eq!(seen[0].headers()[crate::TIMEOUT_HEADER], "2s");
    }

    #[tokio::test]
    async fn call_inherits_context_deadline() {
        let dest = RemoteDest::with_transport("http://h", FakeTransport::replying(StatusCode::OK));
        dest.call(&Context::with_timeout(Duration::from_secs(30)), request("/r"))
            .await;

        let seen = dest.transport.seen.lock().unwrap();
        let header = seen[0].headers()[crate::TIMEOUT_HEADER].to_str().unwrap();
        let propagated = crate::parse_duration(header).unwrap();
        assert!(propagated <= Duration::from_secs(30));
        assert!(propagated > Duration::from_secs(25));
    }

    #[tokio::test]
    async fn expired_context_fails_without_io() {
        let dest = RemoteDest::with_transport("http://h", FakeTransport::replying(StatusCode::OK));
        let response = dest
            .call(&Context::with_timeout(Duration::ZERO), request("/r"))
            .await;

        assert!(response.body.is_none());
        match response.error {
            Some(DispatchError::Status(err)) => assert_eq!(err.status_code(), 408),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(dest.transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_remote_address_fails_before_io() {
        let dest = RemoteDest::with_transport("", FakeTransport::replying(StatusCode::OK));
        let response = dest.send(request("/r")).await;

        match response.error {
            Some(DispatchError::Status(err)) => {
                assert_eq!(err.status_code(), 500);
                assert!(err.text().contains("empty"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(dest.transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_becomes_internal_error() {
        let dest = RemoteDest::with_transport("http://h", FakeTransport::failing());
        let response = dest.call(&Context::default(), request("/r")).await;

        assert!(response.body.is_none());
        match response.error {
            Some(DispatchError::Status(err)) => {
                assert_eq!(err.status_code(), 500);
                assert!(err.text().contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn remote_status_is_preserved() {
        let dest = RemoteDest::with_transport("http://h", FakeTransport::replying(StatusCode::NOT_FOUND));
        let response = dest.call(&Context::default(), request("/r")).await;
        assert_eq!(response.error, Some(StatusError::from_code(404).into()));
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn dispatcher_send_reports_remote_error() {
        let rejecting = RemoteDest::with_transport("http://h", FakeTransport::replying(StatusCode::NOT_IMPLEMENTED));
        let accepting = RemoteDest::with_transport("http://h", FakeTransport::replying(StatusCode::ACCEPTED));

        assert_eq!(
            Dispatcher::send(&rejecting, request("/r")).await,
            Err(StatusError::from_code(501).into())
        );
        assert_eq!(Dispatcher::send(&accepting, request("/r")).await, Ok(()));
    }
}
