//! Inbound adapter: serves a [`Dispatcher`] over HTTP.
//!
//! Each request goes through the same steps:
//!
//! 1. Pick the verb from the method token.
//! 2. Resolve the wire request. An unresolvable request is answered `400`
//!    without reaching the core.
//! 3. Call: invoke [`Dispatcher::call`] under the request deadline, or the
//!    configured default. Send: invoke [`Dispatcher::send`].
//! 4. Map any error through [`to_status_error`] and write the response.
//!    A successful Send is answered `202 Accepted`.
//!
//! The core runs in its own task, so a panicking handler still gets a response.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::Router;
use bytes::Bytes;
use dispatch::{Context, DispatchError, Dispatcher, Request, Response, StatusError, Verb};
use http::{Method, StatusCode};
use http_body_util::Limited;
use tokio::net::TcpListener;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;
use tracing::{debug, field, info, instrument, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::{ServerConfig, DEFAULT_MAX_BODY_BYTES};
use crate::{bridge, status::to_status_error};

// ---------------------------------------------------------------------------
// Adapter seam
// ---------------------------------------------------------------------------

/// The wire-facing operations used by [`RemoteDispatcher`].
///
/// [`DefaultServerAdapter`] implements them with the [`crate::bridge`]
/// functions; substitute another implementation to change wire conventions.
#[async_trait]
pub trait ServerAdapter: Send + Sync + 'static {
    /// Derives the verb from the inbound method token.
    fn verb(&self, method: &Method) -> Verb;

    /// Resolves an inbound request; `None` means it cannot be dispatched.
    async fn resolve_request(&self, request: http::Request<Body>) -> Option<Request>;

    /// Writes a dispatch response as a wire response.
    fn write_response(&self, response: Response) -> http::Response<Bytes>;
}

/// Standard wire conventions, with a cap on inbound body size.
#[derive(Debug, Clone)]
pub struct DefaultServerAdapter {
    max_body_bytes: usize,
}

impl DefaultServerAdapter {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }
}

impl Default for DefaultServerAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_BYTES)
    }
}

#[async_trait]
impl ServerAdapter for DefaultServerAdapter {
    fn verb(&self, method: &Method) -> Verb {
        bridge::verb_from_method(method)
    }

    async fn resolve_request(&self, request: http::Request<Body>) -> Option<Request> {
        let limit = self.max_body_bytes;
        bridge::resolve_request(request.map(|body| Limited::new(body, limit))).await
    }

    fn write_response(&self, response: Response) -> http::Response<Bytes> {
        bridge::write_response(response)
    }
}

// ---------------------------------------------------------------------------
// RemoteDispatcher
// ---------------------------------------------------------------------------

/// Serves a dispatch core over HTTP.
pub struct RemoteDispatcher<D, A = DefaultServerAdapter> {
    dispatcher: Arc<D>,
    adapter: A,
    default_deadline: Duration,
}

impl<D> RemoteDispatcher<D>
where
    D: Dispatcher + 'static,
{
    /// Serves `dispatcher` with the default adapter and configuration.
    pub fn new(dispatcher: Arc<D>) -> Self {
        Self::with_config(dispatcher, &ServerConfig::default())
    }

    /// Serves `dispatcher` with the default adapter configured by `config`.
    pub fn with_config(dispatcher: Arc<D>, config: &ServerConfig) -> Self {
        Self::with_adapter(
            dispatcher,
            DefaultServerAdapter::new(config.max_body_bytes),
            config.default_deadline,
        )
    }
}

impl<D, A> RemoteDispatcher<D, A>
where
    D: Dispatcher + 'static,
    A: ServerAdapter,
{
    /// Serves `dispatcher` through a custom adapter.
    pub fn with_adapter(dispatcher: Arc<D>, adapter: A, default_deadline: Duration) -> Self {
        Self {
            dispatcher,
            adapter,
            default_deadline,
        }
    }

    /// Handles one inbound request. Always produces a response.
    #[instrument(
        name = "dispatch_request",
        skip_all,
        fields(
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            target = %request.uri(),
            verb = field::Empty,
            status = field::Empty,
        )
    )]
    pub async fn handle(&self, request: http::Request<Body>) -> http::Response<Bytes> {
        let verb = self.adapter.verb(request.method());
        Span::current().record("verb", field::display(verb));

        let Some(resolved) = self.adapter.resolve_request(request).await else {
            warn!("rejecting unresolvable request");
            let response = Response::from_error(StatusError::from_code(StatusCode::BAD_REQUEST.as_u16()));
            return self.finish(verb, response);
        };

        let response = match verb {
            Verb::Call => self.call(resolved).await,
            Verb::Send => self.send(resolved).await,
        };
        self.finish(verb, response)
    }

    async fn call(&self, request: Request) -> Response {
        let timeout = request.deadline.unwrap_or(self.default_deadline);
        debug!(address = %request.address, ?timeout, "dispatching call");

        let dispatcher = Arc::clone(&self.dispatcher);
        let task = tokio::spawn(
            async move {
                let ctx = Context::with_timeout(timeout);
                dispatcher.call(&ctx, request).await
            }
            .instrument(Span::current()),
        );

        let mut response = match task.await {
            Ok(response) => response,
            Err(err) => Response::from_error(fault_from_join(err)),
        };
        response.error = response.error.map(|err| to_status_error(err).into());
        response
    }

    async fn send(&self, request: Request) -> Response {
        debug!(address = %request.address, "dispatching send");

        let dispatcher = Arc::clone(&self.dispatcher);
        let task = tokio::spawn(
            async move { dispatcher.send(request).await }.instrument(Span::current()),
        );

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(fault_from_join(err)),
        };
        match outcome {
            Ok(()) => Response::empty(),
            Err(err) => Response::from_error(to_status_error(err)),
        }
    }

    fn finish(&self, verb: Verb, response: Response) -> http::Response<Bytes> {
        let mut wire = self.adapter.write_response(response);
        if verb == Verb::Send && wire.status() == StatusCode::OK {
            *wire.status_mut() = StatusCode::ACCEPTED;
        }
        Span::current().record("status", wire.status().as_u16());
        wire
    }

    /// An axum router that sends every path and method to [`Self::handle`].
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .fallback(serve_request::<D, A>)
            .with_state(self)
            .layer(TraceLayer::new_for_http())
    }

    /// Serves on `listener` until `shutdown` completes.
    pub async fn serve<F>(self: Arc<Self>, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = ?listener.local_addr().ok(), "serving dispatch core over HTTP");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }
}

async fn serve_request<D, A>(
    State(server): State<Arc<RemoteDispatcher<D, A>>>,
    request: axum::extract::Request,
) -> axum::response::Response
where
    D: Dispatcher + 'static,
    A: ServerAdapter,
{
    server.handle(request).await.map(Body::from)
}

/// Converts a failed core task into the dispatch error it stands for.
fn fault_from_join(err: JoinError) -> DispatchError {
    if !err.is_panic() {
        return DispatchError::Canceled;
    }
    let payload = err.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_owned());
    warn!(%message, "dispatch core panicked");
    DispatchError::Panic(message)
}
