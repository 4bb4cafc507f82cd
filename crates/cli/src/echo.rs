//! Built-in core used by `rdispatch serve` when no upstream is configured.

use async_trait::async_trait;
use dispatch::{Context, DispatchError, Dispatcher, Request, Response};
use tracing::info;

/// Replies to every Call with the request body and accepts every Send.
pub struct EchoCore;

#[async_trait]
impl Dispatcher for EchoCore {
    async fn call(&self, ctx: &Context, request: Request) -> Response {
        if ctx.is_expired() {
            return Response::from_error(DispatchError::DeadlineExceeded(ctx.timeout()));
        }
        info!(
            address = %request.address,
            bytes = request.body.as_ref().map_or(0, |body| body.len()),
            "echo call"
        );
        match request.body {
            Some(body) => Response::with_body(body),
            None => Response::empty(),
        }
    }

    async fn send(&self, request: Request) -> Result<(), DispatchError> {
        info!(address = %request.address, "echo send accepted");
        Ok(())
    }
}
