//! The port through which adapters reach a dispatch core.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{Context, DispatchError, Request, Response};

/// A request-dispatch core.
///
/// Routing, handler registration and deadline enforcement are the
/// implementor's concern. Adapters only pick the operation matching the
/// caller's [`crate::Verb`].
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Dispatches `request` and waits for its result, bounded by `ctx`.
    async fn call(&self, ctx: &Context, request: Request) -> Response;

    /// Accepts `request` for asynchronous processing.
    ///
    /// `Ok(())` means the request was accepted, not that it completed.
    async fn send(&self, request: Request) -> Result<(), DispatchError>;
}

#[async_trait]
impl<D: Dispatcher + ?Sized> Dispatcher for Arc<D> {
    async fn call(&self, ctx: &Context, request: Request) -> Response {
        (**self).call(ctx, request).await
    }

    async fn send(&self, request: Request) -> Result<(), DispatchError> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, Sink};

    struct Echo;

    #[async_trait]
    impl Dispatcher for Echo {
        async fn call(&self, _ctx: &Context, request: Request) -> Response {
            match request.body {
                Some(body) => Response::with_body(body),
                None => Response::empty(),
            }
        }

        async fn send(&self, _request: Request) -> Result<(), DispatchError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn arc_forwards_to_inner() {
        let core: Arc<dyn Dispatcher> = Arc::new(Echo);
        let request = Request::new(Address::new("/echo").unwrap()).with_body(Sink::text("ping"));
        let response = core.call(&Context::default(), request).await;
        assert_eq!(response.body, Some(Sink::text("ping")));
        assert!(core.send(Request::new(Address::new("/e").unwrap())).await.is_ok());
    }
}
