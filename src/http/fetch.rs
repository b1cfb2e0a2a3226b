//! Handler adaptation and request dispatch.
//!
//! # Data Flow
//! ```text
//! fetch(input)
//!     → request.rs (URL string / method pair / request → Request<Body>)
//!     → handler (plain fetch) or Dispatcher (routed fetch):
//!         request_target → router.route → route handler | on_not_found
//!         handler error or panic → on_error
//!     → response.rs (HandlerResponse → Response<Body>)
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::{BoxFuture, FutureExt};

use crate::http::error::{BoxError, FetchError, HandlerFailure};
use crate::http::request::{request_target, IntoFetchRequest, RequestHead};
use crate::http::response::{default_not_found, default_on_error, HandlerResponse};
use crate::observability::metrics;
use crate::routing::{RouteError, Router};

/// Future returned by [`Handler::call`].
pub type HandlerFuture = BoxFuture<'static, Result<HandlerResponse, BoxError>>;

/// Request-processing logic.
///
/// Implemented for every `Fn(Request<Body>) -> impl Future<Output =
/// Result<impl Into<HandlerResponse>, impl Into<BoxError>>>`.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request<Body>) -> HandlerFuture;
}

impl<F, Fut, R, E> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Into<HandlerResponse>,
    E: Into<BoxError>,
{
    fn call(&self, request: Request<Body>) -> HandlerFuture {
        let future = (self)(request);
        Box::pin(async move { future.await.map(Into::into).map_err(Into::into) })
    }
}

/// A handler shared between routes and tasks.
pub type SharedHandler = Arc<dyn Handler>;

/// Responder for failed requests.
pub type ErrorHandler = Arc<dyn Fn(&FetchError, &RequestHead) -> HandlerResponse + Send + Sync>;

/// A handler turned into a request/response function.
#[derive(Clone)]
pub struct Fetch {
    handler: SharedHandler,
}

/// Wrap `handler` into a [`Fetch`].
pub fn make_fetch(handler: impl Handler) -> Fetch {
    Fetch {
        handler: Arc::new(handler),
    }
}

impl Fetch {
    /// Run the handler for `input` and assemble its response.
    pub async fn fetch(&self, input: impl IntoFetchRequest) -> Result<Response<Body>, FetchError> {
        let request = input.into_fetch_request()?;
        let response = self
            .handler
            .call(request)
            .await
            .map_err(HandlerFailure::Failed)?;
        Ok(response.into_response())
    }
}

impl std::fmt::Debug for Fetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetch").finish_non_exhaustive()
    }
}

/// Failures are answered with [`default_on_error`] so the service never errors.
impl tower::Service<Request<Body>> for Fetch {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response<Body>, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let fetch = self.clone();
        Box::pin(async move {
            let head = RequestHead::from_request(&request);
            match fetch.fetch(request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    tracing::error!(method = %head.method, uri = %head.uri, error = %e, "Fetch failed");
                    Ok(default_on_error(&e, &head).into_response())
                }
            }
        })
    }
}

/// Start building a routed fetch.
pub fn make_routed_fetch() -> RoutedFetchBuilder {
    RoutedFetchBuilder::default()
}

/// Collects routes and responders, then freezes them into a [`Fetch`].
pub struct RoutedFetchBuilder {
    router: Router<SharedHandler>,
    on_not_found: SharedHandler,
    on_error: ErrorHandler,
}

impl Default for RoutedFetchBuilder {
    fn default() -> Self {
        Self {
            router: Router::new(),
            on_not_found: Arc::new(default_not_found),
            on_error: Arc::new(default_on_error),
        }
    }
}

impl RoutedFetchBuilder {
    /// The route table, for registration.
    pub fn router(&mut self) -> &mut Router<SharedHandler> {
        &mut self.router
    }

    /// Register `handler` for `method` on `url`.
    pub fn add(
        &mut self,
        method: &str,
        url: &str,
        handler: impl Handler,
    ) -> Result<&mut Self, RouteError> {
        self.router.add(method, url, Arc::new(handler))?;
        Ok(self)
    }

    pub fn on_not_found(mut self, handler: impl Handler) -> Self {
        self.on_not_found = Arc::new(handler);
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&FetchError, &RequestHead) -> HandlerResponse + Send + Sync + 'static,
    {
        self.on_error = Arc::new(handler);
        self
    }

    /// Freeze the route table and return the fetch function.
    pub fn build(self) -> Fetch {
        tracing::debug!(routes = self.router.len(), "Routed fetch built");
        make_fetch(Dispatcher {
            router: Arc::new(self.router),
            on_not_found: self.on_not_found,
            on_error: self.on_error,
        })
    }
}

/// Routes each request and runs the matched handler.
struct Dispatcher {
    router: Arc<Router<SharedHandler>>,
    on_not_found: SharedHandler,
    on_error: ErrorHandler,
}

impl Handler for Dispatcher {
    fn call(&self, request: Request<Body>) -> HandlerFuture {
        let router = self.router.clone();
        let on_not_found = self.on_not_found.clone();
        let on_error = self.on_error.clone();

        Box::pin(async move {
            let start_time = Instant::now();
            let head = RequestHead::from_request(&request);
            let method = head.method.to_string();

            let target = match request_target(&request) {
                Ok(target) => target,
                Err(e) => {
                    tracing::warn!(method = %method, uri = %head.uri, error = %e, "Unroutable request");
                    let response = on_error(&FetchError::InvalidUrl(e), &head);
                    metrics::record_request(&method, response.status.as_u16(), "invalid", start_time);
                    return Ok(response);
                }
            };

            let (handler, pattern) = match router.route(&target) {
                Some(route) => (route.handler().clone(), route.pattern().to_string()),
                None => {
                    tracing::debug!(method = %method, uri = %head.uri, "No route matched");
                    let response = on_not_found.call(request).await?;
                    metrics::record_request(&method, response.status.as_u16(), "none", start_time);
                    return Ok(response);
                }
            };

            tracing::debug!(method = %method, uri = %head.uri, route = %pattern, "Dispatching request");

            let outcome = AssertUnwindSafe(async move { handler.call(request).await })
                .catch_unwind()
                .await;

            let response = match outcome {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    let failure = FetchError::Handler(HandlerFailure::Failed(e));
                    tracing::warn!(route = %pattern, error = %failure, "Handler failed");
                    on_error(&failure, &head)
                }
                Err(panic) => {
                    let failure = FetchError::Handler(HandlerFailure::Panicked(panic_message(&*panic)));
                    tracing::warn!(route = %pattern, error = %failure, "Handler panicked");
                    on_error(&failure, &head)
                }
            };

            metrics::record_request(&method, response.status.as_u16(), &pattern, start_time);
            Ok(response)
        })
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
