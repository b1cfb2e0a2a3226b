//! Error types for the fetch adapter and dispatcher.

use thiserror::Error;

use crate::routing::RouteError;

/// Boxed error returned by handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A matched handler did not produce a response.
#[derive(Debug, Error)]
pub enum HandlerFailure {
    /// The handler returned an error.
    #[error("handler failed")]
    Failed(#[source] BoxError),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Errors surfaced by [`Fetch::fetch`](crate::http::Fetch::fetch) and passed to
/// error responders.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetch input could not be turned into a request.
    #[error("invalid request")]
    InvalidRequest(#[from] axum::http::Error),

    /// The request URL could not be parsed for routing.
    #[error(transparent)]
    InvalidUrl(#[from] RouteError),

    #[error(transparent)]
    Handler(#[from] HandlerFailure),
}

/// Render an error and its sources as `outer: inner: ...`.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
