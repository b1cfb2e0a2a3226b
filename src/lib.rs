//! Fetch-style request handling with a multi-criteria URL router.
//!
//! A handler (`Fn(Request<Body>) -> Future<Output = Result<HandlerResponse, _>>`)
//! becomes a callable [`Fetch`] via [`make_fetch`]. [`make_routed_fetch`]
//! layers a [`Router`] on top: routes match on method, protocol, hostname
//! and path segments, with `*` and trailing `**` wildcards, first
//! registration wins.
//!
//! ```no_run
//! use fetch_router::{make_routed_fetch, BoxError, HandlerResponse};
//! use axum::{body::Body, http::Request};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! async fn hello(_request: Request<Body>) -> Result<HandlerResponse, BoxError> {
//!     Ok(HandlerResponse::default().with_body("hello"))
//! }
//!
//! let mut routes = make_routed_fetch();
//! routes.add("GET", "hyper://example/hello", hello)?;
//! let fetch = routes.build();
//!
//! let response = fetch.fetch("hyper://example/hello").await?;
//! assert_eq!(response.status(), 200);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use http::{
    make_fetch, make_routed_fetch, BoxError, Fetch, FetchError, Handler, HandlerResponse,
    HttpServer, ResponseBody,
};
pub use lifecycle::Shutdown;
pub use routing::{RequestTarget, Route, RouteError, Router};
