//! HTTP request/response adaptation subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, hot-swappable fetch)
//!     → fetch.rs (Dispatcher: route lookup, handler, fallbacks)
//!     → request.rs (fetch inputs, request URL reconstruction)
//!     → response.rs (handler output → Response<Body>)
//!     → Send to client
//! ```

pub mod error;
pub mod fetch;
pub mod request;
pub mod response;
pub mod server;

pub use error::{BoxError, FetchError, HandlerFailure};
pub use fetch::{make_fetch, make_routed_fetch, Fetch, Handler, RoutedFetchBuilder, SharedHandler};
pub use request::{IntoFetchRequest, RequestHead};
pub use response::{default_not_found, default_on_error, status_text, HandlerResponse, ResponseBody};
pub use server::HttpServer;
