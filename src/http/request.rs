//! Request handling and transformation.
//!
//! # Responsibilities
//! - Turn fetch inputs (URL strings, method/URL pairs, requests) into requests
//! - Reconstruct the full request URL used for routing
//! - Capture the request head handed to error responders
//!
//! # Design Decisions
//! - Absolute-form URIs are used as-is, whatever their scheme
//! - Origin-form URIs (as received by a server) are resolved against the
//!   `Host` header over `http`

use axum::body::Body;
use axum::http::uri::Authority;
use axum::http::{header, HeaderMap, Method, Request, Uri};
use url::Url;

use crate::http::error::FetchError;
use crate::routing::{RequestTarget, RouteError};

/// Method, URI and headers of a request, kept after the request itself has
/// been handed to a handler.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestHead {
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }
}

/// Values accepted by [`Fetch::fetch`](crate::http::Fetch::fetch).
pub trait IntoFetchRequest {
    fn into_fetch_request(self) -> Result<Request<Body>, FetchError>;
}

impl IntoFetchRequest for Request<Body> {
    fn into_fetch_request(self) -> Result<Request<Body>, FetchError> {
        Ok(self)
    }
}

/// A bare URL is a `GET` with an empty body.
impl IntoFetchRequest for &str {
    fn into_fetch_request(self) -> Result<Request<Body>, FetchError> {
        (Method::GET, self).into_fetch_request()
    }
}

impl IntoFetchRequest for String {
    fn into_fetch_request(self) -> Result<Request<Body>, FetchError> {
        self.as_str().into_fetch_request()
    }
}

impl IntoFetchRequest for (Method, &str) {
    fn into_fetch_request(self) -> Result<Request<Body>, FetchError> {
        let (method, url) = self;
        Ok(Request::builder()
            .method(method)
            .uri(url)
            .body(Body::empty())?)
    }
}

/// The full URL of `request`.
pub fn request_url<B>(request: &Request<B>) -> Result<Url, RouteError> {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        let raw = uri.to_string();
        return Url::parse(&raw).map_err(|e| RouteError::malformed(&raw, e));
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| RouteError::malformed(&uri.to_string(), "missing Host header"))?;
    let authority: Authority = host
        .parse()
        .map_err(|_| RouteError::malformed(host, "Host header is not a valid authority"))?;
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let raw = format!("http://{authority}{path}");
    Url::parse(&raw).map_err(|e| RouteError::malformed(&raw, e))
}

/// The match-ready view of `request`.
pub fn request_target<B>(request: &Request<B>) -> Result<RequestTarget, RouteError> {
    let url = request_url(request)?;
    Ok(RequestTarget::from_url(request.method().as_str(), &url))
}
