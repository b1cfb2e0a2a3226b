//! Response handling and transformation.
//!
//! # Responsibilities
//! - Describe handler output (status, status text, headers, body)
//! - Convert handler output into `http::Response<Body>`
//! - Provide the default not-found and error responses
//!
//! # Design Decisions
//! - Bodies are either a fixed payload or a lazily produced chunk stream
//! - Streaming bodies are forwarded without buffering
//! - Status text travels as a `hyper::ext::ReasonPhrase` extension

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode};
use futures_util::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use hyper::ext::ReasonPhrase;

use crate::http::error::{error_chain, BoxError, FetchError};
use crate::http::request::RequestHead;

/// Body of a [`HandlerResponse`].
pub enum ResponseBody {
    Empty,
    /// A fixed payload.
    Full(Bytes),
    /// Chunks produced on demand.
    Stream(BoxStream<'static, Result<Bytes, BoxError>>),
    /// An already assembled body, passed through untouched.
    Body(Body),
}

impl ResponseBody {
    /// Wrap a stream of chunks.
    pub fn from_stream<S, T, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'static,
        T: Into<Bytes> + 'static,
        E: Into<BoxError> + 'static,
    {
        ResponseBody::Stream(
            stream
                .map_ok(Into::<Bytes>::into)
                .map_err(Into::<BoxError>::into)
                .boxed(),
        )
    }

    fn into_body(self) -> Body {
        match self {
            ResponseBody::Empty => Body::empty(),
            ResponseBody::Full(bytes) => Body::from(bytes),
            ResponseBody::Stream(stream) => Body::from_stream(stream),
            ResponseBody::Body(body) => body,
        }
    }
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Empty => f.write_str("Empty"),
            ResponseBody::Full(bytes) => f.debug_tuple("Full").field(bytes).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
            ResponseBody::Body(_) => f.write_str("Body(..)"),
        }
    }
}

impl Default for ResponseBody {
    fn default() -> Self {
        ResponseBody::Empty
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        ResponseBody::Full(bytes)
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Full(Bytes::from(text))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(text: &'static str) -> Self {
        ResponseBody::Full(Bytes::from_static(text.as_bytes()))
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        ResponseBody::Full(Bytes::from(bytes))
    }
}

/// What a handler produces.
#[derive(Debug, Default)]
pub struct HandlerResponse {
    pub status: StatusCode,
    pub status_text: Option<String>,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl HandlerResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = Some(text.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<ResponseBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Assemble the final response.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(self.body.into_body());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;

        if let Some(text) = self.status_text {
            match ReasonPhrase::try_from(text) {
                Ok(phrase) => {
                    response.extensions_mut().insert(phrase);
                }
                Err(_) => tracing::warn!(status = %self.status, "Dropping invalid status text"),
            }
        }

        response
    }
}

impl From<StatusCode> for HandlerResponse {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

impl From<Response<Body>> for HandlerResponse {
    fn from(response: Response<Body>) -> Self {
        let (parts, body) = response.into_parts();
        let status_text = parts
            .extensions
            .get::<ReasonPhrase>()
            .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned());

        Self {
            status: parts.status,
            status_text,
            headers: parts.headers,
            body: ResponseBody::Body(body),
        }
    }
}

/// The status text of `response`, if one was set.
pub fn status_text<B>(response: &Response<B>) -> Option<&str> {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
}

/// Default responder for requests no route matched.
pub async fn default_not_found(_request: Request<Body>) -> Result<HandlerResponse, BoxError> {
    Ok(HandlerResponse::new(StatusCode::NOT_FOUND).with_status_text("Invalid URL"))
}

/// Default responder for failed requests: a plain-text 500 carrying the
/// error chain.
pub fn default_on_error(error: &FetchError, _request: &RequestHead) -> HandlerResponse {
    HandlerResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
        .with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
        .with_body(error_chain(error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::error::HandlerFailure;
    use axum::http::Method;

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_full_body_conversion() {
        let response = HandlerResponse::new(StatusCode::CREATED)
            .with_status_text("Made It")
            .with_header(header::ETAG, HeaderValue::from_static("\"v1\""))
            .with_body("hello")
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(status_text(&response), Some("Made It"));
        assert_eq!(response.headers()[header::ETAG], "\"v1\"");
        assert_eq!(body_text(response).await, "hello");
    }

    #[tokio::test]
    async fn test_stream_body_conversion() {
        let chunks = futures_util::stream::iter(vec![
            Ok::<_, BoxError>("one,"),
            Ok("two,"),
            Ok("three"),
        ]);
        let response = HandlerResponse::new(StatusCode::OK)
            .with_body(ResponseBody::from_stream(chunks))
            .into_response();

        assert_eq!(body_text(response).await, "one,two,three");
    }

    #[tokio::test]
    async fn test_invalid_status_text_dropped() {
        let response = HandlerResponse::new(StatusCode::OK)
            .with_status_text("line\nbreak")
            .into_response();
        assert_eq!(status_text(&response), None);
    }

    #[tokio::test]
    async fn test_from_response_round_trips_status_text() {
        let original = HandlerResponse::new(StatusCode::ACCEPTED)
            .with_status_text("Queued")
            .with_body("later")
            .into_response();

        let response = HandlerResponse::from(original).into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(status_text(&response), Some("Queued"));
        assert_eq!(body_text(response).await, "later");
    }

    #[tokio::test]
    async fn test_default_responders() {
        let request = Request::builder().body(Body::empty()).unwrap();
        let not_found = default_not_found(request).await.unwrap().into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(status_text(&not_found), Some("Invalid URL"));

        let head = RequestHead {
            method: Method::GET,
            uri: "/".parse().unwrap(),
            headers: HeaderMap::new(),
        };
        let error = FetchError::Handler(HandlerFailure::Panicked("boom".into()));
        let response = default_on_error(&error, &head).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "handler panicked: boom");
    }
}
