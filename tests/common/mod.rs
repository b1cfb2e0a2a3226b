//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use fetch_router::http::fetch::HandlerFuture;
use fetch_router::{BoxError, HandlerResponse};
use tokio::net::TcpListener;

/// A handler answering 200 with `label` as the body.
#[allow(dead_code)]
pub fn labelled(label: &'static str) -> impl Fn(Request<Body>) -> HandlerFuture + Send + Sync + 'static {
    move |_request: Request<Body>| -> HandlerFuture {
        Box::pin(async move { Ok::<_, BoxError>(HandlerResponse::default().with_body(label)) })
    }
}

/// Collect a response body as text.
#[allow(dead_code)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be utf-8")
}

/// Bind an ephemeral local port.
#[allow(dead_code)]
pub async fn ephemeral_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Poll `addr` until it accepts connections.
#[allow(dead_code)]
pub async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {addr} never started listening");
}
