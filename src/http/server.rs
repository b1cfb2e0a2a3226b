//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build a routed fetch from the configured static routes
//! - Create the Axum router that hands every request to that fetch
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap in a rebuilt fetch when a new configuration arrives
//! - Stop accepting connections on shutdown

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceExt;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{ResponseConfig, ServerConfig};
use crate::http::fetch::{make_routed_fetch, Fetch, Handler, HandlerFuture};
use crate::http::response::HandlerResponse;
use crate::routing::RouteError;

/// Errors raised while turning a configuration into a fetch.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("invalid response: {0}")]
    Response(String),
}

/// A fixed response configured for a route.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    status: StatusCode,
    status_text: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl TryFrom<&ResponseConfig> for StaticResponse {
    type Error = BuildError;

    fn try_from(config: &ResponseConfig) -> Result<Self, Self::Error> {
        let status = StatusCode::from_u16(config.status)
            .map_err(|_| BuildError::Response(format!("status {} out of range", config.status)))?;

        Ok(Self {
            status,
            status_text: config.status_text.clone(),
            headers: header_map(&config.headers)?,
            body: Bytes::from(config.body.clone().unwrap_or_default()),
        })
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, BuildError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BuildError::Response(format!("invalid header name {name:?}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| BuildError::Response(format!("invalid value for header {name}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

impl Handler for StaticResponse {
    fn call(&self, _request: Request<Body>) -> HandlerFuture {
        let response = HandlerResponse {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone().into(),
        };
        Box::pin(async move { Ok(response) })
    }
}

/// Build the routed fetch described by `config`.
pub fn build_fetch(config: &ServerConfig) -> Result<Fetch, BuildError> {
    let mut builder = make_routed_fetch();
    for route in &config.routes {
        let response = StaticResponse::try_from(&route.response)?;
        builder.add(&route.method, &route.url, response)?;
    }
    if let Some(not_found) = &config.not_found {
        builder = builder.on_not_found(StaticResponse::try_from(not_found)?);
    }
    Ok(builder.build())
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub fetch: Arc<ArcSwap<Fetch>>,
}

/// HTTP server hosting a routed fetch.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    fetch: Arc<ArcSwap<Fetch>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self, BuildError> {
        Ok(Self::with_fetch(config.clone(), build_fetch(&config)?))
    }

    /// Create a server that hands every request to `fetch`.
    pub fn with_fetch(config: ServerConfig, fetch: Fetch) -> Self {
        let fetch = Arc::new(ArcSwap::from_pointee(fetch));
        let state = AppState {
            fetch: fetch.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            fetch,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the route table;
    /// a message on `shutdown` stops the server gracefully.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServerConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        let fetch = self.fetch.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match build_fetch(&config) {
                    Ok(next) => {
                        fetch.store(Arc::new(next));
                        tracing::info!(routes = config.routes.len(), "Routes reloaded");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to rebuild routes. Keeping current table.");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Hand the request to the current fetch.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response<Body> {
    let fetch = Fetch::clone(&state.fetch.load());
    match fetch.oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}
