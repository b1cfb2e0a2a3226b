//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing and dispatch produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the HTTP layer for correlation
//! - Metrics calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
