//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     router.add(method, url, handler)
//!     → route.rs (parse URL into method/protocol/hostname/segments)
//!     → append to route table
//!
//! Incoming Request (method, url):
//!     → route.rs (RequestTarget, parsed once)
//!     → router.rs (scan routes in registration order)
//!     → matcher.rs (evaluate the four match dimensions)
//!     → Return: matched Route or None
//! ```
//!
//! # Design Decisions
//! - Routes built at startup, immutable once shared
//! - `*` matches any single value, `**` any path suffix
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod matcher;
pub mod route;
pub mod router;

pub use matcher::{MatchDimension, MATCH_ORDER};
pub use route::{Criterion, RequestTarget, Route, RouteError, Segment, REST_WILDCARD, WILDCARD};
pub use router::Router;
