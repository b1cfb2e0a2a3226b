//! Route matching logic.
//!
//! # Responsibilities
//! - Compare one match dimension of a route against a request
//! - Walk path segments with `*` and `**` wildcard semantics
//!
//! # Design Decisions
//! - One dedicated comparison function per dimension, selected by enum
//! - Method comparison is case-insensitive (both sides uppercased)
//! - Protocol, hostname and path segments compare exactly
//! - No regex; matching is a linear walk over the segments

use crate::routing::route::{Route, RequestTarget, Segment};

/// The dimensions a route is matched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDimension {
    Method,
    Protocol,
    Hostname,
    Pathname,
}

/// Order in which dimensions are evaluated.
pub const MATCH_ORDER: [MatchDimension; 4] = [
    MatchDimension::Method,
    MatchDimension::Protocol,
    MatchDimension::Hostname,
    MatchDimension::Pathname,
];

impl MatchDimension {
    /// Returns true if `route` accepts `target` on this dimension.
    pub fn matches<H>(self, route: &Route<H>, target: &RequestTarget) -> bool {
        match self {
            MatchDimension::Method => method_matches(route, target),
            MatchDimension::Protocol => protocol_matches(route, target),
            MatchDimension::Hostname => hostname_matches(route, target),
            MatchDimension::Pathname => path_matches(route.segments(), target.segments()),
        }
    }
}

/// Evaluates every dimension, then reports whether all of them passed.
pub fn route_matches<H>(route: &Route<H>, target: &RequestTarget) -> bool {
    let mut matched = true;
    for dimension in MATCH_ORDER {
        if !dimension.matches(route, target) {
            tracing::trace!(
                pattern = %route.pattern(),
                dimension = ?dimension,
                "Route rejected"
            );
            matched = false;
        }
    }
    matched
}

fn method_matches<H>(route: &Route<H>, target: &RequestTarget) -> bool {
    // Both sides are uppercased when parsed.
    route.method().accepts(target.method())
}

fn protocol_matches<H>(route: &Route<H>, target: &RequestTarget) -> bool {
    route.protocol().accepts(target.protocol())
}

fn hostname_matches<H>(route: &Route<H>, target: &RequestTarget) -> bool {
    route.hostname().accepts(target.hostname())
}

/// Segment-wise path comparison.
///
/// Without a trailing `**` the route and request must have the same number
/// of segments. A trailing `**` absorbs whatever the request has left once
/// the walk reaches it.
pub fn path_matches<S: AsRef<str>>(route: &[Segment], request: &[S]) -> bool {
    if route.is_empty() || request.is_empty() {
        return false;
    }

    let route_last = route.len() - 1;
    let request_last = request.len() - 1;

    for (i, segment) in route.iter().enumerate() {
        let accepted = segment.accepts(request[i].as_ref());

        if i == route_last {
            if *segment == Segment::Rest {
                return true;
            }
            return i == request_last && accepted;
        }
        if i == request_last {
            return false;
        }
        if !accepted {
            return false;
        }
    }

    false
}
