//! Route definitions and request targets.
//!
//! A [`Route`] is the parsed form of a registration call: the criteria for
//! each match dimension plus the caller's handler. A [`RequestTarget`] is the
//! same decomposition applied to an incoming request, computed once per
//! lookup.

use thiserror::Error;
use url::Url;

/// Marker matching any value in its position.
pub const WILDCARD: &str = "*";

/// Marker matching the remaining path segments (final position only).
pub const REST_WILDCARD: &str = "**";

/// Scheme substituted when parsing a `*://` pattern.
const WILDCARD_SCHEME_STANDIN: &str = "http";

/// Errors raised while building routes or request targets.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The URL could not be parsed as an absolute URL with a host.
    #[error("malformed URL {url:?}: {reason}")]
    MalformedUrl { url: String, reason: String },

    /// `**` appeared before the last path segment.
    #[error("'**' must be the last path segment in {url:?}")]
    MisplacedRest { url: String },
}

impl RouteError {
    pub(crate) fn malformed(url: &str, reason: impl ToString) -> Self {
        Self::MalformedUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A criterion on a single scalar dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Matches any value.
    Any,
    /// Matches exactly this value.
    Exact(String),
}

impl Criterion {
    fn parse(value: &str) -> Self {
        if value == WILDCARD {
            Criterion::Any
        } else {
            Criterion::Exact(value.to_string())
        }
    }

    /// Returns true if `value` satisfies this criterion.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Criterion::Any => true,
            Criterion::Exact(expected) => expected == value,
        }
    }
}

/// One `/`-delimited component of a route path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// `*`: any single segment.
    Wildcard,
    /// `**`: this segment and everything after it.
    Rest,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw {
            WILDCARD => Segment::Wildcard,
            REST_WILDCARD => Segment::Rest,
            literal => Segment::Literal(literal.to_string()),
        }
    }

    /// Single-segment comparison. `Rest` only ever compares against itself
    /// here; its suffix semantics live in the path matcher.
    pub fn accepts(&self, segment: &str) -> bool {
        match self {
            Segment::Literal(literal) => literal == segment,
            Segment::Wildcard => true,
            Segment::Rest => segment == REST_WILDCARD,
        }
    }
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: String,
    method: Criterion,
    protocol: Criterion,
    hostname: Criterion,
    segments: Vec<Segment>,
    handler: H,
}

impl<H> Route<H> {
    /// Parse a registration into a route.
    pub fn new(method: &str, pattern: &str, handler: H) -> Result<Self, RouteError> {
        let (url, any_protocol) = match pattern.strip_prefix("*://") {
            Some(rest) => (parse_absolute(pattern, &format!("{WILDCARD_SCHEME_STANDIN}://{rest}"))?, true),
            None => (parse_absolute(pattern, pattern)?, false),
        };

        let raw_segments = split_path(url.path());
        if let Some(position) = raw_segments.iter().position(|s| *s == REST_WILDCARD) {
            if position != raw_segments.len() - 1 {
                return Err(RouteError::MisplacedRest {
                    url: pattern.to_string(),
                });
            }
        }

        let protocol = if any_protocol {
            Criterion::Any
        } else {
            Criterion::Exact(protocol_of(&url))
        };

        Ok(Self {
            pattern: pattern.to_string(),
            method: Criterion::parse(&method.to_uppercase()),
            protocol,
            hostname: Criterion::parse(url.host_str().unwrap_or_default()),
            segments: raw_segments.into_iter().map(Segment::parse).collect(),
            handler,
        })
    }

    /// The URL string this route was registered with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn method(&self) -> &Criterion {
        &self.method
    }

    pub fn protocol(&self) -> &Criterion {
        &self.protocol
    }

    pub fn hostname(&self) -> &Criterion {
        &self.hostname
    }

    /// Path segments; never empty.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// The match-relevant view of an incoming request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    method: String,
    protocol: String,
    hostname: String,
    segments: Vec<String>,
}

impl RequestTarget {
    /// Parse a request method and full URL.
    pub fn parse(method: &str, url: &str) -> Result<Self, RouteError> {
        let parsed = Url::parse(url).map_err(|e| RouteError::malformed(url, e))?;
        Ok(Self::from_url(method, &parsed))
    }

    /// Build a target from an already parsed URL.
    pub fn from_url(method: &str, url: &Url) -> Self {
        Self {
            method: method.to_uppercase(),
            protocol: protocol_of(url),
            hostname: url.host_str().unwrap_or_default().to_string(),
            segments: split_path(url.path())
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Path segments; never empty.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

fn parse_absolute(original: &str, input: &str) -> Result<Url, RouteError> {
    let url = Url::parse(input).map_err(|e| RouteError::malformed(original, e))?;
    if url.host_str().is_none() {
        return Err(RouteError::malformed(original, "missing host"));
    }
    Ok(url)
}

fn protocol_of(url: &Url) -> String {
    format!("{}:", url.scheme())
}

/// Strip the leading slash and split. An empty path yields `[""]`.
fn split_path(path: &str) -> Vec<&str> {
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}
