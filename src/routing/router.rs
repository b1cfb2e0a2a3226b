//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Look up the first route matching a request
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Append-only; no removal or update
//! - Immutable once shared (thread-safe without locks)
//! - O(n) scan in registration order (acceptable for typical route counts)
//! - Explicit `None` rather than a silent default

use crate::routing::matcher::route_matches;
use crate::routing::route::{Route, RouteError, RequestTarget, WILDCARD};

/// Ordered route table with first-match-wins lookup.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: Vec<Route<H>>,
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Register a route for `method` (or `*`) on `url`.
    ///
    /// Returns the router so registrations can be chained with `?`.
    pub fn add(&mut self, method: &str, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        let route = Route::new(method, url, handler)?;
        tracing::debug!(method = %method, pattern = %url, index = self.routes.len(), "Route registered");
        self.routes.push(route);
        Ok(self)
    }

    pub fn get(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add("GET", url, handler)
    }

    pub fn head(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add("HEAD", url, handler)
    }

    pub fn post(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add("POST", url, handler)
    }

    pub fn put(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add("PUT", url, handler)
    }

    pub fn delete(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add("DELETE", url, handler)
    }

    pub fn patch(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add("PATCH", url, handler)
    }

    /// Register a route matching every method.
    pub fn any(&mut self, url: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.add(WILDCARD, url, handler)
    }

    /// Find the earliest registered route matching `target`.
    pub fn route(&self, target: &RequestTarget) -> Option<&Route<H>> {
        self.routes.iter().find(|route| route_matches(route, target))
    }

    /// Registered routes in priority order.
    pub fn routes(&self) -> &[Route<H>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(method: &str, url: &str) -> RequestTarget {
        RequestTarget::parse(method, url).unwrap()
    }

    #[test]
    fn test_chained_registration() {
        let mut router = Router::new();
        router
            .get("http://example.com/", 1)
            .unwrap()
            .head("http://example.com/", 2)
            .unwrap()
            .post("http://example.com/", 3)
            .unwrap()
            .put("http://example.com/", 4)
            .unwrap()
            .delete("http://example.com/", 5)
            .unwrap()
            .patch("http://example.com/", 6)
            .unwrap()
            .any("http://example.com/", 7)
            .unwrap();

        assert_eq!(router.len(), 7);
        for (method, expected) in [
            ("GET", 1),
            ("HEAD", 2),
            ("POST", 3),
            ("PUT", 4),
            ("DELETE", 5),
            ("PATCH", 6),
            ("OPTIONS", 7),
        ] {
            let route = router.route(&target(method, "http://example.com/")).unwrap();
            assert_eq!(*route.handler(), expected, "method {method}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut router = Router::new();
        router.any("http://example.com/**", "catch-all").unwrap();
        router.get("http://example.com/a", "specific").unwrap();

        let route = router.route(&target("GET", "http://example.com/a")).unwrap();
        assert_eq!(*route.handler(), "catch-all");
    }

    #[test]
    fn test_no_match() {
        let mut router = Router::new();
        router.get("http://example.com/a", ()).unwrap();
        assert!(router.route(&target("GET", "http://example.com/b")).is_none());
        assert!(Router::<()>::new().route(&target("GET", "http://example.com/")).is_none());
    }

    #[test]
    fn test_failed_registration_leaves_table_intact() {
        let mut router = Router::new();
        router.get("http://example.com/a", ()).unwrap();
        assert!(router.get("not a url", ()).is_err());
        assert!(router.get("http://example.com/**/x", ()).is_err());
        assert_eq!(router.len(), 1);
    }
}
