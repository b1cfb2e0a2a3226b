//! Router behaviour over whole route tables.

use fetch_router::routing::{RequestTarget, RouteError, Router};

fn target(method: &str, url: &str) -> RequestTarget {
    RequestTarget::parse(method, url).unwrap()
}

fn matched<'a>(router: &'a Router<&'static str>, method: &str, url: &str) -> Option<&'a str> {
    router.route(&target(method, url)).map(|route| *route.handler())
}

#[test]
fn scenario_exact_route() {
    let mut router = Router::new();
    router.get("http://example.com/a/b", "ab").unwrap();

    assert_eq!(matched(&router, "GET", "http://example.com/a/b"), Some("ab"));
    assert_eq!(matched(&router, "GET", "http://example.com/a/b/c"), None);
    assert_eq!(matched(&router, "POST", "http://example.com/a/b"), None);
}

#[test]
fn scenario_any_method_with_suffix_wildcard() {
    let mut router = Router::new();
    router.any("scheme://host/ipfs/**", "ipfs").unwrap();

    assert_eq!(
        matched(&router, "PUT", "scheme://host/ipfs/cid/more/segments"),
        Some("ipfs")
    );
    assert_eq!(matched(&router, "DELETE", "scheme://host/ipfs/cid"), Some("ipfs"));
    assert_eq!(matched(&router, "GET", "scheme://host/ipns/cid"), None);
    assert_eq!(matched(&router, "GET", "scheme://other/ipfs/cid"), None);
}

#[test]
fn scenario_hostname_wildcard_keeps_protocol() {
    let mut router = Router::new();
    router.get("http://*/x", "x").unwrap();

    assert_eq!(matched(&router, "GET", "http://a.example/x"), Some("x"));
    assert_eq!(matched(&router, "GET", "http://b.example/x"), Some("x"));
    assert_eq!(matched(&router, "GET", "https://a.example/x"), None);
}

#[test]
fn scenario_catch_all_registered_last() {
    let mut router = Router::new();
    router
        .get("http://one.example/page", "one")
        .unwrap()
        .get("http://two.example/page", "two")
        .unwrap()
        .get("http://*/page", "catch-all")
        .unwrap();

    assert_eq!(matched(&router, "GET", "http://three.example/page"), Some("catch-all"));
    assert_eq!(matched(&router, "GET", "http://one.example/page"), Some("one"));
    assert_eq!(matched(&router, "GET", "http://two.example/page"), Some("two"));
}

#[test]
fn earliest_registration_wins() {
    let mut router = Router::new();
    router.any("http://example.com/*", "first").unwrap();
    router.get("http://example.com/a", "second").unwrap();
    router.get("http://example.com/**", "third").unwrap();

    assert_eq!(matched(&router, "GET", "http://example.com/a"), Some("first"));
    assert_eq!(matched(&router, "GET", "http://example.com/a/b"), Some("third"));
}

#[test]
fn single_wildcard_matches_any_segment_value() {
    let mut router = Router::new();
    router.get("http://example.com/users/*/profile", "profile").unwrap();

    for id in ["1", "alice", "%20", ""] {
        let url = format!("http://example.com/users/{id}/profile");
        assert_eq!(matched(&router, "GET", &url), Some("profile"), "id {id:?}");
    }
}

#[test]
fn suffix_wildcard_absorbs_any_tail() {
    let mut router = Router::new();
    router.get("http://example.com/static/*/**", "static").unwrap();

    let mut url = String::from("http://example.com/static/v1");
    for depth in 0..6 {
        url.push_str(&format!("/part{depth}"));
        assert_eq!(matched(&router, "GET", &url), Some("static"), "{url}");
    }
    assert_eq!(matched(&router, "GET", "http://example.com/static/v1/"), Some("static"));
    assert_eq!(matched(&router, "GET", "http://example.com/static/v1"), None);
}

#[test]
fn arity_must_match_without_suffix_wildcard() {
    let mut router = Router::new();
    router.get("http://example.com/*/*/*", "three").unwrap();

    assert_eq!(matched(&router, "GET", "http://example.com/a/b/c"), Some("three"));
    assert_eq!(matched(&router, "GET", "http://example.com/a/b"), None);
    assert_eq!(matched(&router, "GET", "http://example.com/a/b/c/d"), None);
}

#[test]
fn method_case_is_ignored() {
    let mut router = Router::new();
    router.add("get", "http://example.com/", "lower").unwrap();
    router.add("POST", "http://example.com/", "upper").unwrap();

    assert_eq!(matched(&router, "GET", "http://example.com/"), Some("lower"));
    assert_eq!(matched(&router, "post", "http://example.com/"), Some("upper"));
    assert_eq!(matched(&router, "Post", "http://example.com/"), Some("upper"));
}

#[test]
fn protocol_wildcard() {
    let mut router = Router::new();
    router.get("*://example.com/x", "any-protocol").unwrap();

    assert_eq!(matched(&router, "GET", "http://example.com/x"), Some("any-protocol"));
    assert_eq!(matched(&router, "GET", "https://example.com/x"), Some("any-protocol"));
    assert_eq!(matched(&router, "GET", "http://other.com/x"), None);
}

#[test]
fn empty_table_never_matches() {
    let router: Router<&'static str> = Router::new();
    assert_eq!(matched(&router, "GET", "http://example.com/"), None);
}

#[test]
fn registration_errors() {
    let mut router: Router<&'static str> = Router::new();
    assert!(matches!(
        router.get("example.com/no-scheme", "x"),
        Err(RouteError::MalformedUrl { .. })
    ));
    assert!(matches!(
        router.get("http://example.com/**/tail", "x"),
        Err(RouteError::MisplacedRest { .. })
    ));
    assert!(router.is_empty());
}
