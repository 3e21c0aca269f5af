//! Redirect chains driven through the full client.

mod helpers;

use std::sync::Arc;

use helpers::*;
use wttp_fetch::{ClientConfig, FetchError, Method, RedirectPolicy, RequestInit, Response};

#[tokio::test]
async fn test_relative_redirect_chain() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/path/to/page.html", 301, "./resource.html")
            .with_redirect(HOST_A, "/path/to/resource.html", 302, "../moved/final.html")
            .with_resource(HOST_A, "/path/moved/final.html", html_page(4), b"done"),
    );
    let response = client(adapter.clone())
        .fetch(&format!("wttp://{HOST_A}/path/to/page.html"), RequestInit::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert!(response.redirected);
    assert_eq!(response.url, format!("wttp://{HOST_A}/path/moved/final.html"));
    assert_eq!(response.text().as_deref(), Some("done"));

    let paths: Vec<String> = adapter
        .requests()
        .into_iter()
        .map(|c| c.request.path)
        .collect();
    assert_eq!(
        paths,
        vec![
            "/path/to/page.html",
            "/path/to/resource.html",
            "/path/moved/final.html",
            "/path/moved/final.html",
        ]
    );
    // One host, one network: validated once for the whole chain
    assert_eq!(adapter.probes().len(), 2);
}

#[tokio::test]
async fn test_two_node_loop_detected() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/a", 302, "/b")
            .with_redirect(HOST_A, "/b", 302, "/a"),
    );
    let url = format!("wttp://{HOST_A}/a");
    let err = client(adapter.clone())
        .fetch(&url, RequestInit::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::TooManyRedirects { hops: 1, .. }));
    let response = Response::from_error(&err, &url).unwrap();
    assert_eq!(response.status, 508);
    assert_eq!(adapter.requests().len(), 2);
}

#[tokio::test]
async fn test_loop_through_respelled_url_detected() {
    // The second visit to /a uses checksum case and a network alias
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/a", 302, "/b")
            .with_redirect(HOST_A, "/b", 302, &format!("wttp://{HOST_A}:sep/a")),
    );
    let err = client(adapter.clone())
        .fetch(&format!("wttp://{}/a", HOST_A.to_lowercase()), RequestInit::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::TooManyRedirects { ref url, hops: 1 } if *url == format!("wttp://{HOST_A}:sep/a")
    ));
    assert_eq!(adapter.requests().len(), 2);
    assert_eq!(adapter.probes().len(), 2);
}

#[tokio::test]
async fn test_same_path_on_other_network_is_not_a_loop() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/a", 302, &format!("wttp://{HOST_A}:pol/a")),
    );
    let err = client(adapter.clone())
        .fetch(&format!("wttp://{HOST_A}/a"), RequestInit::new())
        .await
        .unwrap_err();

    // Only the second polygon /a is a revisit
    assert!(matches!(err, FetchError::TooManyRedirects { hops: 1, .. }));
    let networks: Vec<String> = adapter.requests().into_iter().map(|c| c.network).collect();
    assert_eq!(networks, vec!["sepolia", "polygon"]);
}

#[tokio::test]
async fn test_chain_longer_than_limit_fails() {
    let mut adapter = MockChainAdapter::new();
    for i in 0..5 {
        adapter = adapter.with_redirect(HOST_A, &format!("/{i}"), 307, &format!("/{}", i + 1));
    }
    let adapter = Arc::new(adapter.with_resource(HOST_A, "/5", html_page(0), b""));
    let config = ClientConfig {
        max_redirects: 3,
        ..ClientConfig::new(networks())
    };

    let err = client_with(adapter.clone(), config)
        .fetch(&format!("wttp://{HOST_A}/0"), RequestInit::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::TooManyRedirects { hops: 3, .. }));
    assert_eq!(err.status_code(), Some(508));
    assert_eq!(adapter.requests().len(), 4);
}

#[tokio::test]
async fn test_chain_within_limit_succeeds() {
    let mut adapter = MockChainAdapter::new();
    for i in 0..3 {
        adapter = adapter.with_redirect(HOST_A, &format!("/{i}"), 308, &format!("/{}", i + 1));
    }
    let adapter = Arc::new(adapter.with_resource(HOST_A, "/3", html_page(2), b"ok"));
    let config = ClientConfig {
        max_redirects: 3,
        ..ClientConfig::new(networks())
    };

    let response = client_with(adapter, config)
        .fetch(&format!("wttp://{HOST_A}/0"), RequestInit::new())
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.text().as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_see_other_turns_post_into_get() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/submit", 303, "/thanks.html")
            .with_resource(HOST_A, "/thanks.html", html_page(6), b"thanks"),
    );
    let response = client(adapter.clone())
        .fetch(
            &format!("wttp://{HOST_A}/submit"),
            RequestInit::new().with_method("POST").with_body(b"a=1".to_vec()),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.text().as_deref(), Some("thanks"));
    let methods: Vec<Method> = adapter
        .requests()
        .into_iter()
        .map(|c| c.request.method)
        .collect();
    assert_eq!(methods, vec![Method::Post, Method::Get, Method::Get]);
}

#[tokio::test]
async fn test_temporary_redirect_keeps_post() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/submit", 307, "/v2/submit")
            .with_redirect(HOST_A, "/v2/submit", 404, ""),
    );
    let response = client(adapter.clone())
        .fetch(
            &format!("wttp://{HOST_A}/submit"),
            RequestInit::new().with_method("POST").with_body(b"a=1".to_vec()),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    let requests = adapter.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].request.method, Method::Post);
    assert_eq!(requests[1].request.path, "/v2/submit");
}

#[tokio::test]
async fn test_manual_policy_returns_redirect() {
    let adapter = Arc::new(MockChainAdapter::new().with_redirect(HOST_A, "/old/a", 301, "b"));
    let response = client(adapter.clone())
        .fetch(
            &format!("wttp://{HOST_A}/old/a"),
            RequestInit::new().with_redirect(RedirectPolicy::Manual),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 301);
    assert_eq!(
        response.header("location"),
        Some(format!("wttp://{HOST_A}/old/b").as_str())
    );
    assert!(!response.redirected);
    assert_eq!(adapter.requests().len(), 1);
}

#[tokio::test]
async fn test_error_policy_raises() {
    let adapter = Arc::new(MockChainAdapter::new().with_redirect(HOST_A, "/old", 308, "/new"));
    let url = format!("wttp://{HOST_A}/old");
    let err = client(adapter)
        .fetch(&url, RequestInit::new().with_redirect(RedirectPolicy::Error))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::RedirectPolicy { status: 308, .. }));
    assert!(Response::from_error(&err, &url).is_none());
}

#[tokio::test]
async fn test_multiple_choices_follows_default_resource() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/docs/", 300, "")
            .with_resource(HOST_A, "/docs/index.html", html_page(5), b"index"),
    );
    let response = client(adapter)
        .fetch(&format!("wttp://{HOST_A}/docs/"), RequestInit::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.url, format!("wttp://{HOST_A}/docs/index.html"));
    assert_eq!(response.text().as_deref(), Some("index"));
}

#[tokio::test]
async fn test_cross_host_redirect_validates_new_host() {
    let adapter = Arc::new(
        MockChainAdapter::new()
            .with_redirect(HOST_A, "/", 302, &format!("wttp://{HOST_B}:pol/home.html"))
            .with_resource(HOST_B, "/home.html", html_page(4), b"home"),
    );
    let response = client(adapter.clone())
        .fetch(&format!("wttp://{HOST_A}/"), RequestInit::new())
        .await
        .unwrap();

    assert_eq!(response.text().as_deref(), Some("home"));
    assert_eq!(response.url, format!("wttp://{HOST_B}:pol/home.html"));

    let probes = adapter.probes();
    assert_eq!(probes.len(), 4);
    assert_eq!(probes[0].network, "sepolia");
    assert_eq!(probes[2].network, "polygon");
    assert_eq!(probes[2].route.host(), addr(HOST_B));

    let last = adapter.requests().pop().unwrap();
    assert_eq!(last.network, "polygon");
    assert_eq!(
        last.route,
        wttp_fetch::Route::Gateway {
            gateway: addr(GATEWAY_POLYGON),
            host: addr(HOST_B)
        }
    );
}

#[tokio::test]
async fn test_redirect_without_location_returned_as_is() {
    let adapter = Arc::new(MockChainAdapter::new().with_redirect(HOST_A, "/x", 302, ""));
    let response = client(adapter)
        .fetch(&format!("wttp://{HOST_A}/x"), RequestInit::new())
        .await
        .unwrap();
    assert_eq!(response.status, 302);
    assert!(response.header("location").is_none());
}
