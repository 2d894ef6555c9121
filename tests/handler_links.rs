mod common;

use serde_json::{Value, json};

async fn seed(server: &axum_test::TestServer) {
    for (url, code) in [
        ("https://example.com/alpha", "Alpha1"),
        ("https://example.com/beta", "beta22"),
        ("https://other.org/gamma", "gamma3"),
    ] {
        server
            .post("/shorten")
            .json(&json!({ "original_url": url, "custom_short": code }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_links_newest_first() {
    let app = common::create_test_app();
    let server = app.server();
    seed(&server).await;

    let body: Value = server.get("/links").await.json();

    assert_eq!(body["total"], 3);
    assert_eq!(body["items"][0]["code"], "gamma3");
    assert_eq!(body["items"][2]["code"], "Alpha1");
}

#[tokio::test]
async fn test_links_limit() {
    let app = common::create_test_app();
    let server = app.server();
    seed(&server).await;

    let body: Value = server.get("/links").add_query_param("limit", 2).await.json();

    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_links_limit_out_of_range() {
    let app = common::create_test_app();
    let server = app.server();

    server
        .get("/links")
        .add_query_param("limit", 0)
        .await
        .assert_status_bad_request();
    server
        .get("/links")
        .add_query_param("limit", 101)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_search_by_code_ignores_case() {
    let app = common::create_test_app();
    let server = app.server();
    seed(&server).await;

    let body: Value = server
        .get("/links/search")
        .add_query_param("code", "ALPHA")
        .await
        .json();

    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["code"], "Alpha1");
}

#[tokio::test]
async fn test_search_by_url() {
    let app = common::create_test_app();
    let server = app.server();
    seed(&server).await;

    let body: Value = server
        .get("/links/search")
        .add_query_param("url", "example.com")
        .await
        .json();

    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = common::create_test_app();
    let server = app.server();
    seed(&server).await;

    let body: Value = server
        .get("/links/search")
        .add_query_param("url", "%")
        .await
        .json();

    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_search_requires_exactly_one_field() {
    let app = common::create_test_app();
    let server = app.server();

    server.get("/links/search").await.assert_status_bad_request();
    server
        .get("/links/search")
        .add_query_param("code", "a")
        .add_query_param("url", "b")
        .await
        .assert_status_bad_request();
}
