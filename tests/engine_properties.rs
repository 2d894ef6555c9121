//! Engine-level properties checked against in-memory backends.

mod common;

use linkforge::domain::click_event::ClickEvent;
use linkforge::domain::errors::LinkError;
use linkforge::domain::repositories::{ClickStore, LinkStore};
use linkforge::infrastructure::cache::LinkCache;
use std::sync::Arc;

#[tokio::test]
async fn test_create_then_resolve_returns_same_url() {
    let app = common::create_test_app();
    let service = &app.state.link_service;

    for url in [
        "https://example.com/a",
        "http://example.com:8080/path?q=1#frag",
        "https://sub.domain.example.org/very/long/path/segment",
    ] {
        let link = service.create_link(url, None).await.unwrap();
        let resolved = service.resolve_link(&link.code).await.unwrap().unwrap();
        assert_eq!(resolved.original_url, url);
    }
}

#[tokio::test]
async fn test_create_is_idempotent_by_url() {
    let app = common::create_test_app();
    let service = &app.state.link_service;

    let first = service.create_link("https://example.com/a", None).await.unwrap();
    let second = service.create_link("https://example.com/a", None).await.unwrap();

    assert_eq!(first.code, second.code);
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_taken_custom_code_leaves_existing_row_untouched() {
    let app = common::create_test_app();
    let service = &app.state.link_service;

    service
        .create_link("https://example.com/first", Some("promo"))
        .await
        .unwrap();

    let err = service
        .create_link("https://example.com/second", Some("promo"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkError::CodeTaken(_)));

    let stored = app.store.find_by_code("promo").await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://example.com/first");
    assert!(stored.is_custom);
}

#[tokio::test]
async fn test_concurrent_custom_code_race_has_one_winner() {
    let app = common::create_test_app();
    let service = app.state.link_service.clone();

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_link(&format!("https://example.com/{i}"), Some("race"))
                .await
        }));
    }

    let mut won = 0;
    let mut taken = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(LinkError::CodeTaken(_)) => taken += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(won, 1);
    assert_eq!(taken, 7);
}

#[tokio::test]
async fn test_concurrent_clicks_are_all_logged() {
    let app = common::create_test_app();
    let link = app
        .state
        .link_service
        .create_link("https://example.com/hot", None)
        .await
        .unwrap();

    const N: usize = 50;
    let mut handles = Vec::new();
    for _ in 0..N {
        let analytics = Arc::clone(&app.analytics);
        let event = ClickEvent::new(link.id, link.code.clone(), None, Some("load"), None);
        handles.push(tokio::spawn(async move { analytics.record_click(&event).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let clicks = app.store.find_clicks_by_link_id(link.id).await.unwrap();
    assert_eq!(clicks.len(), N);
}

#[tokio::test]
async fn test_store_miss_fills_cache_for_next_resolve() {
    let app = common::create_test_app();
    let link = app
        .state
        .link_service
        .create_link("https://example.com/cached", None)
        .await
        .unwrap();

    app.cache.invalidate(&link.code).await.unwrap();
    assert!(app.cache.get_link(&link.code).await.unwrap().is_none());

    let first = app
        .state
        .link_service
        .resolve_link(&link.code)
        .await
        .unwrap()
        .unwrap();
    let cached = app.cache.get_link(&link.code).await.unwrap().unwrap();

    assert_eq!(cached.original_url, first.original_url);

    // With the store gone, the cache alone answers.
    app.store.set_unavailable(true);
    let second = app
        .state
        .link_service
        .resolve_link(&link.code)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.original_url, "https://example.com/cached");
}

#[tokio::test]
async fn test_scenario_click_count_after_record() {
    let app = common::create_test_app();
    let service = &app.state.link_service;

    let link = service.create_link("https://example.com/a", None).await.unwrap();
    assert_eq!(link.code.len(), 6);

    let resolved = service.resolve_link(&link.code).await.unwrap().unwrap();
    assert_eq!(resolved.original_url, "https://example.com/a");
    assert_eq!(resolved.click_count, 0);

    let event = ClickEvent::new(link.id, link.code.clone(), None, Some("agent"), None);
    app.analytics.record_click(&event).await.unwrap();

    let resolved = service.resolve_link(&link.code).await.unwrap().unwrap();
    assert_eq!(resolved.click_count, 1);
}

#[tokio::test]
async fn test_scenario_custom_code_twice() {
    let app = common::create_test_app();
    let service = &app.state.link_service;

    service
        .create_link("https://example.com/x", Some("promo"))
        .await
        .unwrap();
    let err = service
        .create_link("https://example.com/y", Some("promo"))
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::CodeTaken(code) if code == "promo"));
}

#[tokio::test]
async fn test_cache_warm_up_loads_recent_links() {
    let app = common::create_test_app();
    let service = &app.state.link_service;

    for i in 0..5 {
        let link = service
            .create_link(&format!("https://example.com/{i}"), None)
            .await
            .unwrap();
        app.cache.invalidate(&link.code).await.unwrap();
    }
    assert!(app.cache.is_empty().await);

    let warmed = service.warm_cache(3).await.unwrap();

    assert_eq!(warmed, 3);
    assert_eq!(app.cache.len().await, 3);
}

#[tokio::test]
async fn test_store_failure_during_create_is_fatal() {
    let app = common::create_test_app();
    app.store.set_unavailable(true);

    let err = app
        .state
        .link_service
        .create_link("https://example.com", None)
        .await
        .unwrap_err();

    assert!(matches!(err, LinkError::Store(_)));
    assert!(app.cache.is_empty().await);
}

#[tokio::test]
async fn test_click_insert_for_unknown_link_fails() {
    let app = common::create_test_app();
    let event = ClickEvent::new(999, "ghost".to_string(), None, None, None);

    assert!(app.analytics.record_click(&event).await.is_err());
    assert_eq!(app.store.click_rows().await, 0);
}
