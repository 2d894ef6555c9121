#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use linkforge::api;
use linkforge::application::click_worker::ClickQueue;
use linkforge::application::services::{AnalyticsService, EngineOptions, LinkService, StatsService};
use linkforge::domain::click_event::ClickEvent;
use linkforge::infrastructure::cache::MemoryCache;
use linkforge::infrastructure::persistence::MemoryStore;
use linkforge::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

/// Services wired to in-memory backends, with handles to inspect them.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub analytics: Arc<AnalyticsService>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_queue(100)
}

pub fn create_test_app_with_queue(capacity: usize) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(MemoryCache::default());

    let link_service = Arc::new(LinkService::new(
        store.clone(),
        cache.clone(),
        EngineOptions::default(),
    ));
    let stats_service = Arc::new(StatsService::new(store.clone(), store.clone()));
    let analytics = Arc::new(AnalyticsService::new(
        store.clone(),
        store.clone(),
        cache.clone(),
    ));

    let (click_queue, click_rx) = ClickQueue::new(capacity);
    let state = AppState::new(link_service, stats_service, click_queue, BASE_URL);

    TestApp {
        state,
        store,
        cache,
        analytics,
        click_rx,
    }
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        let app = Router::new()
            .merge(api::routes::routes())
            .layer(MockConnectInfoLayer)
            .with_state(self.state.clone());

        TestServer::new(app).unwrap()
    }

    /// Records every queued click synchronously.
    pub async fn drain_clicks(&mut self) -> usize {
        let mut recorded = 0;
        while let Ok(event) = self.click_rx.try_recv() {
            self.analytics.record_click(&event).await.unwrap();
            recorded += 1;
        }
        recorded
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
