//! Detached click recording.
//!
//! Redirect handlers push a [`ClickEvent`] into a bounded [`ClickQueue`] and
//! reply immediately. [`run_click_worker`] drains the queue in the background,
//! recording each click with its own timeout so a client that disconnects
//! never aborts analytics.
//!
//! When the queue is full the newest event is rejected and logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};

use crate::application::services::AnalyticsService;
use crate::domain::click_event::ClickEvent;

/// Sending half of the click queue, cheap to clone.
#[derive(Clone)]
pub struct ClickQueue {
    tx: mpsc::Sender<ClickEvent>,
    dropped: Arc<AtomicU64>,
}

impl ClickQueue {
    /// Creates a queue holding at most `capacity` pending events.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let queue = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (queue, rx)
    }

    /// Enqueues an event without waiting.
    ///
    /// Returns `false` if the event was dropped because the queue is full or
    /// the worker has stopped.
    pub fn submit(&self, event: ClickEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.record_drop();
                tracing::warn!(
                    link_id = event.link_id,
                    code = %event.code,
                    capacity = self.max_capacity(),
                    "Click queue full, dropping event"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.record_drop();
                tracing::error!(
                    link_id = event.link_id,
                    code = %event.code,
                    "Click worker stopped, dropping event"
                );
                false
            }
        }
    }

    /// Number of events dropped since start.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Free slots left in the queue.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Whether the worker side has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn record_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("clicks_dropped_total").increment(1);
    }
}

/// Drains `rx`, recording up to `concurrency` clicks at a time.
///
/// Each recording is bounded by `task_timeout`. Returns once every sender has
/// been dropped and all in-flight recordings have finished.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    analytics: Arc<AnalyticsService>,
    concurrency: usize,
    task_timeout: Duration,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    tracing::info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        // Reap finished tasks so the set does not grow without bound.
        while let Some(result) = tasks.try_join_next() {
            log_task_panic(result);
        }

        let analytics = analytics.clone();
        tasks.spawn(async move {
            let _permit = permit;
            match tokio::time::timeout(task_timeout, analytics.record_click(&event)).await {
                Ok(Ok(())) => {
                    metrics::counter!("clicks_recorded_total").increment(1);
                }
                Ok(Err(_)) => {
                    // Already logged by the recorder.
                    metrics::counter!("clicks_failed_total").increment(1);
                }
                Err(_) => {
                    metrics::counter!("clicks_failed_total").increment(1);
                    tracing::error!(
                        link_id = event.link_id,
                        code = %event.code,
                        timeout_ms = task_timeout.as_millis() as u64,
                        "Click recording timed out"
                    );
                }
            }
        });
    }

    let in_flight = tasks.len();
    while let Some(result) = tasks.join_next().await {
        log_task_panic(result);
    }

    tracing::info!(in_flight, "Click worker stopped");
}

fn log_task_panic(result: Result<(), JoinError>) {
    if let Err(e) = result {
        metrics::counter!("clicks_failed_total").increment(1);
        tracing::error!(error = %e, "Click task panicked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::LinkStore;
    use crate::domain::entities::NewLink;
    use crate::domain::entities::Link;
    use crate::infrastructure::cache::{CacheResult, LinkCache, NullCache};
    use crate::infrastructure::persistence::MemoryStore;
    use async_trait::async_trait;

    /// Panics when asked to invalidate `poisoned`.
    struct PanickingCache {
        poisoned: &'static str,
    }

    #[async_trait]
    impl LinkCache for PanickingCache {
        async fn get_link(&self, _code: &str) -> CacheResult<Option<Link>> {
            Ok(None)
        }

        async fn set_link(&self, _link: &Link, _ttl: Duration) -> CacheResult<()> {
            Ok(())
        }

        async fn invalidate(&self, code: &str) -> CacheResult<()> {
            if code == self.poisoned {
                panic!("invalidate failed for {code}");
            }
            Ok(())
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn backend_name(&self) -> &'static str {
            "panicking"
        }
    }

    fn event(link_id: i64) -> ClickEvent {
        ClickEvent::new(link_id, "abc123".to_string(), None, Some("test"), None)
    }

    #[test]
    fn test_submit_drops_newest_when_full() {
        let (queue, mut rx) = ClickQueue::new(2);

        assert!(queue.submit(event(1)));
        assert!(queue.submit(event(2)));
        assert!(!queue.submit(event(3)));

        assert_eq!(queue.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().link_id, 1);
        assert_eq!(rx.try_recv().unwrap().link_id, 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_submit_after_worker_gone() {
        let (queue, rx) = ClickQueue::new(4);
        drop(rx);

        assert!(queue.is_closed());
        assert!(!queue.submit(event(1)));
        assert_eq!(queue.dropped(), 1);
    }

    #[tokio::test]
    async fn test_worker_drains_queue_on_close() {
        let store = Arc::new(MemoryStore::new());
        let link = store
            .insert(NewLink {
                code: "abc123".to_string(),
                original_url: "https://example.com".to_string(),
                is_custom: false,
            })
            .await
            .unwrap();

        let analytics = Arc::new(AnalyticsService::new(
            store.clone(),
            store.clone(),
            Arc::new(NullCache),
        ));

        let (queue, rx) = ClickQueue::new(100);
        for _ in 0..25 {
            assert!(queue.submit(event(link.id)));
        }
        drop(queue);

        run_click_worker(rx, analytics, 4, Duration::from_secs(5)).await;

        assert_eq!(store.click_rows().await, 25);
        let link = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(link.click_count, 25);
    }

    #[tokio::test]
    async fn test_worker_keeps_running_after_task_panics() {
        let store = Arc::new(MemoryStore::new());
        let link = store
            .insert(NewLink {
                code: "abc123".to_string(),
                original_url: "https://example.com".to_string(),
                is_custom: false,
            })
            .await
            .unwrap();

        let analytics = Arc::new(AnalyticsService::new(
            store.clone(),
            store.clone(),
            Arc::new(PanickingCache { poisoned: "boom" }),
        ));

        let (queue, rx) = ClickQueue::new(100);
        for i in 0..10 {
            let code = if i % 2 == 0 { "boom" } else { "abc123" };
            let event = ClickEvent::new(link.id, code.to_string(), None, Some("test"), None);
            assert!(queue.submit(event));
        }
        drop(queue);

        run_click_worker(rx, analytics, 1, Duration::from_secs(5)).await;

        assert_eq!(store.click_rows().await, 10);
    }
}
