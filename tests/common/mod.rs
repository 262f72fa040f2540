#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use json_relay::application::dispatcher::PublishDispatcher;
use json_relay::domain::publish_stats::PublishStats;
use json_relay::domain::publish_worker::{WorkerSettings, run_publish_workers};
use json_relay::infrastructure::broker::MemorySink;
use json_relay::routes::{RouterOptions, build_router};
use json_relay::state::AppState;

pub struct TestApp {
    pub server: TestServer,
    pub router: Router,
    pub sink: Arc<MemorySink>,
    pub stats: Arc<PublishStats>,
    pub workers: JoinHandle<()>,
}

pub fn test_worker_settings() -> WorkerSettings {
    WorkerSettings {
        concurrency: 4,
        attempt_timeout: Duration::from_secs(1),
        max_retries: 1,
        backoff_base_ms: 1,
    }
}

pub fn spawn_app(options: RouterOptions) -> TestApp {
    spawn_app_with_sink(options, MemorySink::new("hello"), 100)
}

pub fn spawn_app_with_sink(options: RouterOptions, sink: MemorySink, capacity: usize) -> TestApp {
    let sink = Arc::new(sink);
    let stats = Arc::new(PublishStats::default());
    let (dispatcher, rx) = PublishDispatcher::new(capacity, stats.clone());

    let workers = tokio::spawn(run_publish_workers(
        rx,
        sink.clone(),
        stats.clone(),
        test_worker_settings(),
    ));

    let state = AppState::new(dispatcher, sink.clone());
    let router = build_router(state, options);
    let server = TestServer::new(router.clone()).unwrap();

    TestApp {
        server,
        router,
        sink,
        stats,
        workers,
    }
}

/// Polls the sink until it holds `count` messages or two seconds pass.
pub async fn wait_for_messages(sink: &MemorySink, count: usize) -> usize {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let published = sink.published_count().await;
        if published >= count || tokio::time::Instant::now() >= deadline {
            return published;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
