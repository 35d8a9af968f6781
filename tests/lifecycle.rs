//! Startup and shutdown behaviour of the lifecycle controller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use product_api::config::ApiConfig;
use product_api::lifecycle::{DrainOutcome, Phase, Server, StartupError};
use product_api::models::{Product, User};
use product_api::security::SigningSecret;
use product_api::store::{DataStore, MemoryStore, StoreError};
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::time::Instant;

mod common;

/// Wraps a memory store and stalls `close` for a fixed time.
struct SlowClose {
    inner: MemoryStore,
    delay: Duration,
}

#[async_trait]
impl DataStore for SlowClose {
    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
    async fn find_user(&self, username: &str, digest: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user(username, digest).await
    }
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.inner.list_products().await
    }
    async fn get_product(&self, id: u64) -> Result<Product, StoreError> {
        self.inner.get_product(id).await
    }
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError> {
        self.inner.insert_product(product).await
    }
    async fn update_product(&self, id: u64, product: Product) -> Result<Product, StoreError> {
        self.inner.update_product(id, product).await
    }
    async fn close(&self) {
        tokio::time::sleep(self.delay).await;
        self.inner.close().await;
    }
}

async fn run_with_close_delay(delay: Duration, deadline_secs: u64) -> (DrainOutcome, Duration) {
    let mut config = common::test_config();
    config.lifecycle.drain_deadline_secs = deadline_secs;
    config.lifecycle.server_grace_secs = 1;

    let store = Arc::new(SlowClose {
        inner: MemoryStore::new(),
        delay,
    });
    let server = Server::initialize(config, store, SigningSecret::generate())
        .await
        .unwrap();
    let mut phase = server.phase();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    let run = tokio::spawn(server.run(listener, async move {
        let _ = rx.await;
    }));
    phase.wait_for(|p| *p == Phase::Running).await.unwrap();

    let signalled = Instant::now();
    tx.send(()).unwrap();
    let outcome = run.await.unwrap().unwrap();
    (outcome, signalled.elapsed())
}

#[tokio::test]
async fn test_quick_cleanup_takes_completion_path() {
    let (outcome, elapsed) = run_with_close_delay(Duration::from_millis(50), 10).await;
    assert_eq!(outcome, DrainOutcome::Completed);
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_stalled_cleanup_takes_deadline_path() {
    let (outcome, elapsed) = run_with_close_delay(Duration::from_secs(30), 1).await;
    assert_eq!(outcome, DrainOutcome::DeadlineElapsed);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(10), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_unreachable_store_aborts_startup() {
    let store = Arc::new(MemoryStore::new());
    store.close().await;

    let result = Server::initialize(ApiConfig::default(), store, SigningSecret::generate()).await;
    assert!(matches!(result, Err(StartupError::Store(StoreError::Closed))));
}

#[tokio::test]
async fn test_health_reports_running_then_listener_stops() {
    let server = common::start_server(common::test_config()).await;
    let client = common::client();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let url = server.url("/health");
    let phase = server.phase.clone();
    assert_eq!(server.stop().await, DrainOutcome::Completed);
    assert_eq!(*phase.borrow(), Phase::Stopped);

    assert!(client.get(url).send().await.is_err());
}

#[tokio::test]
async fn test_closed_store_is_per_request_failure() {
    let server = common::start_server(common::test_config()).await;
    let token = server
        .codec
        .issue("andrea", "admin", Duration::from_secs(300))
        .unwrap();

    // Simulate a request racing the end of the drain window.
    server.store.close().await;
    let res = common::client()
        .get(server.url("/products"))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    server.stop().await;
}
