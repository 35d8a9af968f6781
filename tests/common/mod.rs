//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use product_api::config::{ApiConfig, UserSeed};
use product_api::lifecycle::{DrainOutcome, Phase, Server};
use product_api::models::user::password_digest;
use product_api::security::{SigningSecret, TokenCodec};
use product_api::store::MemoryStore;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

pub const USERNAME: &str = "andrea";
pub const PASSWORD: &str = "s3cret";

/// A server running on an ephemeral port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub codec: Arc<TokenCodec>,
    pub store: Arc<MemoryStore>,
    pub phase: watch::Receiver<Phase>,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<DrainOutcome>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Deliver the shutdown signal and wait for the lifecycle to finish.
    pub async fn stop(mut self) -> DrainOutcome {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.handle.await.unwrap().unwrap()
    }
}

pub fn test_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.lifecycle.settle_ms = 20;
    config.observability.metrics_enabled = false;
    config.store.users.push(UserSeed {
        username: USERNAME.into(),
        password_sha256: password_digest(PASSWORD),
        role: "admin".into(),
    });
    config
}

/// Start a server and wait until it reports Running.
pub async fn start_server(config: ApiConfig) -> TestServer {
    let store = Arc::new(MemoryStore::with_users(&config.store.users));
    let server = Server::initialize(config, store.clone(), SigningSecret::generate())
        .await
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let codec = server.codec();
    let mut phase = server.phase();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run(listener, async move {
        let _ = stop_rx.await;
    }));

    tokio::time::timeout(Duration::from_secs(5), phase.wait_for(|p| *p == Phase::Running))
        .await
        .expect("server did not reach Running")
        .unwrap();

    TestServer {
        addr,
        codec,
        store,
        phase,
        stop: Some(stop_tx),
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
