//! Startup orchestration and the serve/drain sequence.
//!
//! # Responsibilities
//! - Check the data store is reachable before anything else
//! - Hold the signing secret for the life of the process
//! - Bind the listener and serve on a dedicated task
//! - On the shutdown signal, race cleanup against the drain deadline,
//!   then stop the listener
//!
//! # Design Decisions
//! - Fail fast: an unreachable store aborts startup, no retry loop
//! - The secret is built before the first request can arrive and never changes
//! - Listener starts last (traffic only when ready)

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::ApiConfig;
use crate::http::server::{build_router, AppState};
use crate::lifecycle::shutdown::{drain, DrainOutcome, Shutdown};
use crate::lifecycle::Phase;
use crate::security::{SigningSecret, TokenCodec};
use crate::store::{DataStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unable to connect to data store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Owns the process-wide resources and drives the lifecycle phases.
pub struct Server {
    config: ApiConfig,
    store: Arc<dyn DataStore>,
    codec: Arc<TokenCodec>,
    phase: watch::Sender<Phase>,
}

impl Server {
    /// Initializing: verify the store and take ownership of the secret.
    pub async fn initialize(
        config: ApiConfig,
        store: Arc<dyn DataStore>,
        secret: SigningSecret,
    ) -> Result<Self, StartupError> {
        Self::initialize_with_codec(config, store, Arc::new(TokenCodec::with_system_clock(secret))).await
    }

    /// Like [`Server::initialize`] with a caller-built codec.
    pub async fn initialize_with_codec(
        config: ApiConfig,
        store: Arc<dyn DataStore>,
        codec: Arc<TokenCodec>,
    ) -> Result<Self, StartupError> {
        let (phase, _) = watch::channel(Phase::Initializing);

        store.ping().await?;
        info!("Connection to the data store OK");

        Ok(Self {
            config,
            store,
            codec,
            phase,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn codec(&self) -> Arc<TokenCodec> {
        self.codec.clone()
    }

    /// Observe phase transitions.
    pub fn phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Bind the configured listener address.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        let address = self.config.listener.bind_address.clone();
        TcpListener::bind(&address)
            .await
            .map_err(|source| StartupError::Bind { address, source })
    }

    /// Serve on `listener` until `signal` resolves, then drain and stop.
    pub async fn run<F>(self, listener: TcpListener, signal: F) -> Result<DrainOutcome, std::io::Error>
    where
        F: Future<Output = ()> + Send,
    {
        let addr: SocketAddr = listener.local_addr()?;
        let lifecycle = self.config.lifecycle.clone();

        let state = AppState {
            store: self.store.clone(),
            codec: self.codec.clone(),
            auth: self.config.auth.clone(),
            phase: self.phase.subscribe(),
        };
        let router = build_router(&self.config, state);

        let shutdown = Shutdown::new();
        let mut stop = shutdown.subscribe();

        info!(address = %addr, "Starting HTTP server");
        let mut server = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = stop.recv().await;
                })
                .await
        });

        tokio::time::sleep(lifecycle.settle_delay()).await;
        self.phase.send_replace(Phase::Running);
        info!(address = %addr, "HTTP server is ready to accept connections");

        signal.await;
        self.phase.send_replace(Phase::Draining);
        info!(
            deadline_secs = lifecycle.drain_deadline_secs,
            "Draining: running cleanup"
        );

        let store = self.store.clone();
        let outcome = drain(
            async move {
                info!("Closing data store connections");
                store.close().await;
            },
            lifecycle.drain_deadline(),
        )
        .await;

        // Both drain paths converge here.
        shutdown.trigger();
        match tokio::time::timeout(lifecycle.server_grace(), &mut server).await {
            Ok(Ok(Ok(()))) => info!("HTTP server stopped"),
            Ok(Ok(Err(e))) => error!(error = %e, "HTTP server exited with error"),
            Ok(Err(e)) => error!(error = %e, "HTTP server task failed"),
            Err(_) => {
                warn!(
                    grace_secs = lifecycle.server_grace_secs,
                    "In-flight requests still running after grace period, aborting"
                );
                server.abort();
            }
        }

        self.phase.send_replace(Phase::Stopped);
        info!(outcome = outcome.as_str(), "Shutting down, bye");
        Ok(outcome)
    }
}
