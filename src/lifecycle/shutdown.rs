//! Shutdown coordination.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use crate::observability::metrics;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// How the drain window was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Cleanup finished before the deadline.
    Completed,
    /// The deadline fired first; cleanup was left running.
    DeadlineElapsed,
}

impl DrainOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrainOutcome::Completed => "completed",
            DrainOutcome::DeadlineElapsed => "deadline",
        }
    }
}

/// Run `cleanup` on its own task and race it against `deadline`.
///
/// Whichever finishes first decides the outcome. A cleanup that loses the
/// race is neither cancelled nor retried.
pub async fn drain<F>(cleanup: F, deadline: Duration) -> DrainOutcome
where
    F: Future<Output = ()> + Send + 'static,
{
    let started = Instant::now();
    let task = tokio::spawn(cleanup);

    let outcome = match tokio::time::timeout(deadline, task).await {
        Ok(Ok(())) => {
            tracing::info!("Normal shutdown: cleanup operations done");
            DrainOutcome::Completed
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Cleanup task failed");
            DrainOutcome::Completed
        }
        Err(_) => {
            tracing::warn!(
                deadline_secs = deadline.as_secs_f64(),
                "Drain deadline elapsed, abandoning cleanup"
            );
            DrainOutcome::DeadlineElapsed
        }
    };

    metrics::record_drain(outcome.as_str(), started.elapsed());
    outcome
}
