//! Cancellable dashboard refresh loop.
//!
//! One task per poller. Each poll runs to completion (or until `timeout`) before the next one is
//! scheduled `interval` later, so polls never overlap. Results are published on a `watch`
//! channel; the engine underneath stays stateless, so a poller can be stopped and respawned
//! freely.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::models::{DashboardSnapshot, WeeklyReport};

/// Something that can produce a fresh weekly report on demand.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self) -> anyhow::Result<WeeklyReport>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Pause between the end of one poll and the start of the next.
    pub interval: Duration,
    /// Upper bound on a single poll; a slower poll is abandoned.
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            timeout: Duration::from_secs(30),
        }
    }
}

pub struct DashboardPoller;

impl DashboardPoller {
    /// Start polling immediately on the current tokio runtime.
    pub fn spawn<S>(source: Arc<S>, config: PollerConfig) -> PollerHandle
    where
        S: ReportSource + ?Sized + 'static,
    {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(run(source, config, cancel.clone(), tx));
        info!(interval = ?config.interval, timeout = ?config.timeout, "Dashboard poller started");
        PollerHandle {
            cancel,
            task: Some(task),
            snapshots: rx,
        }
    }
}

async fn run<S>(
    source: Arc<S>,
    config: PollerConfig,
    cancel: CancellationToken,
    tx: watch::Sender<Option<DashboardSnapshot>>,
) where
    S: ReportSource + ?Sized,
{
    loop {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = tokio::time::timeout(config.timeout, source.fetch_report()) => outcome,
        };

        match outcome {
            Ok(Ok(report)) => {
                debug!(weekly_total = report.weekly_total, "Dashboard refreshed");
                tx.send_replace(Some(DashboardSnapshot {
                    report,
                    refreshed_at: Utc::now(),
                }));
            }
            Ok(Err(e)) => warn!("Dashboard refresh failed: {:#}", e),
            Err(_) => warn!(timeout = ?config.timeout, "Dashboard refresh timed out"),
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
    info!("Dashboard poller stopped");
}

/// Owner's handle on a running poller.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    snapshots: watch::Receiver<Option<DashboardSnapshot>>,
}

impl PollerHandle {
    /// Most recent successful refresh, if any.
    pub fn latest(&self) -> Option<DashboardSnapshot> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSnapshot>> {
        self.snapshots.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the loop and wait for it to exit. An in-flight poll is dropped.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Dashboard poller task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
