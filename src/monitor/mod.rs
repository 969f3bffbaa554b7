//! Monitoring controller -- run/stop lifecycle and process-wide status.
//!
//! The controller owns the only mutable shared state in the system
//! (besides the alert store itself) and exposes it to other components as
//! read-only snapshots plus three mutating operations: `start`, `stop`,
//! `clear`. All counter mutation goes through the controller, which keeps
//! `alerts_count` equal to the store's row count at all times.

pub mod engine;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::ThreatPipeline;
use crate::source::{Platform, PostSource};
use crate::storage::{Alert, AlertStore};

/// Snapshot of the monitoring status, as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringState {
    pub is_running: bool,
    pub platforms_monitored: Vec<Platform>,
    pub alerts_count: u64,
    pub last_check: Option<DateTime<Utc>>,
}

pub(crate) struct Inner {
    state: Mutex<MonitoringState>,
    running: AtomicBool,
    store: AlertStore,
    pipeline: Arc<ThreatPipeline>,
    source: Arc<dyn PostSource>,
    interval: Duration,
    batch_size: usize,
}

impl Inner {
    /// Persist an alert and bump the counter under one state lock, so the
    /// count-equals-rows invariant holds at every observation point.
    pub(crate) fn record_alert(&self, alert: &Alert) -> Result<()> {
        let mut state = self.state.lock().expect("monitor state lock poisoned");
        self.store.insert(alert)?;
        state.alerts_count += 1;
        Ok(())
    }

    pub(crate) fn mark_checked(&self, at: DateTime<Utc>) {
        let mut state = self.state.lock().expect("monitor state lock poisoned");
        state.last_check = Some(at);
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub(crate) fn platforms(&self) -> Vec<Platform> {
        self.state
            .lock()
            .expect("monitor state lock poisoned")
            .platforms_monitored
            .clone()
    }
}

/// Owns the scan-loop lifecycle. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct MonitorController {
    inner: Arc<Inner>,
}

impl MonitorController {
    pub fn new(
        store: AlertStore,
        pipeline: Arc<ThreatPipeline>,
        source: Arc<dyn PostSource>,
        platforms: Vec<Platform>,
        interval: Duration,
        batch_size: usize,
    ) -> Result<Self> {
        // Re-derive the counter from the store so the invariant survives
        // process restarts.
        let alerts_count = store.count()?;
        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(MonitoringState {
                    is_running: false,
                    platforms_monitored: platforms,
                    alerts_count,
                    last_check: None,
                }),
                running: AtomicBool::new(false),
                store,
                pipeline,
                source,
                interval,
                batch_size,
            }),
        })
    }

    /// Begin the scan loop. Idempotent: returns `false` without side
    /// effects if monitoring is already running.
    pub fn start(&self) -> bool {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!("monitoring already running");
            return false;
        }
        {
            let mut state = self.inner.state.lock().expect("monitor state lock poisoned");
            state.is_running = true;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            engine::run_scan_loop(inner).await;
        });

        info!(interval = ?self.inner.interval, "monitoring started");
        true
    }

    /// Stop scheduling further scan cycles. Cooperative: a cycle already
    /// in flight runs to completion, so no dispatched analysis is lost.
    /// Idempotent: returns `false` if already stopped.
    pub fn stop(&self) -> bool {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            debug!("monitoring already stopped");
            return false;
        }
        let mut state = self.inner.state.lock().expect("monitor state lock poisoned");
        state.is_running = false;
        info!("monitoring stopped");
        true
    }

    /// Empty the alert store and reset the counter atomically. Valid in
    /// either lifecycle state; does not affect `is_running`.
    pub fn clear(&self) -> Result<usize> {
        let mut state = self.inner.state.lock().expect("monitor state lock poisoned");
        let removed = self.inner.store.clear()?;
        state.alerts_count = 0;
        info!(removed, "alert store cleared");
        Ok(removed)
    }

    /// Force-persist an alert (test endpoint) or record a qualifying one.
    pub fn record_alert(&self, alert: &Alert) -> Result<()> {
        self.inner.record_alert(alert)
    }

    /// Read-only snapshot of the monitoring state.
    pub fn status(&self) -> MonitoringState {
        self.inner
            .state
            .lock()
            .expect("monitor state lock poisoned")
            .clone()
    }
}
