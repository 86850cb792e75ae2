// src/pipeline/poll.rs

//! Periodic polling.
//!
//! [`ScheduleMonitor`] runs one fetch-parse-detect cycle. [`PollLoop`] drives
//! it on a fixed period from a single background task, so cycles never
//! overlap: a tick that comes due while a cycle is still running is skipped.
//!
//! Stopping cancels the in-flight fetch. A cycle cancelled before it reaches
//! the detector leaves the baseline untouched and emits nothing.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{ScheduleDocument, ScheduleEvent};
use crate::pipeline::detect::ChangeDetector;
use crate::services::{Fetcher, NotificationSink, ScheduleParser};

/// Result of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New schedule; an event was emitted
    Changed(ScheduleDocument),
    Unchanged,
    /// Fetch, parse or detection failed; the baseline is unchanged
    Failed(String),
    /// Stopped before the cycle could complete
    Cancelled,
}

/// Collaborators for one poll cycle.
#[derive(Clone)]
pub struct ScheduleMonitor {
    fetcher: Arc<dyn Fetcher>,
    parser: Arc<ScheduleParser>,
    detector: Arc<Mutex<Box<dyn ChangeDetector>>>,
    sink: Arc<dyn NotificationSink>,
    report_failures: bool,
}

impl ScheduleMonitor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        parser: Arc<ScheduleParser>,
        detector: Box<dyn ChangeDetector>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            detector: Arc::new(Mutex::new(detector)),
            sink,
            report_failures: false,
        }
    }

    /// Also emit failure events, not only changes.
    pub fn with_failure_reports(mut self, report_failures: bool) -> Self {
        self.report_failures = report_failures;
        self
    }

    /// Forget the detector baseline.
    pub async fn reset(&self) -> Result<()> {
        self.detector.lock().await.reset().await
    }

    /// Run one cycle, abandoning it as soon as `cancel` fires.
    pub async fn run_cycle(&self, cancel: &CancellationToken) -> CycleOutcome {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return CycleOutcome::Cancelled,
            result = self.fetcher.fetch() => result,
        };

        let raw = match fetched {
            Ok(raw) => raw,
            Err(e) => return self.fail(e.into(), cancel).await,
        };
        let document = match self.parser.parse(&raw) {
            Ok(document) => document,
            Err(e) => return self.fail(e.into(), cancel).await,
        };

        let mut detector = self.detector.lock().await;
        if cancel.is_cancelled() {
            return CycleOutcome::Cancelled;
        }
        let detection = detector.observe(&raw, &document).await;
        let policy = detector.name();
        drop(detector);

        match detection {
            Ok(detection) if detection.is_changed() => {
                log::info!(
                    "Schedule changed ({}): {}",
                    policy,
                    document.schedule_date
                );
                let event = ScheduleEvent::Loaded(document.clone());
                if let Err(e) = self.sink.notify(&event).await {
                    log::warn!("Notification delivery failed: {}", e);
                }
                CycleOutcome::Changed(document)
            }
            Ok(_) => {
                log::debug!("No schedule changes detected.");
                CycleOutcome::Unchanged
            }
            Err(e) => self.fail(e, cancel).await,
        }
    }

    async fn fail(&self, err: AppError, cancel: &CancellationToken) -> CycleOutcome {
        log::warn!("Poll cycle failed: {}", err);
        let cause = err.cause();
        if self.report_failures && !cancel.is_cancelled() {
            let event = ScheduleEvent::failed(&cause);
            if let Err(e) = self.sink.notify(&event).await {
                log::warn!("Notification delivery failed: {}", e);
            }
        }
        CycleOutcome::Failed(cause)
    }
}

/// Background task running a [`ScheduleMonitor`] on a fixed period.
pub struct PollLoop {
    monitor: ScheduleMonitor,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl PollLoop {
    pub fn new(monitor: ScheduleMonitor) -> Self {
        Self {
            monitor,
            handle: None,
            cancel_token: None,
        }
    }

    pub fn monitor(&self) -> &ScheduleMonitor {
        &self.monitor
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start polling. The first cycle runs immediately.
    pub fn start(&mut self, period: Duration) -> Result<()> {
        if self.handle.is_some() {
            return Err(AppError::poll("poll loop already running"));
        }
        if period.is_zero() {
            return Err(AppError::poll("poll interval must be greater than zero"));
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(
            self.monitor.clone(),
            period,
            cancel_token.clone(),
        ));

        log::info!("Polling every {}s", period.as_secs());
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Stop polling and wait for the task to finish. Safe to call repeatedly.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        match self.handle.take() {
            Some(handle) => handle.await.map_err(AppError::from),
            None => Ok(()),
        }
    }
}

impl Drop for PollLoop {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

async fn poll_loop(monitor: ScheduleMonitor, period: Duration, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if monitor.run_cycle(&cancel_token).await == CycleOutcome::Cancelled {
                    break;
                }
            }
            _ = cancel_token.cancelled() => break,
        }
    }
    log::info!("Poll loop stopped");
}
