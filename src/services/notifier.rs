//! Notification sinks.
//!
//! The core emits [`ScheduleEvent`]s; a sink decides how they reach a person
//! or a caller.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::models::ScheduleEvent;

/// Receives emitted schedule events.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: &ScheduleEvent) -> Result<()>;
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn notify(&self, event: &ScheduleEvent) -> Result<()> {
        let notification = event.notification();
        match event {
            ScheduleEvent::Loaded(_) => {
                log::info!("{}: {}", notification.title, notification.body)
            }
            ScheduleEvent::Failed { .. } => {
                log::warn!("{}: {}", notification.title, notification.body)
            }
        }
        Ok(())
    }
}

/// Forwards events to a registered receiver.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ScheduleEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver that gets its events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NotificationSink for ChannelSink {
    async fn notify(&self, event: &ScheduleEvent) -> Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| AppError::config("notification receiver dropped"))
    }
}

/// Posts notifications to an ntfy-style HTTP topic.
#[derive(Debug, Clone)]
pub struct NtfySink {
    client: reqwest::Client,
    url: String,
}

impl NtfySink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationSink for NtfySink {
    async fn notify(&self, event: &ScheduleEvent) -> Result<()> {
        let notification = event.notification();
        self.client
            .post(&self.url)
            .header("Title", notification.title)
            .body(notification.body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Delivers each event to several sinks; one failing sink does not stop the rest.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn NotificationSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl NotificationSink for FanoutSink {
    async fn notify(&self, event: &ScheduleEvent) -> Result<()> {
        for sink in &self.sinks {
            if let Err(e) = sink.notify(event).await {
                log::warn!("Notification delivery failed: {}", e);
            }
        }
        Ok(())
    }
}

/// Records every event in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ScheduleEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScheduleEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationSink for MemorySink {
    async fn notify(&self, event: &ScheduleEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|_| AppError::config("notification log poisoned"))?
            .push(event.clone());
        Ok(())
    }
}
