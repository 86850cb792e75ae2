//! Change detection.
//!
//! Two policies decide whether a fetch is a "new" schedule:
//!
//! - [`FingerprintDetector`]: digest of the raw page. Any byte change counts,
//!   including markup churn. State lives in memory only.
//! - [`DateLabelDetector`]: the parsed schedule date compared to the last
//!   persisted one. Survives restarts, but misses changes within a day.
//!
//! Both report a change when they have no prior state.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::ScheduleDocument;
use crate::storage::{KeyValueStore, SCHEDULE_DATE_KEY};

/// Outcome of comparing a fetch to the stored baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Baseline moved from `previous` to `current`
    Changed {
        previous: Option<String>,
        current: String,
    },
    Unchanged,
}

impl Detection {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// A change detection policy owning its own baseline.
#[async_trait]
pub trait ChangeDetector: Send + Sync {
    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    /// Compare a fetch to the baseline and move the baseline on change.
    async fn observe(&mut self, raw: &str, document: &ScheduleDocument) -> Result<Detection>;

    /// Forget the baseline so the next observation reports a change.
    async fn reset(&mut self) -> Result<()>;
}

/// Hex SHA-256 digest of the document text.
pub fn fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Byte-level detector over the raw document.
#[derive(Debug, Clone, Default)]
pub struct FingerprintDetector {
    last_fingerprint: Option<String>,
}

impl FingerprintDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known baseline instead of a cold start.
    pub fn seeded(fingerprint: impl Into<String>) -> Self {
        Self {
            last_fingerprint: Some(fingerprint.into()),
        }
    }

    pub fn last_fingerprint(&self) -> Option<&str> {
        self.last_fingerprint.as_deref()
    }

    pub fn seed(&mut self, fingerprint: Option<String>) {
        self.last_fingerprint = fingerprint;
    }

    /// Compare `raw` against the last fingerprint, updating it on change.
    pub fn check(&mut self, raw: &str) -> Detection {
        let current = fingerprint(raw);
        if self.last_fingerprint.as_deref() == Some(current.as_str()) {
            return Detection::Unchanged;
        }
        let previous = self.last_fingerprint.replace(current.clone());
        Detection::Changed { previous, current }
    }
}

#[async_trait]
impl ChangeDetector for FingerprintDetector {
    fn name(&self) -> &'static str {
        "fingerprint"
    }

    async fn observe(&mut self, raw: &str, _document: &ScheduleDocument) -> Result<Detection> {
        Ok(self.check(raw))
    }

    async fn reset(&mut self) -> Result<()> {
        self.last_fingerprint = None;
        Ok(())
    }
}

/// Detector over the persisted schedule date label.
#[derive(Clone)]
pub struct DateLabelDetector {
    store: Arc<dyn KeyValueStore>,
}

impl DateLabelDetector {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn last_schedule_date(&self) -> Result<Option<String>> {
        self.store.get(SCHEDULE_DATE_KEY).await
    }

    pub async fn seed(&self, schedule_date: &str) -> Result<()> {
        self.store.set(SCHEDULE_DATE_KEY, schedule_date).await
    }

    /// Compare `schedule_date` against the persisted one, persisting it on change.
    pub async fn check(&self, schedule_date: &str) -> Result<Detection> {
        let previous = self.last_schedule_date().await?;
        if previous.as_deref() == Some(schedule_date) {
            return Ok(Detection::Unchanged);
        }
        self.store.set(SCHEDULE_DATE_KEY, schedule_date).await?;
        Ok(Detection::Changed {
            previous,
            current: schedule_date.to_string(),
        })
    }
}

#[async_trait]
impl ChangeDetector for DateLabelDetector {
    fn name(&self) -> &'static str {
        "date-label"
    }

    async fn observe(&mut self, _raw: &str, document: &ScheduleDocument) -> Result<Detection> {
        self.check(&document.schedule_date).await
    }

    async fn reset(&mut self) -> Result<()> {
        self.store.remove(SCHEDULE_DATE_KEY).await
    }
}
