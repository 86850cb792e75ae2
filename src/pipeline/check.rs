// src/pipeline/check.rs

//! One-shot schedule operations.
//!
//! - `fetch_schedule`: fetch + parse, delivered as a single event
//! - `run_check`: the periodic background check using the date-label policy

use std::sync::Arc;

use chrono::Utc;

use crate::error::{FetchError, Result};
use crate::models::{Config, ScheduleDocument, ScheduleEvent};
use crate::pipeline::detect::{DateLabelDetector, Detection};
use crate::services::{Fetcher, HttpFetcher, NotificationSink, ScheduleParser};
use crate::storage::{EMPLOYEE_ID_KEY, KeyValueStore, LAST_CHECKED_KEY};

/// Fetch and parse the schedule once, keeping the raw page.
pub async fn fetch_document(
    fetcher: &dyn Fetcher,
    parser: &ScheduleParser,
) -> Result<(String, ScheduleDocument)> {
    let raw = fetcher.fetch().await?;
    let document = parser.parse(&raw)?;
    Ok((raw, document))
}

/// Fetch the schedule for display.
///
/// Always yields exactly one event: the parsed document, or the failure
/// that prevented it.
pub async fn fetch_schedule(fetcher: &dyn Fetcher, parser: &ScheduleParser) -> ScheduleEvent {
    match fetch_document(fetcher, parser).await {
        Ok((_, document)) => ScheduleEvent::Loaded(document),
        Err(e) => {
            log::warn!("Failed to fetch schedule: {}", e);
            ScheduleEvent::failed(e.cause())
        }
    }
}

/// Employee identifier from an explicit override or the store.
pub async fn resolve_employee_id(
    store: &dyn KeyValueStore,
    explicit: Option<&str>,
) -> Result<String> {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }
    match store.get(EMPLOYEE_ID_KEY).await? {
        Some(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
        _ => Err(FetchError::MissingCredential.into()),
    }
}

/// Fetch, parse and compare the schedule date to the persisted one.
///
/// Notifies the sink only when the date changed. Delivery failures are
/// logged; the new date is already persisted at that point.
pub async fn check_once(
    fetcher: &dyn Fetcher,
    parser: &ScheduleParser,
    detector: &DateLabelDetector,
    sink: &dyn NotificationSink,
) -> Result<Detection> {
    let (_, document) = fetch_document(fetcher, parser).await?;
    let detection = detector.check(&document.schedule_date).await?;

    if detection.is_changed() {
        log::info!("Schedule date changed to {}", document.schedule_date);
        if let Err(e) = sink.notify(&ScheduleEvent::Loaded(document)).await {
            log::warn!("Notification delivery failed: {}", e);
        }
    } else {
        log::info!("No schedule changes detected.");
    }
    Ok(detection)
}

/// Run the background check with configured collaborators.
pub async fn run_check(
    config: &Config,
    store: Arc<dyn KeyValueStore>,
    sink: &dyn NotificationSink,
    employee_id: Option<&str>,
) -> Result<Detection> {
    let employee_id = resolve_employee_id(store.as_ref(), employee_id).await?;
    let fetcher = HttpFetcher::new(&config.fetcher, &employee_id)?;
    let parser = ScheduleParser::new(&config.markup)?;
    let detector = DateLabelDetector::new(store.clone());

    let detection = check_once(&fetcher, &parser, &detector, sink)
        .await
        .inspect_err(|e| log::error!("Failed to fetch schedule: {}", e))?;
    store
        .set(LAST_CHECKED_KEY, &Utc::now().to_rfc3339())
        .await?;
    Ok(detection)
}
