//! Service layer for the schedule watcher.
//!
//! This module contains the business logic for:
//! - Page retrieval (`Fetcher`, `HttpFetcher`)
//! - Schedule parsing (`ScheduleParser`)
//! - Row field extraction (`RowExtractor`)
//! - Notification delivery (`NotificationSink`)

pub mod extractor;
pub mod fetcher;
pub mod notifier;
pub mod parser;

use scraper::Selector;

use crate::error::{AppError, Result};

pub use extractor::{RowExtractor, SelectorRowExtractor};
pub use fetcher::{Fetcher, HttpFetcher};
pub use notifier::{ChannelSink, FanoutSink, LogSink, MemorySink, NotificationSink, NtfySink};
pub use parser::ScheduleParser;

/// Compile a CSS selector, mapping failures to [`AppError::Selector`].
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
