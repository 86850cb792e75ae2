// src/models/mod.rs

//! Domain models for the schedule watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod employee;
mod schedule;
mod selectors;

// Re-export all public types
pub use config::{Config, FetcherConfig, NotifyConfig, PollConfig, StorageConfig, Strategy};
pub use employee::{EmployeeRecord, NOT_AVAILABLE, NOT_SCHEDULED};
pub use schedule::{DATE_NOT_FOUND, Notification, ScheduleDocument, ScheduleEvent};
pub use selectors::ScheduleSelectors;
