//! Parsed schedule and the events emitted for it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::EmployeeRecord;

/// Schedule date used when the page header is missing.
pub const DATE_NOT_FOUND: &str = "Not Found";

/// The result of one successful parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDocument {
    /// Free-text date label from the page header, or [`DATE_NOT_FOUND`]
    pub schedule_date: String,

    /// The viewer's own record
    #[serde(rename = "self")]
    pub self_record: EmployeeRecord,

    /// Everyone else, in document order
    pub others: Vec<EmployeeRecord>,
}

impl ScheduleDocument {
    pub fn has_date(&self) -> bool {
        self.schedule_date != DATE_NOT_FOUND
    }
}

impl fmt::Display for ScheduleDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "My Schedule for {}", self.schedule_date)?;
        writeln!(f, "{}", self.self_record)?;
        writeln!(f, "Others ({}):", self.others.len())?;
        for other in &self.others {
            writeln!(f)?;
            write!(f, "{}", other)?;
        }
        Ok(())
    }
}

/// Event delivered to whoever registered for schedule updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ScheduleEvent {
    Loaded(ScheduleDocument),
    #[serde(rename_all = "camelCase")]
    Failed { error_message: String },
}

impl ScheduleEvent {
    pub fn failed(cause: impl fmt::Display) -> Self {
        Self::Failed {
            error_message: format!("Error: {}", cause),
        }
    }

    pub fn document(&self) -> Option<&ScheduleDocument> {
        match self {
            Self::Loaded(doc) => Some(doc),
            Self::Failed { .. } => None,
        }
    }

    /// Title and body for a user-facing notification.
    pub fn notification(&self) -> Notification {
        match self {
            Self::Loaded(doc) if doc.has_date() => Notification {
                title: "Schedule Updated".to_string(),
                body: format!("Your schedule has been updated for {}", doc.schedule_date),
            },
            Self::Loaded(_) => Notification {
                title: "Schedule Updated".to_string(),
                body: "Your schedule has been updated. Tap to view.".to_string(),
            },
            Self::Failed { error_message } => Notification {
                title: "Schedule Unavailable".to_string(),
                body: format!("Unable to load schedule. {}", error_message),
            },
        }
    }
}

/// A rendered notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}
