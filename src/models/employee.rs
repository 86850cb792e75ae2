//! Employee record data structure.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Sentinel for any field the markup did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Job label given to the synthesized self record when the viewer has no row.
pub const NOT_SCHEDULED: &str = "Not scheduled today";

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// One row of the schedule: one person and their assignment.
///
/// Every field is always populated; missing values hold [`NOT_AVAILABLE`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub name: String,
    pub shift: String,
    pub job: String,
    pub foreman: String,
    pub crew: String,

    /// Taken from the companion address row, if one follows the person's row
    pub job_address: String,

    pub employee_phone: String,
    pub foreman_phone: String,
}

impl Default for EmployeeRecord {
    fn default() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            shift: NOT_AVAILABLE.to_string(),
            job: NOT_AVAILABLE.to_string(),
            foreman: NOT_AVAILABLE.to_string(),
            crew: NOT_AVAILABLE.to_string(),
            job_address: NOT_AVAILABLE.to_string(),
            employee_phone: NOT_AVAILABLE.to_string(),
            foreman_phone: NOT_AVAILABLE.to_string(),
        }
    }
}

impl EmployeeRecord {
    /// Placeholder used as the viewer's record when no row is tagged as theirs.
    pub fn unscheduled() -> Self {
        Self {
            name: "You".to_string(),
            job: NOT_SCHEDULED.to_string(),
            ..Self::default()
        }
    }

    pub fn has_phone(&self) -> bool {
        self.employee_phone != NOT_AVAILABLE
    }

    pub fn has_foreman_phone(&self) -> bool {
        self.foreman_phone != NOT_AVAILABLE
    }

    pub fn has_job_address(&self) -> bool {
        self.job_address != NOT_AVAILABLE
    }

    /// Map search link for the job address, or `None` when there is no address.
    pub fn maps_url(&self) -> Option<Url> {
        if !self.has_job_address() {
            return None;
        }
        Url::parse_with_params(
            MAPS_SEARCH_URL,
            &[("api", "1"), ("query", self.job_address.as_str())],
        )
        .ok()
    }
}

impl fmt::Display for EmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Employee: {}", self.name)?;
        writeln!(f, "Shift: {}", self.shift)?;
        writeln!(f, "Job: {}", self.job)?;
        writeln!(f, "Foreman: {}", self.foreman)?;
        writeln!(f, "Crew: {}", self.crew)?;
        writeln!(f, "Job Address: {}", self.job_address)?;
        if self.has_phone() {
            writeln!(f, "Employee Phone: {}", self.employee_phone)?;
        }
        if self.has_foreman_phone() {
            writeln!(f, "Foreman Phone: {}", self.foreman_phone)?;
        }
        Ok(())
    }
}
