// src/models/selectors.rs

//! CSS selectors and labels describing the daily schedule markup.

use serde::{Deserialize, Serialize};

/// Structural contract of the daily schedule page.
///
/// Defaults match the published markup exactly; override them in the
/// `[markup]` config section if the page layout changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleSelectors {
    /// Element inside the header whose parent carries the date text
    #[serde(default = "defaults::header_selector")]
    pub header_selector: String,

    /// Leading label stripped from the header text
    #[serde(default = "defaults::header_label")]
    pub header_label: String,

    /// Schedule tables; the second match holds the employee rows
    #[serde(default = "defaults::table_selector")]
    pub table_selector: String,

    /// Rows within the data table
    #[serde(default = "defaults::row_selector")]
    pub row_selector: String,

    /// Row class marking the viewer's own entry
    #[serde(default = "defaults::self_row_class")]
    pub self_row_class: String,

    /// Row class marking any other employee's entry
    #[serde(default = "defaults::other_row_class")]
    pub other_row_class: String,

    /// Element inside a companion row holding the job address
    #[serde(default = "defaults::address_selector")]
    pub address_selector: String,

    /// Leading label stripped from the address text
    #[serde(default = "defaults::address_label")]
    pub address_label: String,

    #[serde(default = "defaults::employee_cell")]
    pub employee_cell: String,

    #[serde(default = "defaults::employee_phone")]
    pub employee_phone: String,

    #[serde(default = "defaults::shift_cell")]
    pub shift_cell: String,

    #[serde(default = "defaults::job_cell")]
    pub job_cell: String,

    #[serde(default = "defaults::foreman_cell")]
    pub foreman_cell: String,

    #[serde(default = "defaults::foreman_phone")]
    pub foreman_phone: String,

    #[serde(default = "defaults::crew_cell")]
    pub crew_cell: String,

    /// Tags that end the job label inside the job cell
    #[serde(default = "defaults::job_block_tags")]
    pub job_block_tags: Vec<String>,
}

impl Default for ScheduleSelectors {
    fn default() -> Self {
        Self {
            header_selector: defaults::header_selector(),
            header_label: defaults::header_label(),
            table_selector: defaults::table_selector(),
            row_selector: defaults::row_selector(),
            self_row_class: defaults::self_row_class(),
            other_row_class: defaults::other_row_class(),
            address_selector: defaults::address_selector(),
            address_label: defaults::address_label(),
            employee_cell: defaults::employee_cell(),
            employee_phone: defaults::employee_phone(),
            shift_cell: defaults::shift_cell(),
            job_cell: defaults::job_cell(),
            foreman_cell: defaults::foreman_cell(),
            foreman_phone: defaults::foreman_phone(),
            crew_cell: defaults::crew_cell(),
            job_block_tags: defaults::job_block_tags(),
        }
    }
}

impl ScheduleSelectors {
    /// All CSS selector strings, paired with their config key.
    pub fn css(&self) -> [(&'static str, &str); 11] {
        [
            ("header_selector", &self.header_selector),
            ("table_selector", &self.table_selector),
            ("row_selector", &self.row_selector),
            ("address_selector", &self.address_selector),
            ("employee_cell", &self.employee_cell),
            ("employee_phone", &self.employee_phone),
            ("shift_cell", &self.shift_cell),
            ("job_cell", &self.job_cell),
            ("foreman_cell", &self.foreman_cell),
            ("foreman_phone", &self.foreman_phone),
            ("crew_cell", &self.crew_cell),
        ]
        .map(|(key, value)| (key, value.as_str()))
    }
}

mod defaults {
    pub fn header_selector() -> String {
        "h3 span.dailySchedule".into()
    }
    pub fn header_label() -> String {
        "Daily Schedule for ".into()
    }
    pub fn table_selector() -> String {
        "table.dailySchedule".into()
    }
    pub fn row_selector() -> String {
        "tr".into()
    }
    pub fn self_row_class() -> String {
        "current".into()
    }
    pub fn other_row_class() -> String {
        "empRow".into()
    }
    pub fn address_selector() -> String {
        ".dailySchedule.pnm-comments".into()
    }
    pub fn address_label() -> String {
        "Job Address: ".into()
    }
    pub fn employee_cell() -> String {
        ".dailySchedule.employee".into()
    }
    pub fn employee_phone() -> String {
        "span.empComments".into()
    }
    pub fn shift_cell() -> String {
        ".dailySchedule.shift".into()
    }
    pub fn job_cell() -> String {
        ".dailySchedule.job".into()
    }
    pub fn foreman_cell() -> String {
        ".dailySchedule.foreman".into()
    }
    pub fn foreman_phone() -> String {
        "span.noWrap.empComments".into()
    }
    pub fn crew_cell() -> String {
        ".dailySchedule.crew".into()
    }
    pub fn job_block_tags() -> Vec<String> {
        ["div", "p", "ul", "ol", "table", "form"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}
