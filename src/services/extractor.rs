//! Row field extraction.
//!
//! Turns one schedule row into an [`EmployeeRecord`]. The markup-specific
//! rules live here so the parser and detectors never touch cell structure.

use scraper::node::Node;
use scraper::{ElementRef, Selector};

use crate::error::Result;
use crate::models::{EmployeeRecord, NOT_AVAILABLE, ScheduleSelectors};
use crate::services::parse_selector;
use crate::utils::normalize_whitespace;

/// Extracts an employee record from a person's row.
pub trait RowExtractor: Send + Sync {
    /// Build a record from `row`. Never fails; missing cells become `N/A`.
    ///
    /// `job_address` is left as `N/A`; the parser fills it from the
    /// companion row.
    fn extract(&self, row: ElementRef<'_>) -> EmployeeRecord;
}

/// Row extractor driven by the configured cell selectors.
pub struct SelectorRowExtractor {
    employee_cell: Selector,
    employee_phone: Selector,
    shift_cell: Selector,
    job_cell: Selector,
    foreman_cell: Selector,
    foreman_phone: Selector,
    crew_cell: Selector,
    job_block_tags: Vec<String>,
}

impl SelectorRowExtractor {
    pub fn new(selectors: &ScheduleSelectors) -> Result<Self> {
        Ok(Self {
            employee_cell: parse_selector(&selectors.employee_cell)?,
            employee_phone: parse_selector(&selectors.employee_phone)?,
            shift_cell: parse_selector(&selectors.shift_cell)?,
            job_cell: parse_selector(&selectors.job_cell)?,
            foreman_cell: parse_selector(&selectors.foreman_cell)?,
            foreman_phone: parse_selector(&selectors.foreman_phone)?,
            crew_cell: parse_selector(&selectors.crew_cell)?,
            job_block_tags: selectors.job_block_tags.clone(),
        })
    }

    /// Job label: cell content up to the first block element.
    ///
    /// The cell mixes the job name with a "Job Schedule" button wrapped in a
    /// `<div>`; everything from that block onwards is dropped.
    fn job_label(&self, cell: ElementRef<'_>) -> String {
        let mut label = String::new();
        for child in cell.children() {
            match child.value() {
                Node::Text(text) => label.push_str(text),
                Node::Element(element) => {
                    if self.is_block(element.name()) {
                        break;
                    }
                    if let Some(inline) = ElementRef::wrap(child) {
                        label.push(' ');
                        label.extend(inline.text());
                        label.push(' ');
                    }
                }
                _ => {}
            }
        }
        normalize_whitespace(&label)
    }

    fn is_block(&self, tag: &str) -> bool {
        self.job_block_tags
            .iter()
            .any(|block| block.eq_ignore_ascii_case(tag))
    }
}

impl RowExtractor for SelectorRowExtractor {
    fn extract(&self, row: ElementRef<'_>) -> EmployeeRecord {
        let employee = row.select(&self.employee_cell).next();
        let foreman = row.select(&self.foreman_cell).next();

        let record = EmployeeRecord {
            name: or_na(employee.map(own_text)),
            shift: or_na(row.select(&self.shift_cell).next().map(text_of)),
            job: or_na(row.select(&self.job_cell).next().map(|c| self.job_label(c))),
            foreman: or_na(foreman.map(own_text)),
            crew: or_na(row.select(&self.crew_cell).next().map(text_of)),
            job_address: NOT_AVAILABLE.to_string(),
            employee_phone: or_na(
                employee.and_then(|c| c.select(&self.employee_phone).next().map(text_of)),
            ),
            foreman_phone: or_na(
                foreman.and_then(|c| c.select(&self.foreman_phone).next().map(text_of)),
            ),
        };

        log::debug!(
            "Employee: {}, Shift: {}, Job: {}, Foreman: {}, Crew: {}",
            record.name,
            record.shift,
            record.job,
            record.foreman,
            record.crew
        );
        record
    }
}

/// Direct text children only; nested elements (phone annotations) are excluded.
pub fn own_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for child in element.children() {
        if let Node::Text(t) = child.value() {
            text.push_str(t);
            text.push(' ');
        }
    }
    normalize_whitespace(&text)
}

/// All descendant text, whitespace-normalised.
pub fn text_of(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn or_na(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use scraper::Html;

    use super::*;

    fn extract_first_row(html: &str) -> EmployeeRecord {
        let document = Html::parse_document(html);
        let row_sel = Selector::parse("tr").unwrap();
        let row = document.select(&row_sel).next().unwrap();
        let extractor = SelectorRowExtractor::new(&ScheduleSelectors::default()).unwrap();
        extractor.extract(row)
    }

    #[test]
    fn test_full_row() {
        let record = extract_first_row(
            r#"<table><tr class="empRow">
                <td class="dailySchedule employee">Tom Smith <span class="empComments">555-0100</span></td>
                <td class="dailySchedule shift">7:00 AM</td>
                <td class="dailySchedule job">Route 9 Paving <div><a href="/x">Job Schedule</a></div></td>
                <td class="dailySchedule foreman">Bill Jones <span class="noWrap empComments">555-0199</span></td>
                <td class="dailySchedule crew">Crew 4</td>
            </tr></table>"#,
        );

        assert_eq!(record.name, "Tom Smith");
        assert_eq!(record.employee_phone, "555-0100");
        assert_eq!(record.shift, "7:00 AM");
        assert_eq!(record.job, "Route 9 Paving");
        assert_eq!(record.foreman, "Bill Jones");
        assert_eq!(record.foreman_phone, "555-0199");
        assert_eq!(record.crew, "Crew 4");
        assert_eq!(record.job_address, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_cells_become_sentinel() {
        let record = extract_first_row(
            r#"<table><tr class="empRow"><td class="dailySchedule employee">Sara</td></tr></table>"#,
        );

        assert_eq!(record.name, "Sara");
        assert_eq!(record.employee_phone, NOT_AVAILABLE);
        assert_eq!(record.shift, NOT_AVAILABLE);
        assert_eq!(record.job, NOT_AVAILABLE);
        assert_eq!(record.foreman, NOT_AVAILABLE);
        assert_eq!(record.foreman_phone, NOT_AVAILABLE);
        assert_eq!(record.crew, NOT_AVAILABLE);
    }

    #[test]
    fn test_foreman_phone_needs_its_own_marker() {
        // A plain empComments span in the foreman cell is not the foreman phone.
        let record = extract_first_row(
            r#"<table><tr>
                <td class="dailySchedule foreman">Bill <span class="empComments">555-0199</span></td>
            </tr></table>"#,
        );
        assert_eq!(record.foreman, "Bill");
        assert_eq!(record.foreman_phone, NOT_AVAILABLE);
    }

    #[test]
    fn test_job_keeps_inline_markup_text() {
        let record = extract_first_row(
            r#"<table><tr>
                <td class="dailySchedule job"><b>#112</b> Oak &amp; Elm<br>Resurface<div class="btn">View</div>Trailing</td>
            </tr></table>"#,
        );
        assert_eq!(record.job, "#112 Oak & Elm Resurface");
    }
}
