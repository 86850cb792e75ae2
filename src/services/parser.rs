// src/services/parser.rs

//! Daily schedule parser.
//!
//! Converts the raw schedule page into a [`ScheduleDocument`]. Field-level
//! gaps degrade to `N/A`; the only hard failure is a page without the
//! second schedule table.

use scraper::{ElementRef, Html, Selector};

use crate::error::{ParseError, Result};
use crate::models::{
    DATE_NOT_FOUND, EmployeeRecord, NOT_AVAILABLE, ScheduleDocument, ScheduleSelectors,
};
use crate::services::extractor::{RowExtractor, SelectorRowExtractor, text_of};
use crate::services::parse_selector;
use crate::utils::strip_label;

/// Index of the data table among the schedule tables on the page.
const DATA_TABLE_INDEX: usize = 1;

/// Parser for the daily schedule page.
pub struct ScheduleParser {
    header: Selector,
    header_label: String,
    table: Selector,
    row: Selector,
    address: Selector,
    address_label: String,
    self_row_class: String,
    other_row_class: String,
    extractor: Box<dyn RowExtractor>,
}

impl ScheduleParser {
    /// Create a parser using the selector-driven row extractor.
    pub fn new(selectors: &ScheduleSelectors) -> Result<Self> {
        let extractor = SelectorRowExtractor::new(selectors)?;
        Self::with_extractor(selectors, Box::new(extractor))
    }

    /// Create a parser with a custom row extractor.
    pub fn with_extractor(
        selectors: &ScheduleSelectors,
        extractor: Box<dyn RowExtractor>,
    ) -> Result<Self> {
        Ok(Self {
            header: parse_selector(&selectors.header_selector)?,
            header_label: selectors.header_label.clone(),
            table: parse_selector(&selectors.table_selector)?,
            row: parse_selector(&selectors.row_selector)?,
            address: parse_selector(&selectors.address_selector)?,
            address_label: selectors.address_label.clone(),
            self_row_class: selectors.self_row_class.clone(),
            other_row_class: selectors.other_row_class.clone(),
            extractor,
        })
    }

    /// Parse a raw schedule page.
    pub fn parse(&self, raw_html: &str) -> std::result::Result<ScheduleDocument, ParseError> {
        let document = Html::parse_document(raw_html);
        let schedule_date = self.schedule_date(&document);

        let tables: Vec<ElementRef<'_>> = document.select(&self.table).collect();
        let table = tables
            .get(DATA_TABLE_INDEX)
            .copied()
            .ok_or(ParseError::MissingScheduleTable {
                found: tables.len(),
            })?;

        let (self_record, others) = self.parse_rows(table);
        let parsed = ScheduleDocument {
            schedule_date,
            self_record: self_record.unwrap_or_else(EmployeeRecord::unscheduled),
            others,
        };

        log::debug!(
            "Parsed schedule for {}: self={}, {} others",
            parsed.schedule_date,
            parsed.self_record.name,
            parsed.others.len()
        );
        Ok(parsed)
    }

    /// Date label from the page header, or `Not Found`.
    fn schedule_date(&self, document: &Html) -> String {
        let Some(marker) = document.select(&self.header).next() else {
            return DATE_NOT_FOUND.to_string();
        };
        let heading = marker.parent().and_then(ElementRef::wrap).unwrap_or(marker);
        let date = strip_label(&text_of(heading), &self.header_label);
        if date.is_empty() {
            DATE_NOT_FOUND.to_string()
        } else {
            date
        }
    }

    /// Single pass over the table rows.
    ///
    /// A person's row may be followed by an address row; when it is, the
    /// address row is consumed here and never classified on its own.
    fn parse_rows(&self, table: ElementRef<'_>) -> (Option<EmployeeRecord>, Vec<EmployeeRecord>) {
        let rows: Vec<ElementRef<'_>> = table.select(&self.row).collect();
        let mut self_record = None;
        let mut others = Vec::new();

        let mut i = 0;
        while i < rows.len() {
            let row = rows[i];
            let kind = self.classify(row);
            i += 1;

            let Some(kind) = kind else {
                continue;
            };

            let mut record = self.extractor.extract(row);
            if let Some(address) = rows.get(i).and_then(|next| self.address_of(*next)) {
                record.job_address = address;
                i += 1;
            }

            match kind {
                RowKind::Own => {
                    if self_record.is_some() {
                        log::warn!("Multiple self rows in schedule; keeping the last one");
                    }
                    self_record = Some(record);
                }
                RowKind::Other => others.push(record),
            }
        }

        (self_record, others)
    }

    fn classify(&self, row: ElementRef<'_>) -> Option<RowKind> {
        let has_class = |class: &str| row.value().classes().any(|c| c == class);
        if has_class(&self.self_row_class) {
            Some(RowKind::Own)
        } else if has_class(&self.other_row_class) {
            Some(RowKind::Other)
        } else {
            None
        }
    }

    /// Address text when `row` is an address row.
    ///
    /// An address row whose text is empty still counts as the companion row;
    /// the address then stays `N/A`.
    fn address_of(&self, row: ElementRef<'_>) -> Option<String> {
        let cells: Vec<ElementRef<'_>> = row.select(&self.address).collect();
        if cells.is_empty() {
            return None;
        }
        let text = cells.into_iter().map(text_of).collect::<Vec<_>>().join(" ");
        let address = strip_label(&text, &self.address_label);
        if address.is_empty() {
            Some(NOT_AVAILABLE.to_string())
        } else {
            Some(address)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RowKind {
    Own,
    Other,
}
