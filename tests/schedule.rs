//! Integration tests for parsing and change detection.
//!
//! These run the saved schedule page through the parser and both detection
//! policies, the way the poll loop and the background check use them.

use std::sync::Arc;

use shiftwatch::{
    models::{NOT_AVAILABLE, ScheduleEvent, ScheduleSelectors},
    pipeline::{ChangeDetector, DateLabelDetector, Detection, FingerprintDetector},
    services::ScheduleParser,
    storage::{KeyValueStore, LocalStore, SCHEDULE_DATE_KEY},
};
use tempfile::TempDir;

const PAGE: &str = include_str!("fixtures/daily_schedule.html");

fn parser() -> ScheduleParser {
    ScheduleParser::new(&ScheduleSelectors::default()).unwrap()
}

// ==================== Parsing ====================

#[test]
fn test_fixture_parses_into_records() {
    let doc = parser().parse(PAGE).unwrap();

    assert_eq!(doc.schedule_date, "Monday, June 2, 2025");

    let me = &doc.self_record;
    assert_eq!(me.name, "Jane Doe");
    assert_eq!(me.employee_phone, "(555) 010-4477");
    assert_eq!(me.shift, "6:30 AM");
    assert_eq!(me.job, "Route 9 Overlay Phase 2");
    assert_eq!(me.foreman, "Bill Hart");
    assert_eq!(me.foreman_phone, "(555) 010-9001");
    assert_eq!(me.crew, "Paving 4");
    assert_eq!(me.job_address, "100 Main St, Hartford, CT");

    let names: Vec<&str> = doc.others.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Tom Reyes", "Sara Lind"]);
}

#[test]
fn test_fixture_missing_fields_are_sentinels() {
    let doc = parser().parse(PAGE).unwrap();

    let tom = &doc.others[0];
    assert_eq!(tom.job, "Route 9 Overlay");
    assert_eq!(tom.employee_phone, NOT_AVAILABLE);
    assert_eq!(tom.job_address, "100 Main St, Hartford, CT");

    let sara = &doc.others[1];
    assert_eq!(sara.foreman, NOT_AVAILABLE);
    assert_eq!(sara.foreman_phone, NOT_AVAILABLE);
    assert_eq!(sara.crew, NOT_AVAILABLE);
    assert_eq!(sara.job_address, NOT_AVAILABLE);
    assert!(sara.maps_url().is_none());
}

#[test]
fn test_event_serializes_with_wire_names() {
    let doc = parser().parse(PAGE).unwrap();
    let json = serde_json::to_value(ScheduleEvent::Loaded(doc)).unwrap();

    assert_eq!(json["scheduleDate"], "Monday, June 2, 2025");
    assert_eq!(json["self"]["jobAddress"], "100 Main St, Hartford, CT");
    assert_eq!(json["others"][1]["employeePhone"], "(555) 010-2231");

    let failed = serde_json::to_value(ScheduleEvent::failed("HTTP 502")).unwrap();
    assert_eq!(failed["errorMessage"], "Error: HTTP 502");
}

// ==================== Detection ====================

/// Markup churn that leaves the schedule date alone.
fn churned(page: &str) -> String {
    page.replace("Shift times are approximate.", "Shift times may change.")
}

#[tokio::test]
async fn test_policies_disagree_on_markup_churn() {
    let parser = parser();
    let tmp = TempDir::new().unwrap();
    let store = Arc::new(LocalStore::new(tmp.path()));

    let mut fingerprint = FingerprintDetector::new();
    let mut date_label = DateLabelDetector::new(store);

    let detectors: [&mut dyn ChangeDetector; 2] = [&mut fingerprint, &mut date_label];
    for detector in detectors {
        let doc = parser.parse(PAGE).unwrap();
        assert!(detector.observe(PAGE, &doc).await.unwrap().is_changed());
    }

    let changed_page = churned(PAGE);
    let doc = parser.parse(&changed_page).unwrap();
    assert!(
        fingerprint
            .observe(&changed_page, &doc)
            .await
            .unwrap()
            .is_changed()
    );
    assert_eq!(
        date_label.observe(&changed_page, &doc).await.unwrap(),
        Detection::Unchanged
    );
}

#[tokio::test]
async fn test_date_label_baseline_survives_restart() {
    let tmp = TempDir::new().unwrap();
    let doc = parser().parse(PAGE).unwrap();

    {
        let store = Arc::new(LocalStore::new(tmp.path()));
        let mut detector = DateLabelDetector::new(store);
        detector.observe(PAGE, &doc).await.unwrap();
    }

    let store = Arc::new(LocalStore::new(tmp.path()));
    assert_eq!(
        store.get(SCHEDULE_DATE_KEY).await.unwrap().as_deref(),
        Some("Monday, June 2, 2025")
    );

    let mut detector = DateLabelDetector::new(store.clone());
    assert_eq!(
        detector.observe(PAGE, &doc).await.unwrap(),
        Detection::Unchanged
    );

    let next_day = PAGE.replace("June 2, 2025", "June 3, 2025");
    let next_doc = parser().parse(&next_day).unwrap();
    assert_eq!(
        detector.observe(&next_day, &next_doc).await.unwrap(),
        Detection::Changed {
            previous: Some("Monday, June 2, 2025".to_string()),
            current: "Monday, June 3, 2025".to_string(),
        }
    );
}
