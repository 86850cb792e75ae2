//! Integration tests for the poll loop against a mock schedule server.

use std::sync::Arc;
use std::time::Duration;

use shiftwatch::{
    models::{FetcherConfig, ScheduleEvent, ScheduleSelectors},
    pipeline::{self, FingerprintDetector, PollLoop, ScheduleMonitor},
    services::{ChannelSink, HttpFetcher, ScheduleParser},
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = include_str!("fixtures/daily_schedule.html");

async fn schedule_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schedule"))
        .and(header("cookie", "schedulingEmpID=4521"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn fetcher_for(server: &MockServer) -> HttpFetcher {
    let config = FetcherConfig {
        url: format!("{}/schedule", server.uri()),
        timeout_secs: 5,
        ..FetcherConfig::default()
    };
    HttpFetcher::new(&config, "4521").unwrap()
}

fn parser() -> ScheduleParser {
    ScheduleParser::new(&ScheduleSelectors::default()).unwrap()
}

#[tokio::test]
async fn test_one_shot_fetch_loads_document() {
    let server = schedule_server(200, PAGE).await;
    let event = pipeline::fetch_schedule(&fetcher_for(&server), &parser()).await;

    let doc = event.document().expect("document");
    assert_eq!(doc.self_record.name, "Jane Doe");
    assert_eq!(doc.others.len(), 2);
}

#[tokio::test]
async fn test_one_shot_fetch_reports_status() {
    let server = schedule_server(500, "").await;
    let event = pipeline::fetch_schedule(&fetcher_for(&server), &parser()).await;

    assert_eq!(
        event.notification().body,
        "Unable to load schedule. Error: HTTP 500"
    );
}

#[tokio::test]
async fn test_poll_loop_emits_first_schedule() {
    let server = schedule_server(200, PAGE).await;
    let (sink, mut rx) = ChannelSink::new();

    let monitor = ScheduleMonitor::new(
        Arc::new(fetcher_for(&server)),
        Arc::new(parser()),
        Box::new(FingerprintDetector::new()),
        Arc::new(sink),
    );
    let mut poll = PollLoop::new(monitor);
    poll.start(Duration::from_secs(3600)).unwrap();

    let event = tokio::time::timeout(Duration::from_secs(10), rx.recv())
        .await
        .expect("first cycle should run immediately")
        .expect("sink open");
    poll.stop().await.unwrap();

    let notification = event.notification();
    assert_eq!(notification.title, "Schedule Updated");
    assert_eq!(
        notification.body,
        "Your schedule has been updated for Monday, June 2, 2025"
    );
    assert!(matches!(event, ScheduleEvent::Loaded(_)));
    assert!(!poll.is_running());
}
