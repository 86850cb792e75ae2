//! Pipeline entry points for schedule operations.
//!
//! - `fetch_schedule`: one fetch, one event
//! - `run_check`: date-label check for background runs
//! - `PollLoop`: periodic polling with change detection

pub mod check;
pub mod detect;
pub mod poll;

pub use check::{check_once, fetch_document, fetch_schedule, resolve_employee_id, run_check};
pub use detect::{ChangeDetector, DateLabelDetector, Detection, FingerprintDetector, fingerprint};
pub use poll::{CycleOutcome, PollLoop, ScheduleMonitor};
