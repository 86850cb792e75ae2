// src/lib.rs

//! Shiftwatch Library
//!
//! Fetches a published daily work schedule, parses it into structured
//! records, and reports when it changes.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
