// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::FetcherConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Cookie header value carrying the employee identifier.
pub fn credential_cookie(cookie_name: &str, employee_id: &str) -> String {
    format!("{}={}", cookie_name, employee_id)
}
