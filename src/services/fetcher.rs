//! Schedule page retrieval.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::COOKIE;

use crate::error::{FetchError, Result};
use crate::models::FetcherConfig;
use crate::utils::http::{create_async_client, credential_cookie};

/// Retrieves the raw schedule document.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the page body. Transport failures and non-success statuses
    /// both surface as [`FetchError`].
    async fn fetch(&self) -> std::result::Result<String, FetchError>;
}

/// Fetcher issuing an authenticated GET against the schedule endpoint.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    url: String,
    cookie: String,
}

impl HttpFetcher {
    /// Create a fetcher for the configured endpoint and employee.
    pub fn new(config: &FetcherConfig, employee_id: &str) -> Result<Self> {
        let client = create_async_client(config)?;
        Self::with_client(client, config, employee_id).map_err(Into::into)
    }

    /// Create a fetcher reusing an existing client.
    pub fn with_client(
        client: Client,
        config: &FetcherConfig,
        employee_id: &str,
    ) -> std::result::Result<Self, FetchError> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(FetchError::MissingCredential);
        }
        Ok(Self {
            client,
            url: config.url.clone(),
            cookie: credential_cookie(&config.cookie_name, employee_id),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self) -> std::result::Result<String, FetchError> {
        log::debug!("Fetching schedule from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(COOKIE, &self.cookie)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> FetcherConfig {
        FetcherConfig {
            url: format!("{}/schedule", server.uri()),
            timeout_secs: 5,
            ..FetcherConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_credential_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/schedule"))
            .and(header("cookie", "schedulingEmpID=4521"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config_for(&server), "4521").unwrap();
        let body = fetcher.fetch().await.unwrap();
        assert_eq!(body, "<html></html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&config_for(&server), "4521").unwrap();
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(503)));
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[tokio::test]
    async fn test_transport_failure_is_fetch_error() {
        let config = FetcherConfig {
            url: "http://127.0.0.1:1/schedule".to_string(),
            timeout_secs: 2,
            ..FetcherConfig::default()
        };
        let fetcher = HttpFetcher::new(&config, "4521").unwrap();
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[test]
    fn test_empty_employee_id_rejected() {
        let err = HttpFetcher::with_client(Client::new(), &FetcherConfig::default(), "  ")
            .err()
            .unwrap();
        assert!(matches!(err, FetchError::MissingCredential));
    }
}
