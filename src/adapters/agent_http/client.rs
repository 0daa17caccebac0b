//! Agent HTTP Client
//!
//! reqwest client for the external agent's start/status API.
//! One request per call: retry policy belongs to the bridge, not here.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use super::config::{endpoints, AgentHttpConfig};
use super::types::{extract_job_id, ExchangeRateBody, GetResponseBody, SendRequestBody};
use crate::domain::{normalize_code, ExchangeRate, JobId, RateSource};
use crate::ports::{AgentError, AgentPort, StatusReport};

/// HTTP implementation of `AgentPort`
#[derive(Debug, Clone)]
pub struct AgentHttpClient {
    config: AgentHttpConfig,
    /// Base URL, always ending in `/` so relative joins append
    base: Url,
    http: Client,
}

impl AgentHttpClient {
    /// Create a new agent client with custom configuration
    pub fn with_config(config: AgentHttpConfig) -> Result<Self, AgentError> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, base, http })
    }

    /// Create a client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, AgentError> {
        Self::with_config(AgentHttpConfig::new(base_url))
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AgentError> {
        Ok(self.base.join(path)?)
    }

    /// Status URL for a job; the id is appended as one escaped path segment
    fn status_url(&self, job_id: &JobId) -> Result<Url, AgentError> {
        let mut url = self.endpoint(endpoints::GET_RESPONSE)?;
        url.path_segments_mut()
            .map_err(|_| AgentError::InvalidRequest("agent URL cannot be a base".into()))?
            .push(job_id.as_str());
        Ok(url)
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.api_key {
            Some(ref key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Reject non-2xx responses, keeping the body for diagnostics
    async fn ensure_success(response: Response) -> Result<Response, AgentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AgentError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl AgentPort for AgentHttpClient {
    async fn start_job(&self, query: &str) -> Result<JobId, AgentError> {
        let url = self.endpoint(endpoints::SEND_REQUEST)?;
        tracing::debug!(%url, "Sending start request to agent");

        let response = self
            .authorized(self.http.post(url))
            .json(&SendRequestBody { query })
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text)?;

        extract_job_id(&body).ok_or(AgentError::MissingJobId)
    }

    async fn poll_status(&self, job_id: &JobId) -> Result<StatusReport, AgentError> {
        let url = self.status_url(job_id)?;

        let response = self.authorized(self.http.get(url)).send().await?;
        let response = Self::ensure_success(response).await?;

        let text = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&text)?;

        Ok(GetResponseBody::from_json(&value).into())
    }

    async fn health_check(&self) -> bool {
        let url = match self.endpoint(endpoints::HEALTH) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Health check skipped: {}", e);
                return false;
            }
        };

        match self
            .authorized(self.http.get(url))
            .timeout(self.config.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }

    async fn exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate, AgentError> {
        let from = normalize_code(from).map_err(|e| AgentError::InvalidRequest(e.to_string()))?;
        let to = normalize_code(to).map_err(|e| AgentError::InvalidRequest(e.to_string()))?;
        let url = self.endpoint(endpoints::EXCHANGE_RATE)?;

        let response = self
            .authorized(self.http.get(url))
            .query(&[("from", from.as_str()), ("to", to.as_str())])
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let text = response.text().await?;
        let body: ExchangeRateBody = serde_json::from_str(&text)?;

        Ok(ExchangeRate {
            from,
            to,
            rate: body.rate,
            last_updated: body.last_updated.unwrap_or_else(Utc::now),
            source: RateSource::Agent,
        })
    }
}
