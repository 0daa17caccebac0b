//! Agent Wire Types
//!
//! Request and response bodies for the agent's JSON API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::JobId;
use crate::ports::StatusReport;

/// Body of `POST /api/send-request`
#[derive(Debug, Clone, Serialize)]
pub struct SendRequestBody<'a> {
    pub query: &'a str,
}

/// Pull the job handle out of a start response.
///
/// Anything other than a non-empty string under `request_id` counts as
/// missing.
pub fn extract_job_id(body: &Value) -> Option<JobId> {
    body.get("request_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(JobId::new)
}

/// Body of `GET /api/get-response/{id}`
///
/// Fields are loosely typed: any JSON object is a valid poll reply, and
/// only a string `"complete"` status finishes the job.
#[derive(Debug, Clone, Deserialize)]
pub struct GetResponseBody {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub analysis_result: Option<Value>,
}

impl GetResponseBody {
    /// Read the poll fields from any JSON document; non-objects have neither
    pub fn from_json(value: &Value) -> Self {
        Self {
            status: value.get("status").cloned(),
            analysis_result: value.get("analysis_result").cloned(),
        }
    }

    fn status_text(&self) -> String {
        match self.status {
            Some(Value::String(ref s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(ref other) => other.to_string(),
        }
    }

    fn result_text(&self) -> Option<String> {
        let text = match self.analysis_result {
            Some(Value::String(ref s)) => s.clone(),
            Some(Value::Null) | None => return None,
            Some(ref other) => other.to_string(),
        };
        // empty content counts as no content
        Some(text).filter(|r| !r.is_empty())
    }
}

impl From<GetResponseBody> for StatusReport {
    fn from(body: GetResponseBody) -> Self {
        StatusReport::from_status(&body.status_text(), body.result_text())
    }
}

/// Body of `GET /api/exchange-rate`
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRateBody {
    pub rate: Decimal,
    #[serde(default, alias = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
}
