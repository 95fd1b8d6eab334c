//! Authenticated HTTP wrapper over the backend REST API.

use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use v7mon_auth::Credential;
use v7mon_core::endpoint::{self, Endpoint, HttpMethod};
use v7mon_core::SignalRecord;

use crate::error::{ApiError, ApiResult};
use crate::types::{AnalyzeResult, TreasuryYield, VixSummary};

/// Default timeout for data requests. Seconds-scale so a stalled backend
/// never freezes the refresh loop for long.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for authenticated calls to the strategy backend.
///
/// Stateless beyond the base URL and reqwest's own connection pool: no
/// stored token, no retries, no backoff.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client with the default timeout.
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g. "http://localhost:8000/api/v1")
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            ApiError::Unavailable(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Perform a GET against an endpoint, returning the response JSON
    /// unchanged.
    pub async fn get(&self, endpoint: &Endpoint, credential: &Credential) -> ApiResult<Value> {
        self.request(endpoint, HttpMethod::Get, credential, None).await
    }

    /// Perform a POST with a JSON body, returning the response JSON
    /// unchanged.
    pub async fn post(
        &self,
        endpoint: &Endpoint,
        credential: &Credential,
        body: &Value,
    ) -> ApiResult<Value> {
        self.request(endpoint, HttpMethod::Post, credential, Some(body))
            .await
    }

    async fn request(
        &self,
        endpoint: &Endpoint,
        method: HttpMethod,
        credential: &Credential,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint.path);
        let mut request = match method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        request = request.bearer_auth(&credential.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(endpoint = %endpoint, "Sending API request");
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // No retry, no silent refresh: the caller must go back through
            // the auth guard.
            warn!(endpoint = %endpoint, "Backend returned 401");
            return Err(ApiError::Unauthenticated);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_detail(&body, status);
            warn!(endpoint = %endpoint, status = status.as_u16(), message = %message, "Backend error");
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(transport_error)?;
        Ok(serde_json::from_str(&text)?)
    }

    // ---- Typed endpoint helpers ----

    /// Run the V7 dual-strategy analysis for a Taipei date/time.
    pub async fn analyze(
        &self,
        credential: &Credential,
        analysis_date: NaiveDate,
        analysis_time: NaiveTime,
    ) -> ApiResult<AnalyzeResult> {
        let body = serde_json::json!({
            "analysis_date": analysis_date.format("%Y-%m-%d").to_string(),
            "analysis_time": analysis_time.format("%H:%M").to_string(),
        });
        let value = self.post(&endpoint::ANALYZE, credential, &body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch today's global signal log.
    ///
    /// The backend has returned both `{"signals": [...]}` envelopes and
    /// bare arrays; accept either.
    pub async fn signals_today(&self, credential: &Credential) -> ApiResult<Vec<SignalRecord>> {
        let value = self.get(&endpoint::SIGNALS_TODAY, credential).await?;
        let rows = match value {
            Value::Array(_) => value,
            Value::Object(mut map) => map.remove("signals").unwrap_or(Value::Array(Vec::new())),
            _ => Value::Array(Vec::new()),
        };
        Ok(serde_json::from_value(rows)?)
    }

    /// Record a fired signal in the global log.
    pub async fn record_signal(
        &self,
        credential: &Credential,
        record: &SignalRecord,
    ) -> ApiResult<()> {
        let body = serde_json::to_value(record)?;
        self.post(&endpoint::RECORD_SIGNAL, credential, &body).await?;
        Ok(())
    }

    /// Fetch today's minute-level VIX data.
    pub async fn vix_today(&self, credential: &Credential) -> ApiResult<VixSummary> {
        let value = self.get(&endpoint::VIX_TODAY, credential).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the US 10-year treasury yield.
    pub async fn treasury_yield(&self, credential: &Credential) -> ApiResult<TreasuryYield> {
        let value = self.get(&endpoint::TREASURY, credential).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Unavailable("Request timed out".to_string())
    } else {
        ApiError::Unavailable(e.to_string())
    }
}

/// Pull the backend's `detail` field out of an error body, falling back to
/// the raw body or the bare status.
fn extract_detail(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_detail_prefers_json_field() {
        let message = extract_detail(r#"{"detail":"analysis failed"}"#, StatusCode::BAD_REQUEST);
        assert_eq!(message, "analysis failed");
    }

    #[test]
    fn test_extract_detail_falls_back_to_body() {
        let message = extract_detail("gateway exploded", StatusCode::BAD_GATEWAY);
        assert_eq!(message, "gateway exploded");
    }

    #[test]
    fn test_extract_detail_empty_body_uses_status() {
        let message = extract_detail("", StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(message, "HTTP 503 Service Unavailable");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000/api/v1");
    }
}
