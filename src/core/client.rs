use crate::domain::model::RequestPayload;
use crate::utils::error::{Result, VitalsError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://chromeuxreport.googleapis.com/v1/records:queryRecord";
const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch data";

/// Thin wrapper around the CrUX `records:queryRecord` call.
pub struct CruxClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl CruxClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST 一筆查詢；非 2xx 回應轉為 `ApiError`，訊息取自 `error.message`
    pub async fn query_record(&self, domain: &str, payload: &RequestPayload) -> Result<Value> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(payload);

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!(
            "POST {} ({}={}, formFactor={})",
            self.endpoint,
            payload.target.field_name(),
            payload.target.value(),
            payload.form_factor
        );

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status for {}: {}", domain, status);

        if status.is_success() {
            let body: Value = response.json().await?;
            return Ok(body);
        }

        // 錯誤回應不一定是 JSON
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| {
                json.pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

        tracing::warn!("❌ API error for {} ({}): {}", domain, status, message);

        Err(VitalsError::ApiError {
            domain: domain.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
