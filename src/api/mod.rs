//! Gateway to the upstream video-generation API.
//!
//! Two JSON endpoints are used against the active host:
//!
//! - `POST {host}/v1/video/sora-video` submits a generation job
//! - `POST {host}/v1/draw/result` fetches the status of a job
//!
//! Both carry `Authorization: Bearer <key>`. Transport failures (non-2xx) and
//! business failures (2xx with a failing `code` or an `error` field) are normalised
//! into [`ApiError`].

pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use error::ApiError;
pub use types::{
    extraction_error, GenerationRequest, JobHandle, Submission, SubmitBody, WebhookMode,
    POLL_SENTINEL,
};

use crate::config::{ApiConfig, HostEndpointConfig, VidnoteConfig};
use crate::extract;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Path of the submit endpoint, relative to the host.
pub const SUBMIT_PATH: &str = "/v1/video/sora-video";
/// Path of the status endpoint, relative to the host.
pub const RESULT_PATH: &str = "/v1/draw/result";

/// Operations the generation workflow needs from the upstream.
///
/// Object-safe so the poll loop and workflow can hold `Arc<dyn VideoGateway>`
/// and tests can substitute an in-memory implementation.
#[async_trait]
pub trait VideoGateway: Send + Sync + 'static {
    /// Submit a job to the currently selected host.
    ///
    /// The host is resolved once here and returned in the [`Submission`].
    async fn submit(&self, request: GenerationRequest) -> Result<Submission, ApiError>;

    /// Fetch the status of `task_id` from `base_url`.
    ///
    /// Returns the `data` sub-object when present, otherwise the whole body.
    async fn fetch_status(&self, base_url: &str, task_id: &str) -> Result<Value, ApiError>;

    /// Download a finished video.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

/// Resolve the base URL requests are sent to.
///
/// The selected host is used when it exists and is enabled; otherwise the legacy
/// single-host setting. Trailing slashes are dropped.
pub fn resolve_base_url(api: &ApiConfig) -> Result<String, ApiError> {
    let url = match api.selected() {
        Some(host) if host.enabled => host.url.as_str(),
        _ => api.host.as_str(),
    };
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        return Err(ApiError::missing_host());
    }
    Ok(url.to_string())
}

/// Inspect a decoded 2xx body for business-level failure.
///
/// `code` present (even `null`) and not 0/200 fails with [`ApiError::Business`]; a truthy
/// `error` field fails with [`ApiError::Rejected`].
pub fn check_business_error(body: &Value) -> Result<(), ApiError> {
    if let Some(code) = body.get("code") {
        let ok = code
            .as_f64()
            .map(|c| c == 0.0 || c == 200.0)
            .unwrap_or(false);
        if !ok {
            let message = extract::first_text(body, &["msg", "message"])
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(ApiError::Business {
                code: render_scalar(code),
                message,
            });
        }
    }

    if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
        return Err(ApiError::Rejected(render_scalar(error)));
    }

    Ok(())
}

/// `data` when present and truthy, otherwise the whole body.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// reqwest-backed gateway.
pub struct ApiClient {
    /// Shared HTTP client for connection pooling
    client: Arc<Client>,
    config: Arc<VidnoteConfig>,
}

impl ApiClient {
    /// Create a gateway with its own HTTP client honouring `[api] timeout_seconds`.
    pub fn new(config: Arc<VidnoteConfig>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a gateway with a custom HTTP client (for testing).
    pub fn with_client(config: Arc<VidnoteConfig>, client: Arc<Client>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &VidnoteConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, ApiError> {
        let key = self.config.api.key.trim();
        if key.is_empty() {
            return Err(ApiError::missing_api_key());
        }
        Ok(key)
    }

    /// POST `body` as JSON to `url`, returning the decoded, business-checked body.
    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let key = self.api_key()?;
        let timeout = self.config.api.timeout_seconds;

        let response = self
            .client
            .post(url)
            .bearer_auth(key)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;

        if !status.is_success() {
            return Err(ApiError::Transport {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} (body: {})", e, text)))?;

        if self.config.logging.log_payloads {
            tracing::debug!(url, payload = %value, "API response");
        }

        check_business_error(&value)?;
        Ok(value)
    }

    /// Send a minimal probe job to `host` to check reachability and credentials.
    ///
    /// This is a real submission; the upstream may bill for it.
    pub async fn test_host(&self, host: &HostEndpointConfig) -> Result<(), ApiError> {
        let base_url = host.url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiError::missing_host());
        }
        let request = GenerationRequest::new("test")
            .aspect_ratio("16:9")
            .duration_seconds(5)
            .size("small");
        let body = SubmitBody::build(
            request,
            &self.config.generation.default_model,
            &WebhookMode::Poll,
        );

        tracing::info!(host = %host.id, base_url, "Testing API host");
        self.post_json(&format!("{}{}", base_url, SUBMIT_PATH), &body)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl VideoGateway for ApiClient {
    async fn submit(&self, request: GenerationRequest) -> Result<Submission, ApiError> {
        self.api_key()?;
        let base_url = resolve_base_url(&self.config.api)?;
        let webhook = WebhookMode::from_config(&self.config.webhook);
        let body = SubmitBody::build(request, &self.config.generation.default_model, &webhook);

        let url = format!("{}{}", base_url, SUBMIT_PATH);
        tracing::info!(
            url = %url,
            model = %body.model,
            webhook = %webhook.as_wire(),
            prompt = ?crate::logging::prompt_preview(&body.prompt, self.config.logging.log_payloads),
            "Submitting generation job"
        );

        let body = self.post_json(&url, &body).await?;
        Ok(Submission { base_url, body })
    }

    async fn fetch_status(&self, base_url: &str, task_id: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", base_url, RESULT_PATH);
        tracing::debug!(url = %url, task_id, "Fetching job status");

        let body = self
            .post_json(&url, &serde_json::json!({ "id": task_id }))
            .await?;
        Ok(unwrap_data(body))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let timeout = self.config.api.timeout_seconds;
        tracing::info!(url, "Downloading video");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Transport {
                status: status.as_u16(),
                body: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(e, timeout))?;
        Ok(bytes.to_vec())
    }
}
