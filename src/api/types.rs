//! Request and response types for the video-generation API.

use super::ApiError;
use crate::config::{GenerationConfig, WebhookConfig};
use crate::extract;
use serde::Serialize;
use serde_json::Value;

/// Sentinel `webHook` value asking the upstream to hold results for polling.
pub const POLL_SENTINEL: &str = "-1";

/// One video-generation job as requested by a caller.
///
/// Built once per invocation and consumed by [`VideoGateway::submit`](super::VideoGateway::submit).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    /// API model value; blank falls back to the configured default model
    pub model: Option<String>,
    pub prompt: String,
    /// Reference image for image-to-video generation
    pub reference_url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub duration_seconds: Option<u32>,
    pub size: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Request carrying the configured model, aspect ratio, duration and size.
    pub fn with_defaults(prompt: impl Into<String>, defaults: &GenerationConfig) -> Self {
        Self {
            model: Some(defaults.default_model.clone()),
            prompt: prompt.into(),
            reference_url: None,
            aspect_ratio: Some(defaults.default_aspect_ratio.clone()),
            duration_seconds: Some(defaults.default_duration),
            size: Some(defaults.default_size.clone()),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn reference_url(mut self, url: impl Into<String>) -> Self {
        self.reference_url = Some(url.into());
        self
    }

    pub fn aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    pub fn duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

/// How the upstream should deliver the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookMode {
    /// The client polls `/v1/draw/result`
    Poll,
    /// The upstream pushes the result to this URL
    Url(String),
}

impl WebhookMode {
    /// Webhook delivery only when enabled *and* a URL is configured.
    pub fn from_config(config: &WebhookConfig) -> Self {
        let url = config.url.trim();
        if config.enabled && !url.is_empty() {
            WebhookMode::Url(url.to_string())
        } else {
            WebhookMode::Poll
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            WebhookMode::Poll => POLL_SENTINEL,
            WebhookMode::Url(url) => url,
        }
    }
}

/// Wire body of `POST /v1/video/sora-video`. Absent options are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub web_hook: String,
    pub shut_progress: bool,
}

impl SubmitBody {
    pub fn build(request: GenerationRequest, default_model: &str, webhook: &WebhookMode) -> Self {
        let model = request
            .model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| default_model.to_string());
        let url = request
            .reference_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Self {
            model,
            prompt: request.prompt,
            url,
            aspect_ratio: request.aspect_ratio,
            duration: request.duration_seconds,
            size: request.size,
            web_hook: webhook.as_wire().to_string(),
            shut_progress: false,
        }
    }
}

/// A successful submit: the raw body and the host it was sent to.
///
/// Polling reuses `base_url`; the host is not re-resolved mid-session.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub base_url: String,
    pub body: Value,
}

impl Submission {
    /// Extract the job identifier; no identifier means no job was created.
    pub fn job_handle(&self) -> Result<JobHandle, ApiError> {
        extract::find_task_id(&self.body)
            .map(|task_id| JobHandle { task_id })
            .ok_or_else(|| extraction_error("task id", &self.body))
    }
}

/// Identifier of an accepted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub task_id: String,
}

/// Extraction failure carrying the serialized payload and its `data`, `msg`
/// and `code` fields for debugging.
pub fn extraction_error(what: &'static str, payload: &Value) -> ApiError {
    let details = ["data", "msg", "code"]
        .iter()
        .filter_map(|field| {
            payload
                .get(*field)
                .map(|value| format!("\n{}: {}", field, value))
        })
        .collect::<String>();
    ApiError::Extraction {
        what,
        payload: payload.to_string(),
        details,
    }
}
