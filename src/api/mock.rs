//! In-memory gateway for unit tests.

use super::{ApiError, GenerationRequest, Submission, VideoGateway};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Replays scripted responses. When the status script runs dry the last
/// response is repeated.
pub(crate) struct ScriptedGateway {
    submit: Mutex<Option<Result<Submission, ApiError>>>,
    statuses: Mutex<VecDeque<Result<Value, ApiError>>>,
    last_status: Mutex<Option<Result<Value, ApiError>>>,
    download: Mutex<Result<Vec<u8>, ApiError>>,
    fetch_delay: Duration,
    pub fetches: AtomicU32,
    pub fetch_times: Mutex<Vec<Instant>>,
    pub downloads: Mutex<Vec<String>>,
    pub submitted: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            submit: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            last_status: Mutex::new(None),
            download: Mutex::new(Ok(b"video-bytes".to_vec())),
            fetch_delay: Duration::ZERO,
            fetches: AtomicU32::new(0),
            fetch_times: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_submit(self, body: Value) -> Self {
        *self.submit.lock().unwrap() = Some(Ok(Submission {
            base_url: "https://api.test".to_string(),
            body,
        }));
        self
    }

    pub fn with_submit_error(self, error: ApiError) -> Self {
        *self.submit.lock().unwrap() = Some(Err(error));
        self
    }

    pub fn with_status(self, status: Value) -> Self {
        self.statuses.lock().unwrap().push_back(Ok(status));
        self
    }

    pub fn with_status_error(self, error: ApiError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_download(self, result: Result<Vec<u8>, ApiError>) -> Self {
        *self.download.lock().unwrap() = result;
        self
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoGateway for ScriptedGateway {
    async fn submit(&self, request: GenerationRequest) -> Result<Submission, ApiError> {
        self.submitted.lock().unwrap().push(request);
        self.submit
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(ApiError::missing_host()))
    }

    async fn fetch_status(&self, _base_url: &str, _task_id: &str) -> Result<Value, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.fetch_times.lock().unwrap().push(Instant::now());
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        let next = self.statuses.lock().unwrap().pop_front();
        match next {
            Some(result) => {
                *self.last_status.lock().unwrap() = Some(result.clone());
                result
            }
            None => self
                .last_status
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Ok(serde_json::json!({"status": "running"}))),
        }
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        self.downloads.lock().unwrap().push(url.to_string());
        self.download.lock().unwrap().clone()
    }
}
