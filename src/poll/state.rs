//! Per-tick job status and session bookkeeping.

use crate::extract::{self, UrlValidity};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Upstream job state as reported by the status endpoint.
///
/// Matching is exact; the upstream only sends lower-case values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Running,
    Succeeded,
    Failed,
    Completed,
    Success,
    Error,
    Other(String),
}

impl JobState {
    pub fn parse(s: &str) -> Self {
        match s {
            "running" => JobState::Running,
            "succeeded" => JobState::Succeeded,
            "failed" => JobState::Failed,
            "completed" => JobState::Completed,
            "success" => JobState::Success,
            "error" => JobState::Error,
            other => JobState::Other(other.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Completed | JobState::Success
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobState::Failed | JobState::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
            JobState::Completed => "completed",
            JobState::Success => "success",
            JobState::Error => "error",
            JobState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single status payload means for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Succeeded,
    Failed { message: String },
    InProgress,
}

/// Snapshot of one status fetch. Built fresh per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct JobStatus {
    /// 0-100; absent or non-numeric progress reads as 0
    pub progress_percent: f64,
    pub state: Option<JobState>,
    /// Playable URL found in the payload, strict predicate
    pub terminal_video_url: Option<String>,
    pub failure_message: Option<String>,
    pub payload: Value,
}

impl JobStatus {
    pub fn from_payload(payload: Value) -> Self {
        let state = extract::first_text(&payload, &["status", "state", "task_status"])
            .map(|s| JobState::parse(&s));
        let progress_percent = payload
            .get("progress")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let terminal_video_url = extract::find_video_url(&payload, UrlValidity::Strict);
        let failure_message = state
            .as_ref()
            .filter(|s| s.is_failure())
            .map(|_| failure_message(&payload));

        Self {
            progress_percent,
            state,
            terminal_video_url,
            failure_message,
            payload,
        }
    }

    /// Success wins over failure: a job reporting progress 100 is done whatever its state.
    pub fn verdict(&self) -> Verdict {
        let state_success = self.state.as_ref().is_some_and(JobState::is_success);
        if state_success || self.progress_percent == 100.0 {
            return Verdict::Succeeded;
        }
        if self.state.as_ref().is_some_and(JobState::is_failure) {
            return Verdict::Failed {
                message: self
                    .failure_message
                    .clone()
                    .unwrap_or_else(|| failure_message(&self.payload)),
            };
        }
        Verdict::InProgress
    }
}

/// First non-empty of `failure_reason`, `error`, `message`.
fn failure_message(payload: &Value) -> String {
    ["failure_reason", "error", "message"]
        .iter()
        .find_map(|field| match payload.get(*field)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null | Value::String(_) | Value::Bool(false) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| "unknown error".to_string())
}

/// Bookkeeping for one in-flight job.
#[derive(Debug, Clone)]
pub struct PollSession {
    pub task_id: String,
    /// Host the job was submitted to; reused for every fetch
    pub base_url: String,
    pub attempt_count: u32,
    pub attempt_limit: u32,
    pub interval: Duration,
    pub started_at: Instant,
}

impl PollSession {
    pub fn new(
        task_id: impl Into<String>,
        base_url: impl Into<String>,
        attempt_limit: u32,
        interval: Duration,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            base_url: base_url.into(),
            attempt_count: 0,
            attempt_limit,
            interval,
            started_at: Instant::now(),
        }
    }

    /// Count a tick. Returns false once the limit is exceeded.
    pub fn next_attempt(&mut self) -> bool {
        self.attempt_count += 1;
        self.attempt_count <= self.attempt_limit
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Progress report handed to the observer on every non-terminal tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PollTick {
    pub attempt: u32,
    pub attempt_limit: u32,
    pub status: JobStatus,
}
