//! Fixed-interval polling of an accepted job.
//!
//! A [`Poller`] drives one [`PollSession`] until the job reaches a terminal state,
//! the attempt budget runs out, or the owning surface cancels. Progress goes to a
//! [`PollObserver`]; the result comes back as a [`PollOutcome`].

mod state;

#[cfg(test)]
mod tests;

pub use state::*;

use crate::api::{ApiError, VideoGateway};
use crate::config::PollingConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Interval and attempt budget for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub attempt_limit: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from(&PollingConfig::default())
    }
}

impl From<&PollingConfig> for PollConfig {
    fn from(config: &PollingConfig) -> Self {
        Self {
            interval: config.interval(),
            attempt_limit: config.max_attempts,
        }
    }
}

/// Why a session ended without a video.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PollFailure {
    /// A status fetch failed; the session is not retried
    #[error("{0}")]
    Fetch(#[from] ApiError),

    /// The upstream reported the job as failed
    #[error("{message}")]
    Job { message: String },
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Succeeded(JobStatus),
    Failed(PollFailure),
    TimedOut { attempts: u32 },
    Cancelled,
}

impl PollOutcome {
    pub fn is_terminal_success(&self) -> bool {
        matches!(self, PollOutcome::Succeeded(_))
    }
}

/// Receives progress for every non-terminal tick.
pub trait PollObserver: Send + Sync {
    fn on_progress(&self, tick: &PollTick);
}

/// Observer that ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl PollObserver for SilentObserver {
    fn on_progress(&self, _tick: &PollTick) {}
}

/// Handle to a spawned session.
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<PollOutcome>,
}

impl PollHandle {
    /// Cancel the session. The pending outcome resolves to [`PollOutcome::Cancelled`].
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn outcome(self) -> PollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Poll task aborted");
                PollOutcome::Cancelled
            }
        }
    }
}

/// Shortest interval a session will tick at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Runs poll sessions against a gateway.
#[derive(Clone)]
pub struct Poller {
    gateway: Arc<dyn VideoGateway>,
    config: PollConfig,
}

impl Poller {
    /// A zero interval is raised to [`MIN_POLL_INTERVAL`]; tokio intervals
    /// cannot tick with a zero period.
    pub fn new(gateway: Arc<dyn VideoGateway>, config: PollConfig) -> Self {
        if config.interval < MIN_POLL_INTERVAL {
            tracing::warn!(
                interval_ms = config.interval.as_millis() as u64,
                "Poll interval below minimum, clamping"
            );
        }
        let config = PollConfig {
            interval: config.interval.max(MIN_POLL_INTERVAL),
            ..config
        };
        Self { gateway, config }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Fresh session for a job submitted to `base_url`.
    pub fn session(&self, task_id: impl Into<String>, base_url: impl Into<String>) -> PollSession {
        PollSession::new(
            task_id,
            base_url,
            self.config.attempt_limit,
            self.config.interval,
        )
    }

    /// Spawn the session onto the runtime.
    ///
    /// The handle's [`stop`](PollHandle::stop) cancels a child of `cancel`, so
    /// cancelling the parent also ends the session.
    pub fn start(
        &self,
        session: PollSession,
        observer: Arc<dyn PollObserver>,
        cancel: CancellationToken,
    ) -> PollHandle {
        let cancel = cancel.child_token();
        let poller = self.clone();
        let token = cancel.clone();
        let task = tokio::spawn(async move { poller.run(session, observer.as_ref(), &token).await });
        PollHandle { cancel, task }
    }

    /// Drive the session to completion on the current task.
    ///
    /// The first fetch happens one interval after the call.
    pub async fn run(
        &self,
        mut session: PollSession,
        observer: &dyn PollObserver,
        cancel: &CancellationToken,
    ) -> PollOutcome {
        let period = session.interval.max(MIN_POLL_INTERVAL);
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        tracing::info!(
            task_id = %session.task_id,
            base_url = %session.base_url,
            interval_ms = period.as_millis() as u64,
            attempt_limit = session.attempt_limit,
            "Polling started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(task_id = %session.task_id, "Polling cancelled");
                    return PollOutcome::Cancelled;
                }
                _ = interval.tick() => {}
            }

            if !session.next_attempt() {
                tracing::warn!(
                    task_id = %session.task_id,
                    attempts = session.attempt_limit,
                    elapsed_ms = session.elapsed().as_millis() as u64,
                    "Polling timed out"
                );
                return PollOutcome::TimedOut {
                    attempts: session.attempt_limit,
                };
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(task_id = %session.task_id, "Polling cancelled during fetch");
                    return PollOutcome::Cancelled;
                }
                result = self.gateway.fetch_status(&session.base_url, &session.task_id) => result,
            };

            let payload = match fetched {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!(
                        task_id = %session.task_id,
                        attempt = session.attempt_count,
                        error = %e,
                        "Status fetch failed"
                    );
                    return PollOutcome::Failed(PollFailure::Fetch(e));
                }
            };

            let status = JobStatus::from_payload(payload);
            tracing::debug!(
                task_id = %session.task_id,
                attempt = session.attempt_count,
                state = status.state.as_ref().map(JobState::as_str).unwrap_or("-"),
                progress = status.progress_percent,
                "Status received"
            );

            match status.verdict() {
                Verdict::Succeeded => {
                    tracing::info!(
                        task_id = %session.task_id,
                        attempts = session.attempt_count,
                        "Job succeeded"
                    );
                    return PollOutcome::Succeeded(status);
                }
                Verdict::Failed { message } => {
                    tracing::warn!(task_id = %session.task_id, message = %message, "Job failed");
                    return PollOutcome::Failed(PollFailure::Job { message });
                }
                Verdict::InProgress => observer.on_progress(&PollTick {
                    attempt: session.attempt_count,
                    attempt_limit: session.attempt_limit,
                    status,
                }),
            }
        }
    }
}
