//! One generation invocation: submit, poll, deliver.
//!
//! Every surface runs the same chain and differs only in its [`SurfaceProfile`].
//! Errors never escape: each failure becomes a [`Notice`] and a
//! [`WorkflowOutcome`] the host can act on.

mod notice;
mod surface;


pub use notice::{LogNotifier, Notice, NoticeLevel, Notifier, Stage};
pub use surface::{Actions, Surface, SurfaceProfile};

use crate::api::{GenerationRequest, JobHandle, VideoGateway};
use crate::classify::{self, ErrorCategory};
use crate::deliver::{
    DeliveryFailure, DeliveryOutcome, DeliveryReport, DeliveryStep, NoteSurface, ResultHandler,
    VideoStore,
};
use crate::extract::{self, UrlValidity};
use crate::poll::{PollConfig, PollFailure, PollObserver, PollOutcome, PollTick, Poller};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Inputs of one invocation.
pub struct Invocation<'a> {
    pub request: GenerationRequest,
    pub profile: SurfaceProfile,
    /// Text the video was generated from; names the saved file
    pub source_text: String,
    pub note: Option<&'a mut (dyn NoteSurface + 'a)>,
    /// Return right after submit instead of polling
    pub detach: bool,
}

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    Delivered(DeliveryReport),
    /// Submitted without waiting for the result
    Detached(JobHandle),
    NoVideoUrl,
    JobFailed { message: String },
    TimedOut { attempts: u32 },
    Cancelled,
    Failed { stage: Stage, category: ErrorCategory },
}

impl WorkflowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            WorkflowOutcome::Delivered(_) | WorkflowOutcome::Detached(_)
        )
    }
}

/// Forwards poll progress to the notifier.
struct ProgressNotices {
    notifier: Arc<dyn Notifier>,
}

impl PollObserver for ProgressNotices {
    fn on_progress(&self, tick: &PollTick) {
        self.notifier.notify(&Notice::Progress {
            percent: tick.status.progress_percent,
            attempt: tick.attempt,
            attempt_limit: tick.attempt_limit,
        });
    }
}

/// Drives invocations against a gateway.
pub struct GenerationWorkflow {
    gateway: Arc<dyn VideoGateway>,
    poller: Poller,
    handler: ResultHandler,
    notifier: Arc<dyn Notifier>,
}

impl GenerationWorkflow {
    pub fn new(
        gateway: Arc<dyn VideoGateway>,
        store: Arc<dyn VideoStore>,
        notifier: Arc<dyn Notifier>,
        poll: PollConfig,
        output: crate::config::OutputConfig,
    ) -> Self {
        Self {
            poller: Poller::new(gateway.clone(), poll),
            handler: ResultHandler::new(gateway.clone(), store, output),
            gateway,
            notifier,
        }
    }

    fn notify(&self, notice: Notice) {
        self.notifier.notify(&notice);
    }

    fn fail(&self, stage: Stage, error: &dyn std::error::Error) -> WorkflowOutcome {
        let category = classify::classify_error(error);
        tracing::warn!(
            stage = ?stage,
            category = category.as_str(),
            error = %error,
            "Invocation failed"
        );
        self.notify(Notice::Failed {
            stage,
            category: category.clone(),
        });
        WorkflowOutcome::Failed { stage, category }
    }

    /// Run one invocation to completion. `cancel` is the owning surface's teardown signal.
    pub async fn run(
        &self,
        invocation: Invocation<'_>,
        cancel: &CancellationToken,
    ) -> WorkflowOutcome {
        let Invocation {
            request,
            profile,
            source_text,
            mut note,
            detach,
        } = invocation;
        let started = Instant::now();

        self.notify(Notice::Submitting {
            model: request.model.clone().unwrap_or_default(),
        });

        let submission = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.notify(Notice::Cancelled);
                return WorkflowOutcome::Cancelled;
            }
            result = self.gateway.submit(request) => result,
        };
        let submission = match submission {
            Ok(submission) => submission,
            Err(e) => {
                if !hold_for(&profile, started, cancel).await {
                    self.notify(Notice::Cancelled);
                    return WorkflowOutcome::Cancelled;
                }
                return self.fail(Stage::Submit, &e);
            }
        };

        let job = match submission.job_handle() {
            Ok(job) => job,
            Err(e) => {
                if profile.accept_immediate_url
                    && extract::find_video_url(&submission.body, UrlValidity::Strict).is_some()
                {
                    tracing::info!("Submit returned a video URL directly");
                    return self
                        .deliver(&submission.body, &profile, &source_text, note.as_deref_mut())
                        .await;
                }
                if !hold_for(&profile, started, cancel).await {
                    self.notify(Notice::Cancelled);
                    return WorkflowOutcome::Cancelled;
                }
                return self.fail(Stage::Submit, &e);
            }
        };

        tracing::info!(task_id = %job.task_id, surface = %profile.surface, "Job accepted");
        self.notify(Notice::Submitted {
            task_id: job.task_id.clone(),
        });
        if detach {
            return WorkflowOutcome::Detached(job);
        }

        let handle = self.poller.start(
            self.poller.session(job.task_id, submission.base_url),
            Arc::new(ProgressNotices {
                notifier: self.notifier.clone(),
            }),
            cancel.clone(),
        );
        let outcome = handle.outcome().await;

        let cancelled = matches!(outcome, PollOutcome::Cancelled);
        if !cancelled && !hold_for(&profile, started, cancel).await {
            self.notify(Notice::Cancelled);
            return WorkflowOutcome::Cancelled;
        }

        match outcome {
            PollOutcome::Succeeded(status) => {
                self.deliver(&status.payload, &profile, &source_text, note.as_deref_mut())
                    .await
            }
            PollOutcome::Failed(PollFailure::Job { message }) => {
                self.notify(Notice::JobFailed {
                    message: message.clone(),
                });
                WorkflowOutcome::JobFailed { message }
            }
            PollOutcome::Failed(PollFailure::Fetch(e)) => self.fail(Stage::Poll, &e),
            PollOutcome::TimedOut { attempts } => {
                self.notify(Notice::TimedOut { attempts });
                WorkflowOutcome::TimedOut { attempts }
            }
            PollOutcome::Cancelled => {
                self.notify(Notice::Cancelled);
                WorkflowOutcome::Cancelled
            }
        }
    }

    async fn deliver(
        &self,
        payload: &Value,
        profile: &SurfaceProfile,
        source_text: &str,
        note: Option<&mut (dyn NoteSurface + '_)>,
    ) -> WorkflowOutcome {
        let result = self
            .handler
            .deliver(payload, profile.validity, &profile.plan, source_text, note)
            .await;

        match result {
            Ok(DeliveryOutcome::Delivered(report)) => {
                self.notify(Notice::VideoReady {
                    url: report.video_url.clone(),
                });
                if let Some(saved) = &report.saved {
                    self.notify(Notice::Saved {
                        path: saved.path.clone(),
                    });
                }
                for step in report.steps.iter().filter(|s| s.is_insert()) {
                    self.notify(Notice::Inserted { step: *step });
                }
                WorkflowOutcome::Delivered(report)
            }
            Ok(DeliveryOutcome::NoVideoUrl { payload }) => {
                self.notify(Notice::NoVideoUrl {
                    payload: payload.to_string(),
                });
                WorkflowOutcome::NoVideoUrl
            }
            Err(failure) => self.delivery_failed(failure),
        }
    }

    fn delivery_failed(&self, failure: DeliveryFailure) -> WorkflowOutcome {
        if failure.inserted_before_failure() && failure.failed_step == DeliveryStep::Download {
            self.notify(Notice::PartiallyDelivered {
                failed_step: failure.failed_step,
            });
        }
        self.fail(Stage::Deliver, &failure)
    }
}

/// Hold a terminal result until the profile's minimum display time after
/// `started` has passed. False when cancelled first.
async fn hold_for(profile: &SurfaceProfile, started: Instant, cancel: &CancellationToken) -> bool {
    match profile.min_display {
        Some(min) => hold_until(started + min, cancel).await,
        None => true,
    }
}

/// Sleep until `deadline`. False when cancelled first.
async fn hold_until(deadline: Instant, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep_until(deadline) => true,
    }
}
