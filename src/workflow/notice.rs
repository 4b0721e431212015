//! User-facing notifications.

use crate::classify::ErrorCategory;
use crate::deliver::DeliveryStep;
use std::fmt;
use std::path::PathBuf;

/// Severity, used by hosts for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Which part of the chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Submit,
    Poll,
    Deliver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Submit => write!(f, "Generation failed"),
            Stage::Poll => write!(f, "Fetching result failed"),
            Stage::Deliver => write!(f, "Delivering video failed"),
        }
    }
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Submitting { model: String },
    Submitted { task_id: String },
    Progress { percent: f64, attempt: u32, attempt_limit: u32 },
    VideoReady { url: String },
    Saved { path: PathBuf },
    Inserted { step: DeliveryStep },
    /// Job succeeded without a usable URL; the payload is shown for debugging
    NoVideoUrl { payload: String },
    JobFailed { message: String },
    TimedOut { attempts: u32 },
    Cancelled,
    Failed { stage: Stage, category: ErrorCategory },
    /// A later step failed after the note was already edited
    PartiallyDelivered { failed_step: DeliveryStep },
}

impl Notice {
    pub fn level(&self) -> NoticeLevel {
        match self {
            Notice::Submitting { .. } | Notice::Submitted { .. } | Notice::Progress { .. } => {
                NoticeLevel::Info
            }
            Notice::VideoReady { .. } | Notice::Saved { .. } | Notice::Inserted { .. } => {
                NoticeLevel::Success
            }
            Notice::NoVideoUrl { .. }
            | Notice::TimedOut { .. }
            | Notice::Cancelled
            | Notice::PartiallyDelivered { .. } => NoticeLevel::Warning,
            Notice::JobFailed { .. } | Notice::Failed { .. } => NoticeLevel::Error,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Submitting { model } => write!(f, "Submitting generation job ({})...", model),
            Notice::Submitted { task_id } => write!(f, "Job submitted, task id: {}", task_id),
            Notice::Progress {
                percent,
                attempt,
                attempt_limit,
            } => {
                if *percent > 0.0 {
                    write!(f, "Progress: {}% ({}/{})", percent, attempt, attempt_limit)
                } else {
                    write!(f, "Generating video... ({}/{})", attempt, attempt_limit)
                }
            }
            Notice::VideoReady { url } => write!(f, "Video generated: {}", url),
            Notice::Saved { path } => write!(f, "Video downloaded to: {}", path.display()),
            Notice::Inserted { step } => match step {
                DeliveryStep::InsertLink => write!(f, "Video link inserted into note"),
                _ => write!(f, "Video embedded into note"),
            },
            Notice::NoVideoUrl { payload } => write!(
                f,
                "Video generated, but no video URL was found in the response: {}",
                payload
            ),
            Notice::JobFailed { message } => write!(f, "Generation failed: {}", message),
            Notice::TimedOut { attempts } => write!(
                f,
                "Polling timed out after {} attempts, check the result again later",
                attempts
            ),
            Notice::Cancelled => write!(f, "Generation cancelled"),
            Notice::Failed { stage, category } => write!(f, "{}: {}", stage, category),
            Notice::PartiallyDelivered { failed_step } => write!(
                f,
                "Video {} failed, but the link was already inserted into the note",
                failed_step
            ),
        }
    }
}

/// Transient-notification surface of the host.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level() {
            NoticeLevel::Error => tracing::error!(notice = %notice, "Notice"),
            NoticeLevel::Warning => tracing::warn!(notice = %notice, "Notice"),
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!(notice = %notice, "Notice"),
        }
    }
}
