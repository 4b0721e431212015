//! Unit tests for the poll module.

use super::*;
use crate::api::mock::ScriptedGateway;
use serde_json::json;
use std::sync::Mutex;
use std::time::Instant;

fn poller(gateway: Arc<ScriptedGateway>, interval_ms: u64, attempt_limit: u32) -> Poller {
    Poller::new(
        gateway,
        PollConfig {
            interval: Duration::from_millis(interval_ms),
            attempt_limit,
        },
    )
}

#[derive(Default)]
struct RecordingObserver {
    ticks: Mutex<Vec<PollTick>>,
}

impl PollObserver for RecordingObserver {
    fn on_progress(&self, tick: &PollTick) {
        self.ticks.lock().unwrap().push(tick.clone());
    }
}

// ============================================================================
// JobStatus
// ============================================================================

#[test]
fn test_status_success_states() {
    for state in ["succeeded", "completed", "success"] {
        let status = JobStatus::from_payload(json!({"status": state}));
        assert_eq!(status.verdict(), Verdict::Succeeded, "{}", state);
    }
}

#[test]
fn test_status_progress_100_succeeds_without_state() {
    let status = JobStatus::from_payload(json!({"progress": 100}));
    assert_eq!(status.verdict(), Verdict::Succeeded);

    let status = JobStatus::from_payload(json!({"progress": 100.0, "status": "running"}));
    assert_eq!(status.verdict(), Verdict::Succeeded);
}

#[test]
fn test_status_failure_message_order() {
    let status = JobStatus::from_payload(json!({
        "status": "failed",
        "error": "second",
        "failure_reason": "first"
    }));
    assert_eq!(
        status.verdict(),
        Verdict::Failed {
            message: "first".to_string()
        }
    );

    let status = JobStatus::from_payload(json!({"state": "error", "message": "third"}));
    assert_eq!(
        status.verdict(),
        Verdict::Failed {
            message: "third".to_string()
        }
    );

    let status = JobStatus::from_payload(json!({"task_status": "failed", "failure_reason": ""}));
    assert_eq!(
        status.verdict(),
        Verdict::Failed {
            message: "unknown error".to_string()
        }
    );
}

#[test]
fn test_status_state_field_priority() {
    let status = JobStatus::from_payload(json!({
        "status": "running",
        "state": "failed",
        "task_status": "success"
    }));
    assert_eq!(status.state, Some(JobState::Running));
    assert_eq!(status.verdict(), Verdict::InProgress);
}

#[test]
fn test_status_progress_defaults_to_zero() {
    let status = JobStatus::from_payload(json!({"status": "running", "progress": "50"}));
    assert_eq!(status.progress_percent, 0.0);
    let status = JobStatus::from_payload(json!({}));
    assert_eq!(status.progress_percent, 0.0);
    assert_eq!(status.state, None);
    assert_eq!(status.verdict(), Verdict::InProgress);
}

#[test]
fn test_status_state_is_case_sensitive() {
    let status = JobStatus::from_payload(json!({"status": "SUCCEEDED"}));
    assert_eq!(status.state, Some(JobState::Other("SUCCEEDED".to_string())));
    assert_eq!(status.verdict(), Verdict::InProgress);
}

#[test]
fn test_status_captures_strict_video_url() {
    let status = JobStatus::from_payload(json!({
        "status": "succeeded",
        "results": [{"url": "https://cdn.example.com/v.mp4"}]
    }));
    assert_eq!(
        status.terminal_video_url.as_deref(),
        Some("https://cdn.example.com/v.mp4")
    );
}

#[test]
fn test_session_attempt_budget() {
    let mut session = PollSession::new("t", "https://h", 2, Duration::from_millis(10));
    assert!(session.next_attempt());
    assert!(session.next_attempt());
    assert!(!session.next_attempt());
    assert_eq!(session.attempt_count, 3);
}

#[test]
fn test_poll_config_from_settings() {
    let config = PollConfig::default();
    assert_eq!(config.interval, Duration::from_millis(2000));
    assert_eq!(config.attempt_limit, 150);
}

// ============================================================================
// Poller
// ============================================================================

#[tokio::test]
async fn test_poll_until_succeeded() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_status(json!({"status": "running", "progress": 10}))
            .with_status(json!({"status": "running", "progress": 60}))
            .with_status(json!({"status": "succeeded", "video_url": "https://x/v.mp4"})),
    );
    let observer = RecordingObserver::default();
    let poller = poller(gateway.clone(), 10, 10);

    let outcome = poller
        .run(
            poller.session("task-1", "https://h"),
            &observer,
            &CancellationToken::new(),
        )
        .await;

    match outcome {
        PollOutcome::Succeeded(status) => {
            assert_eq!(status.terminal_video_url.as_deref(), Some("https://x/v.mp4"))
        }
        other => panic!("expected success, got {:?}", other),
    }
    assert_eq!(gateway.fetch_count(), 3);

    let ticks = observer.ticks.lock().unwrap();
    assert_eq!(ticks.len(), 2);
    assert_eq!(ticks[0].attempt, 1);
    assert_eq!(ticks[1].status.progress_percent, 60.0);
    assert_eq!(ticks[1].attempt_limit, 10);
}

#[tokio::test]
async fn test_poll_job_failure_stops_session() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_status(json!({"status": "failed", "failure_reason": "content policy"})),
    );
    let poller = poller(gateway.clone(), 10, 10);

    let outcome = poller
        .run(
            poller.session("task-1", "https://h"),
            &SilentObserver,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(
        outcome,
        PollOutcome::Failed(PollFailure::Job {
            message: "content policy".to_string()
        })
    );
    assert_eq!(gateway.fetch_count(), 1);
}

#[tokio::test]
async fn test_poll_fetch_error_is_not_retried() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_status(json!({"status": "running"}))
            .with_status_error(ApiError::Transport {
                status: 500,
                body: "boom".to_string(),
            })
            .with_status(json!({"status": "succeeded"})),
    );
    let poller = poller(gateway.clone(), 10, 10);

    let outcome = poller
        .run(
            poller.session("task-1", "https://h"),
            &SilentObserver,
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(
        outcome,
        PollOutcome::Failed(PollFailure::Fetch(ApiError::Transport { status: 500, .. }))
    ));
    assert_eq!(gateway.fetch_count(), 2);
}

#[tokio::test]
async fn test_poll_times_out_after_exactly_limit_fetches() {
    let gateway = Arc::new(ScriptedGateway::new().with_status(json!({"status": "running"})));
    let poller = poller(gateway.clone(), 5, 3);

    let outcome = poller
        .run(
            poller.session("task-1", "https://h"),
            &SilentObserver,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(outcome, PollOutcome::TimedOut { attempts: 3 });
    assert_eq!(gateway.fetch_count(), 3);
}

#[tokio::test]
async fn test_poll_zero_interval_is_clamped() {
    let gateway = Arc::new(ScriptedGateway::new().with_status(json!({"status": "running"})));
    let poller = poller(gateway.clone(), 0, 2);
    assert_eq!(poller.config().interval, MIN_POLL_INTERVAL);

    let outcome = poller
        .run(
            poller.session("task-1", "https://h"),
            &SilentObserver,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(outcome, PollOutcome::TimedOut { attempts: 2 });
    assert_eq!(gateway.fetch_count(), 2);
}

#[tokio::test]
async fn test_poll_first_fetch_waits_one_interval() {
    let gateway = Arc::new(ScriptedGateway::new().with_status(json!({"status": "succeeded"})));
    let poller = poller(gateway.clone(), 80, 5);

    let started = Instant::now();
    let outcome = poller
        .run(
            poller.session("task-1", "https://h"),
            &SilentObserver,
            &CancellationToken::new(),
        )
        .await;

    assert!(outcome.is_terminal_success());
    let first = gateway.fetch_times.lock().unwrap()[0];
    assert!(first.duration_since(started) >= Duration::from_millis(80));
}

#[tokio::test]
async fn test_poll_fetches_are_spaced_by_interval() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_status(json!({"status": "running"}))
            .with_status(json!({"status": "running"}))
            .with_status(json!({"status": "completed"})),
    );
    let poller = poller(gateway.clone(), 40, 5);

    poller
        .run(
            poller.session("task-1", "https://h"),
            &SilentObserver,
            &CancellationToken::new(),
        )
        .await;

    let times = gateway.fetch_times.lock().unwrap();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        // Timer granularity allows a few ms of early wake-up
        assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(35));
    }
}

#[tokio::test]
async fn test_poll_cancel_before_first_tick() {
    let gateway = Arc::new(ScriptedGateway::new());
    let poller = poller(gateway.clone(), 1000, 5);

    let handle = poller.start(
        poller.session("task-1", "https://h"),
        Arc::new(SilentObserver),
        CancellationToken::new(),
    );
    handle.stop();

    assert_eq!(handle.outcome().await, PollOutcome::Cancelled);
    assert_eq!(gateway.fetch_count(), 0);
}

#[tokio::test]
async fn test_poll_cancel_during_fetch() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .with_status(json!({"status": "succeeded"}))
            .with_fetch_delay(Duration::from_secs(5)),
    );
    let poller = poller(gateway.clone(), 10, 5);
    let parent = CancellationToken::new();

    let handle = poller.start(
        poller.session("task-1", "https://h"),
        Arc::new(SilentObserver),
        parent.clone(),
    );

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(gateway.fetch_count(), 1);

    // Surface teardown cancels the parent token
    parent.cancel();
    let outcome = tokio::time::timeout(Duration::from_secs(1), handle.outcome())
        .await
        .expect("cancellation should not wait for the fetch");
    assert_eq!(outcome, PollOutcome::Cancelled);
}

#[tokio::test]
async fn test_poll_stop_does_not_cancel_parent() {
    let gateway = Arc::new(ScriptedGateway::new());
    let poller = poller(gateway, 1000, 5);
    let parent = CancellationToken::new();

    let handle = poller.start(
        poller.session("task-1", "https://h"),
        Arc::new(SilentObserver),
        parent.clone(),
    );
    handle.stop();
    handle.outcome().await;

    assert!(!parent.is_cancelled());
}
