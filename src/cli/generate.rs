//! Generate command implementation

use crate::api::{ApiClient, GenerationRequest};
use crate::cli::output::TerminalNotifier;
use crate::cli::GenerateArgs;
use crate::config::VidnoteConfig;
use crate::deliver::{FolderStore, MarkdownNote, NoteSurface};
use crate::poll::PollConfig;
use crate::workflow::{
    Actions, GenerationWorkflow, Invocation, LogNotifier, Notifier, SurfaceProfile, WorkflowOutcome,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Build the request from CLI flags over the configured defaults.
pub fn build_request(args: &GenerateArgs, config: &VidnoteConfig) -> GenerationRequest {
    let mut request = GenerationRequest::with_defaults(&args.prompt, &config.generation);
    if let Some(model) = &args.model {
        request = request.model(model);
    }
    if let Some(image) = &args.image {
        request = request.reference_url(image);
    }
    if let Some(ratio) = &args.aspect_ratio {
        request = request.aspect_ratio(ratio);
    }
    if let Some(duration) = args.duration {
        request = request.duration_seconds(duration);
    }
    if let Some(size) = &args.size {
        request = request.size(size);
    }
    request
}

/// Request values missing from the configured option lists. The upstream may still
/// accept them, so these only warrant a warning.
pub fn unlisted_options(request: &GenerationRequest, config: &VidnoteConfig) -> Vec<String> {
    let options = &config.generation;
    let mut unlisted = Vec::new();
    if let Some(model) = &request.model {
        if !config.enabled_models().any(|m| &m.value == model) {
            unlisted.push(format!("model {}", model));
        }
    }
    if let Some(ratio) = &request.aspect_ratio {
        if !options.aspect_ratios.contains(ratio) {
            unlisted.push(format!("aspect ratio {}", ratio));
        }
    }
    if let Some(duration) = request.duration_seconds {
        if !options.durations.contains(&duration) {
            unlisted.push(format!("duration {}s", duration));
        }
    }
    if let Some(size) = &request.size {
        if !options.sizes.contains(size) {
            unlisted.push(format!("size {}", size));
        }
    }
    unlisted
}

pub fn build_profile(args: &GenerateArgs, config: &VidnoteConfig) -> SurfaceProfile {
    SurfaceProfile::new(
        args.surface,
        Actions {
            download: args.download,
            insert: args.insert,
        },
        config.polling.min_display(),
    )
}

/// Handle `vidnote generate`
pub async fn handle_generate(
    args: &GenerateArgs,
    config: VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    if args.prompt.trim().is_empty() {
        return Err("Prompt cannot be empty".into());
    }

    if !args.surface.takes_actions() && (args.download || args.insert) {
        tracing::warn!(
            surface = %args.surface,
            "--download/--insert are ignored; the command surface always downloads and embeds"
        );
    }

    let profile = build_profile(args, &config);
    if profile.needs_note() && args.note.is_none() && !args.no_wait {
        return Err(format!(
            "--note is required for the {} surface with insert",
            args.surface
        )
        .into());
    }

    let mut note = match &args.note {
        Some(path) => {
            let mut note = MarkdownNote::open(path).await?;
            if args.from_note_selection {
                note.select(&args.prompt)?;
            }
            Some(note)
        }
        None => None,
    };

    let store = match &args.note {
        Some(path) => FolderStore::beside_note(path, &config.output.folder),
        None => FolderStore::new(&config.output.folder),
    };

    // JSON output keeps stderr quiet; notices still reach the log.
    let notifier: Arc<dyn Notifier> = if args.json {
        Arc::new(LogNotifier)
    } else {
        Arc::new(TerminalNotifier)
    };

    let config = Arc::new(config);
    let gateway = Arc::new(ApiClient::new(config.clone())?);
    let workflow = GenerationWorkflow::new(
        gateway,
        Arc::new(store),
        notifier,
        PollConfig::from(&config.polling),
        config.output.clone(),
    );

    let cancel = CancellationToken::new();
    let teardown = cancel.clone();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl+C, cancelling generation");
            teardown.cancel();
        }
    });

    let request = build_request(args, &config);
    for option in unlisted_options(&request, &config) {
        tracing::warn!(option = %option, "Not in the configured options, sending anyway");
    }

    let invocation = Invocation {
        request,
        profile,
        source_text: args.prompt.clone(),
        note: note.as_mut().map(|n| n as &mut dyn NoteSurface),
        detach: args.no_wait,
    };
    let outcome = workflow.run(invocation, &cancel).await;
    signal.abort();

    let summary = summarize(&outcome, args.json)?;
    if outcome.is_success() {
        Ok(summary)
    } else {
        Err(summary.into())
    }
}

/// One-line (or JSON) summary of an invocation.
pub fn summarize(outcome: &WorkflowOutcome, json: bool) -> Result<String, serde_json::Error> {
    if json {
        let value = match outcome {
            WorkflowOutcome::Delivered(report) => json!({
                "outcome": "delivered",
                "video_url": report.video_url,
                "found_at": report.found_at.to_string(),
                "saved_path": report.saved.as_ref().map(|s| s.path.display().to_string()),
                "steps": report.steps.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
            }),
            WorkflowOutcome::Detached(job) => json!({
                "outcome": "submitted",
                "task_id": job.task_id,
            }),
            WorkflowOutcome::NoVideoUrl => json!({ "outcome": "no_video_url" }),
            WorkflowOutcome::JobFailed { message } => json!({
                "outcome": "job_failed",
                "message": message,
            }),
            WorkflowOutcome::TimedOut { attempts } => json!({
                "outcome": "timed_out",
                "attempts": attempts,
            }),
            WorkflowOutcome::Cancelled => json!({ "outcome": "cancelled" }),
            WorkflowOutcome::Failed { stage, category } => json!({
                "outcome": "failed",
                "stage": stage.to_string(),
                "category": category.as_str(),
                "message": category.user_message(),
            }),
        };
        return serde_json::to_string_pretty(&value);
    }

    Ok(match outcome {
        WorkflowOutcome::Delivered(report) => match &report.saved {
            Some(saved) => format!("✓ {}", saved.path.display()),
            None => format!("✓ {}", report.video_url),
        },
        WorkflowOutcome::Detached(job) => job.task_id.clone(),
        WorkflowOutcome::NoVideoUrl => "Job finished without a video URL".to_string(),
        WorkflowOutcome::JobFailed { message } => format!("Generation failed: {}", message),
        WorkflowOutcome::TimedOut { attempts } => {
            format!("Timed out after {} attempts", attempts)
        }
        WorkflowOutcome::Cancelled => "Cancelled".to_string(),
        WorkflowOutcome::Failed { stage, category } => format!("{}: {}", stage, category),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::classify::ErrorCategory;
    use crate::workflow::Stage;
    use clap::Parser;

    fn parse(args: &[&str]) -> GenerateArgs {
        match Cli::try_parse_from(args).unwrap().command {
            Commands::Generate(args) => args,
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_build_request_uses_config_defaults() {
        let args = parse(&["vidnote", "generate", "a cat"]);
        let request = build_request(&args, &VidnoteConfig::default());
        assert_eq!(request.model.as_deref(), Some("sora-2"));
        assert_eq!(request.aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(request.duration_seconds, Some(10));
        assert!(request.reference_url.is_none());
    }

    #[test]
    fn test_build_request_flag_overrides() {
        let args = parse(&[
            "vidnote",
            "generate",
            "a cat",
            "-m",
            "runway-gen3",
            "-i",
            "https://img/x.png",
            "-s",
            "large",
        ]);
        let request = build_request(&args, &VidnoteConfig::default());
        assert_eq!(request.model.as_deref(), Some("runway-gen3"));
        assert_eq!(request.reference_url.as_deref(), Some("https://img/x.png"));
        assert_eq!(request.size.as_deref(), Some("large"));
    }

    #[test]
    fn test_unlisted_options() {
        let config = VidnoteConfig::default();
        let listed = build_request(&parse(&["vidnote", "generate", "a cat"]), &config);
        assert!(unlisted_options(&listed, &config).is_empty());

        let args = parse(&[
            "vidnote", "generate", "a cat", "-m", "veo-9", "-a", "21:9", "-d", "7",
        ]);
        let unlisted = unlisted_options(&build_request(&args, &config), &config);
        assert_eq!(unlisted, vec!["model veo-9", "aspect ratio 21:9", "duration 7s"]);
    }

    #[tokio::test]
    async fn test_generate_requires_note_for_command_surface() {
        let args = parse(&["vidnote", "generate", "a cat"]);
        let err = handle_generate(&args, VidnoteConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("--note"));
    }

    #[tokio::test]
    async fn test_generate_without_key_fails_before_network() {
        let dir = tempfile::tempdir().unwrap();
        let note = dir.path().join("n.md");
        std::fs::write(&note, "a cat\n").unwrap();
        let note = note.to_string_lossy().to_string();
        let args = parse(&["vidnote", "generate", "a cat", "--note", &note, "--json"]);

        let err = handle_generate(&args, VidnoteConfig::default())
            .await
            .unwrap_err();
        let parsed: serde_json::Value = serde_json::from_str(&err.to_string()).unwrap();
        assert_eq!(parsed["outcome"], "failed");
        assert_eq!(parsed["category"], "authentication");
    }

    #[test]
    fn test_summarize_text() {
        let text = summarize(
            &WorkflowOutcome::Failed {
                stage: Stage::Poll,
                category: ErrorCategory::Network,
            },
            false,
        )
        .unwrap();
        assert!(text.starts_with("Fetching result failed: Network"));
        assert_eq!(
            summarize(&WorkflowOutcome::TimedOut { attempts: 150 }, false).unwrap(),
            "Timed out after 150 attempts"
        );
    }
}
