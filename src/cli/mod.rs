//! CLI module for vidnote
//!
//! The terminal acts as the host application: a Markdown file is the note,
//! notices go to stderr and command output to stdout.
//!
//! # Commands
//!
//! - `generate` - Submit a prompt, poll, and deliver the video into a note
//! - `status` - Fetch the status of a task once
//! - `hosts` - Manage the API host catalog
//! - `models` - Manage the model catalog
//! - `config` - Configuration utilities (init, show, set-key)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Replace a line of a note with the generated video
//! vidnote generate "a paper boat in the rain" --note notes/today.md --from-note-selection
//!
//! # Generate from the sidebar profile and insert a link at the cursor
//! vidnote generate "sunrise timelapse" --surface sidebar --insert --note notes/today.md
//!
//! # Generate shell completions
//! vidnote completions bash > ~/.bash_completion.d/vidnote
//! ```

pub mod completions;
pub mod config;
pub mod generate;
pub mod hosts;
pub mod models;
pub mod output;
pub mod status;

pub use completions::handle_completions;

use crate::config::{ConfigError, VidnoteConfig};
use crate::workflow::Surface;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// vidnote - AI video generation for Markdown notes
#[derive(Parser, Debug)]
#[command(
    name = "vidnote",
    version,
    about = "Generate AI videos from note text and embed them into Markdown notes"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = "vidnote.toml",
        env = "VIDNOTE_CONFIG"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a video and deliver it
    Generate(GenerateArgs),
    /// Show the status of a task
    Status(StatusArgs),
    /// Manage API hosts
    #[command(subcommand)]
    Hosts(HostsCommands),
    /// Manage the model catalog
    #[command(subcommand)]
    Models(ModelsCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Text prompt describing the video
    pub prompt: String,

    /// Select the prompt text inside the note so the embed replaces it
    #[arg(long, requires = "note")]
    pub from_note_selection: bool,

    /// Reference image URL for image-to-video
    #[arg(short, long)]
    pub image: Option<String>,

    /// Model API value (defaults to [generation] default_model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Aspect ratio (16:9, 9:16, 1:1)
    #[arg(short, long)]
    pub aspect_ratio: Option<String>,

    /// Duration in seconds
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// Output size (small, large)
    #[arg(short, long)]
    pub size: Option<String>,

    /// Markdown note the result is delivered next to / into
    #[arg(short, long)]
    pub note: Option<PathBuf>,

    /// Invocation surface profile (command, modal, sidebar)
    #[arg(long, default_value = "command")]
    pub surface: Surface,

    /// Download the video (modal and sidebar surfaces)
    #[arg(long)]
    pub download: bool,

    /// Insert the video into the note (modal and sidebar surfaces)
    #[arg(long)]
    pub insert: bool,

    /// Print the task id and exit without polling
    #[arg(long)]
    pub no_wait: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Task id returned by submit
    pub task_id: String,

    /// Query this host instead of the selected one
    #[arg(long)]
    pub host: Option<String>,

    /// Output the raw status payload as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum HostsCommands {
    /// List configured hosts
    List(ListArgs),
    /// Add a custom host
    Add(HostsAddArgs),
    /// Remove a custom host
    Remove(IdArgs),
    /// Select the host used for new jobs
    Select(IdArgs),
    /// Enable a host
    Enable(IdArgs),
    /// Disable a host
    Disable(IdArgs),
    /// Send a probe job to a host (may be billed)
    Test(HostsTestArgs),
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommands {
    /// List the model catalog
    List(ListArgs),
    /// Add a custom model
    Add(ModelsAddArgs),
    /// Edit a custom model
    Edit(ModelsEditArgs),
    /// Remove a custom model
    Remove(IdArgs),
    /// Enable a model
    Enable(IdArgs),
    /// Disable a model
    Disable(IdArgs),
    /// Set the default model (by id or API value)
    Default(IdArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args, Debug)]
pub struct HostsAddArgs {
    /// Display name
    pub name: String,

    /// Base URL (e.g., https://api.example.com)
    pub url: String,

    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct HostsTestArgs {
    /// Host id (defaults to the selected host)
    pub id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ModelsAddArgs {
    /// Display name
    pub name: String,

    /// Value sent as `model` in requests
    pub value: String,

    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct ModelsEditArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub value: Option<String>,

    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
    /// Print the effective configuration (API key masked)
    Show(ListArgs),
    /// Store the API key in the configuration file
    SetKey(SetKeyArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path (defaults to --config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SetKeyArgs {
    pub key: String,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Effective configuration: file (when present) merged over defaults, then
/// `VIDNOTE_*` environment overrides, then validation.
pub fn load_config(path: &Path) -> Result<VidnoteConfig, ConfigError> {
    let config = if path.exists() {
        VidnoteConfig::load(Some(path))?
    } else {
        VidnoteConfig::default()
    };
    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}
