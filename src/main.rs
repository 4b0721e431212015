use clap::Parser;
use vidnote::cli::{
    config, generate, handle_completions, hosts, load_config, models, status, Cli, Commands,
    ConfigCommands, HostsCommands, ModelsCommands,
};
use vidnote::config::{SettingsStore, VidnoteConfig};
use std::path::Path;

type CommandResult = Result<String, Box<dyn std::error::Error>>;

/// Load the effective configuration and install the subscriber it describes.
fn prepare(path: &Path) -> Result<VidnoteConfig, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    if let Err(e) = vidnote::logging::init_tracing(&config.logging) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
    Ok(config)
}

fn open_store(path: &Path) -> Result<SettingsStore, Box<dyn std::error::Error>> {
    let config = prepare(path)?;
    tracing::debug!(hosts = config.api.hosts.len(), "Opening settings store");
    Ok(SettingsStore::open(path)?)
}

async fn run(cli: Cli) -> CommandResult {
    let path = cli.config.as_path();
    match cli.command {
        Commands::Generate(args) => generate::handle_generate(&args, prepare(path)?).await,
        Commands::Status(args) => status::handle_status(&args, prepare(path)?).await,
        Commands::Hosts(cmd) => match cmd {
            HostsCommands::List(args) => hosts::handle_hosts_list(&args, &prepare(path)?),
            HostsCommands::Add(args) => hosts::handle_hosts_add(&args, &mut open_store(path)?),
            HostsCommands::Remove(args) => {
                hosts::handle_hosts_remove(&args, &mut open_store(path)?)
            }
            HostsCommands::Select(args) => {
                hosts::handle_hosts_select(&args, &mut open_store(path)?)
            }
            HostsCommands::Enable(args) => {
                hosts::handle_hosts_set_enabled(&args, true, &mut open_store(path)?)
            }
            HostsCommands::Disable(args) => {
                hosts::handle_hosts_set_enabled(&args, false, &mut open_store(path)?)
            }
            HostsCommands::Test(args) => hosts::handle_hosts_test(&args, prepare(path)?).await,
        },
        Commands::Models(cmd) => match cmd {
            ModelsCommands::List(args) => models::handle_models_list(&args, &prepare(path)?),
            ModelsCommands::Add(args) => models::handle_models_add(&args, &mut open_store(path)?),
            ModelsCommands::Edit(args) => {
                models::handle_models_edit(&args, &mut open_store(path)?)
            }
            ModelsCommands::Remove(args) => {
                models::handle_models_remove(&args, &mut open_store(path)?)
            }
            ModelsCommands::Enable(args) => {
                models::handle_models_set_enabled(&args, true, &mut open_store(path)?)
            }
            ModelsCommands::Disable(args) => {
                models::handle_models_set_enabled(&args, false, &mut open_store(path)?)
            }
            ModelsCommands::Default(args) => {
                models::handle_models_default(&args, &mut open_store(path)?)
            }
        },
        Commands::Config(cmd) => match cmd {
            // init runs before any file exists, so it skips loading
            ConfigCommands::Init(args) => config::handle_config_init(&args, path),
            ConfigCommands::Show(args) => config::handle_config_show(&args, &prepare(path)?),
            ConfigCommands::SetKey(args) => {
                config::handle_config_set_key(&args, &mut open_store(path)?)
            }
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(String::new())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
