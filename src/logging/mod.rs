//! Tracing setup and structured log field helpers.

pub mod fields;

pub use fields::{mask_secret, prompt_preview};

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build filter directives string from LoggingConfig
///
/// The base level is followed by one `vidnote::<component>=<level>` directive per
/// configured component, sorted by component name.
///
/// # Examples
///
/// ```
/// use vidnote::config::LoggingConfig;
/// use vidnote::logging::build_filter_directives;
/// use std::collections::HashMap;
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     component_levels: Some(HashMap::from([("poll".to_string(), "debug".to_string())])),
///     ..LoggingConfig::default()
/// };
///
/// assert_eq!(build_filter_directives(&config), "info,vidnote::poll=debug");
/// ```
pub fn build_filter_directives(config: &LoggingConfig) -> String {
    let mut filter_str = config.level.clone();

    if let Some(component_levels) = &config.component_levels {
        let mut components: Vec<_> = component_levels.iter().collect();
        components.sort();
        for (component, level) in components {
            filter_str.push_str(&format!(",vidnote::{}={}", component, level));
        }
    }

    filter_str
}

/// Install the global subscriber. Logs go to stderr; stdout carries command output.
///
/// `RUST_LOG` takes precedence over the configured directives.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter_str = build_filter_directives(config);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    if config.log_payloads {
        eprintln!("WARNING: Payload logging is enabled. Prompts and download URLs will be logged.");
    }

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_filter_base_level_only() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_components_sorted() {
        let config = LoggingConfig {
            level: "info".to_string(),
            component_levels: Some(HashMap::from([
                ("poll".to_string(), "trace".to_string()),
                ("api".to_string(), "debug".to_string()),
            ])),
            ..LoggingConfig::default()
        };
        assert_eq!(
            build_filter_directives(&config),
            "info,vidnote::api=debug,vidnote::poll=trace"
        );
    }

    #[test]
    fn test_filter_parses_as_env_filter() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            component_levels: Some(HashMap::from([(
                "workflow".to_string(),
                "info".to_string(),
            )])),
            ..LoggingConfig::default()
        };
        assert!(EnvFilter::try_new(build_filter_directives(&config)).is_ok());
    }
}
