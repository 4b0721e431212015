//! Invocation surfaces and their delivery profiles.

use crate::deliver::DeliveryStep;
use crate::extract::UrlValidity;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Where a generation was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    /// Context-menu command on selected text
    #[default]
    Command,
    /// Dialog with download and insert actions
    Modal,
    /// Persistent side panel
    Sidebar,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Command => "command",
            Surface::Modal => "modal",
            Surface::Sidebar => "sidebar",
        }
    }

    /// Whether the user picks download/insert actions on this surface.
    pub fn takes_actions(&self) -> bool {
        !matches!(self, Surface::Command)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" => Ok(Surface::Command),
            "modal" => Ok(Surface::Modal),
            "sidebar" => Ok(Surface::Sidebar),
            _ => Err(format!(
                "Unknown surface: {}. Expected command, modal or sidebar",
                s
            )),
        }
    }
}

/// Result actions the user asked for on the modal and sidebar surfaces.
/// The command surface always downloads and embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Actions {
    pub download: bool,
    pub insert: bool,
}

/// How a surface handles a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProfile {
    pub surface: Surface,
    pub validity: UrlValidity,
    pub plan: Vec<DeliveryStep>,
    /// Terminal results are held back until this long after submit
    pub min_display: Option<Duration>,
    /// Accept a video URL returned directly by submit when it carries no task id
    pub accept_immediate_url: bool,
}

impl SurfaceProfile {
    pub fn new(surface: Surface, actions: Actions, min_display: Duration) -> Self {
        match surface {
            Surface::Command => Self {
                surface,
                validity: UrlValidity::Loose,
                plan: vec![DeliveryStep::Download, DeliveryStep::InsertEmbed],
                min_display: None,
                accept_immediate_url: false,
            },
            Surface::Modal => {
                let plan = match (actions.download, actions.insert) {
                    (_, true) => vec![DeliveryStep::Download, DeliveryStep::InsertEmbed],
                    (true, false) => vec![DeliveryStep::Download],
                    (false, false) => Vec::new(),
                };
                Self {
                    surface,
                    validity: UrlValidity::Strict,
                    plan,
                    min_display: Some(min_display),
                    accept_immediate_url: false,
                }
            }
            Surface::Sidebar => {
                let plan = match (actions.download, actions.insert) {
                    (true, true) => vec![DeliveryStep::InsertLink, DeliveryStep::Download],
                    (false, true) => vec![DeliveryStep::InsertLink],
                    (true, false) => vec![DeliveryStep::Download],
                    (false, false) => Vec::new(),
                };
                Self {
                    surface,
                    validity: UrlValidity::Strict,
                    plan,
                    min_display: None,
                    accept_immediate_url: true,
                }
            }
        }
    }

    pub fn needs_note(&self) -> bool {
        self.plan.iter().any(DeliveryStep::is_insert)
    }
}
