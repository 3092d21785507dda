//! Session state and its transitions.
//!
//! [`Session`] performs no I/O. [`Session::handle`] maps an input event
//! to a new state plus the commands to run; [`Session::complete`] folds a
//! command's result back in.

use std::path::{Path, PathBuf};

use super::event::{Command, Outcome, SessionEvent};
use crate::error::Error;

pub const READY: &str = "Ready";

/// Install location as discovered at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallLocation {
    Resolved(PathBuf),
    /// Read failed; holds the error text.
    Unresolved(String),
}

impl InstallLocation {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Resolved(path) => Some(path),
            Self::Unresolved(_) => None,
        }
    }

    /// Text shown in the install path slot, for both outcomes.
    pub fn display(&self) -> String {
        match self {
            Self::Resolved(path) => path.display().to_string(),
            Self::Unresolved(message) => format!("Error: {message}"),
        }
    }
}

impl From<Result<PathBuf, Error>> for InstallLocation {
    fn from(result: Result<PathBuf, Error>) -> Self {
        match result {
            Ok(path) => Self::Resolved(path),
            Err(e) => Self::Unresolved(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    manifests: Vec<String>,
    cursor: usize,
    toggle: bool,
    status: String,
    install: InstallLocation,
}

impl Session {
    /// Cursor at the top, toggle on, status [`READY`].
    pub fn new(manifests: Vec<String>, install: InstallLocation) -> Self {
        Self {
            manifests,
            cursor: 0,
            toggle: true,
            status: READY.to_string(),
            install,
        }
    }

    pub fn manifests(&self) -> &[String] {
        &self.manifests
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&str> {
        self.manifests.get(self.cursor).map(String::as_str)
    }

    pub fn toggle(&self) -> bool {
        self.toggle
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn install(&self) -> &InstallLocation {
        &self.install
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::Quit => vec![Command::Quit],
            SessionEvent::MoveUp => {
                self.cursor = self.cursor.saturating_sub(1);
                Vec::new()
            }
            SessionEvent::MoveDown => {
                if let Some(last) = self.manifests.len().checked_sub(1) {
                    self.cursor = (self.cursor + 1).min(last);
                }
                Vec::new()
            }
            SessionEvent::Toggle => {
                // Flipped before the write and never reverted, so the
                // display shows the attempted value even if persisting fails.
                self.toggle = !self.toggle;
                vec![Command::PersistToggle(self.toggle)]
            }
            SessionEvent::Deploy => self.deploy_selected(),
            SessionEvent::Refresh => vec![Command::RefreshCatalog],
        }
    }

    pub fn complete(&mut self, outcome: Outcome) -> Vec<Command> {
        match outcome {
            Outcome::ToggleWritten { enabled, result } => {
                self.status = match result {
                    Ok(()) if enabled => "Toggle enabled".to_string(),
                    Ok(()) => "Toggle disabled".to_string(),
                    Err(message) => format!("Error setting toggle: {message}"),
                };
                Vec::new()
            }
            Outcome::Deployed { manifest, result } => match result {
                Ok(()) => {
                    self.status = format!("Deployed {manifest}, restarting target...");
                    vec![Command::ScheduleRestart]
                }
                Err(message) => {
                    self.status = format!("Error: {message}");
                    Vec::new()
                }
            },
            Outcome::CatalogRefreshed(manifests) => {
                self.manifests = manifests;
                self.cursor = self.cursor.min(self.manifests.len().saturating_sub(1));
                self.status = format!("Found {} manifest(s)", self.manifests.len());
                Vec::new()
            }
        }
    }

    fn deploy_selected(&mut self) -> Vec<Command> {
        let Some(manifest) = self.manifests.get(self.cursor).cloned() else {
            return Vec::new();
        };
        match &self.install {
            InstallLocation::Resolved(install) => vec![Command::Deploy {
                manifest,
                install: install.clone(),
            }],
            InstallLocation::Unresolved(_) => {
                self.status = format!("Error: {}", Error::not_found("install location"));
                Vec::new()
            }
        }
    }
}
