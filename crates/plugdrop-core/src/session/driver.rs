//! Executes session commands against the real components.

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::debug;

use super::event::{Command, Outcome, SessionEvent};
use super::state::{InstallLocation, Session};
use crate::deploy::Deployer;
use crate::process::RestartScheduler;
use crate::settings::TargetSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running; the caller redraws.
    Continue,
    Quit,
}

pub struct SessionDriver {
    session: Session,
    settings: TargetSettings,
    deployer: Deployer,
    restarts: Arc<dyn RestartScheduler>,
}

impl SessionDriver {
    /// Read the install location and list the catalog once, then build
    /// the initial session.
    pub fn start(
        settings: TargetSettings,
        deployer: Deployer,
        restarts: Arc<dyn RestartScheduler>,
    ) -> Self {
        let install = InstallLocation::from(settings.read_install_location());
        let manifests = deployer.catalog().list();
        debug!(
            manifests = manifests.len(),
            install = %install.display(),
            "session started"
        );
        Self {
            session: Session::new(manifests, install),
            settings,
            deployer,
            restarts,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one event and run every command it leads to. Only the
    /// restart runs in the background; everything else has finished by
    /// the time this returns.
    pub fn dispatch(&mut self, event: SessionEvent) -> Flow {
        let mut queue: VecDeque<Command> = self.session.handle(event).into();

        while let Some(command) = queue.pop_front() {
            let outcome = match command {
                Command::Quit => return Flow::Quit,
                Command::ScheduleRestart => {
                    self.restarts.schedule();
                    continue;
                }
                Command::PersistToggle(enabled) => Outcome::ToggleWritten {
                    enabled,
                    result: self
                        .settings
                        .write_toggle(enabled)
                        .map_err(|e| e.to_string()),
                },
                Command::Deploy { manifest, install } => {
                    let result = self
                        .deployer
                        .deploy(&manifest, &install)
                        .map(|_| ())
                        .map_err(|e| e.to_string());
                    Outcome::Deployed { manifest, result }
                }
                Command::RefreshCatalog => {
                    Outcome::CatalogRefreshed(self.deployer.catalog().list())
                }
            };
            queue.extend(self.session.complete(outcome));
        }

        Flow::Continue
    }
}
