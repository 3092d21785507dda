//! Target process lifecycle: terminate running instances, relaunch.
//!
//! Restarting is best effort. Nothing here reports failure to a caller;
//! outcomes are logged and returned only for observation.

pub mod scheduler;

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::settings::TargetSettings;

pub use scheduler::{RestartScheduler, RestartTicket, TokioRestartScheduler};

/// OS process primitives needed for a restart.
pub trait ProcessControl: Send + Sync {
    /// Ask every process named `name` to terminate.
    fn terminate(&self, name: &str) -> io::Result<()>;

    /// Start `executable` without waiting on it.
    fn launch_detached(&self, executable: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessControl;

impl ProcessControl for SystemProcessControl {
    #[cfg(windows)]
    fn terminate(&self, name: &str) -> io::Result<()> {
        let image = crate::config::schema::with_exe_suffix(name);
        run_quiet(Command::new("taskkill").args(["/F", "/IM", image.as_str()]))
    }

    #[cfg(not(windows))]
    fn terminate(&self, name: &str) -> io::Result<()> {
        run_quiet(Command::new("pkill").args(["-x", name]))
    }

    fn launch_detached(&self, executable: &Path) -> io::Result<()> {
        let mut command = Command::new(executable);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if let Some(dir) = executable.parent() {
            command.current_dir(dir);
        }
        let mut child = command.spawn()?;
        // Reap only; the relaunched process is not monitored.
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(())
    }
}

fn run_quiet(command: &mut Command) -> io::Result<()> {
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("exited with {status}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Relaunched,
    /// The install location could not be read; nothing was launched.
    InstallUnresolved,
    ExecutableMissing,
    LaunchFailed,
}

#[derive(Clone)]
pub struct RestartController {
    settings: TargetSettings,
    control: Arc<dyn ProcessControl>,
}

impl std::fmt::Debug for RestartController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestartController")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RestartController {
    pub fn new(settings: TargetSettings, control: Arc<dyn ProcessControl>) -> Self {
        Self { settings, control }
    }

    /// Terminate every configured process, re-read the install location,
    /// and relaunch the executable found there.
    pub fn restart_blocking(&self) -> RestartOutcome {
        let profile = self.settings.profile();
        for name in &profile.process_names {
            match self.control.terminate(name) {
                Ok(()) => debug!(process = %name, "terminate requested"),
                Err(e) => debug!(process = %name, error = %e, "terminate skipped"),
            }
        }

        let install = match self.settings.read_install_location() {
            Ok(install) => install,
            Err(e) => {
                warn!(error = %e, "install location unresolved; not relaunching");
                return RestartOutcome::InstallUnresolved;
            }
        };

        let executable = profile.executable_path(&install);
        if !executable.is_file() {
            warn!(path = %executable.display(), "target executable missing; not relaunching");
            return RestartOutcome::ExecutableMissing;
        }

        match self.control.launch_detached(&executable) {
            Ok(()) => {
                info!(path = %executable.display(), "target relaunched");
                RestartOutcome::Relaunched
            }
            Err(e) => {
                warn!(path = %executable.display(), error = %e, "relaunch failed");
                RestartOutcome::LaunchFailed
            }
        }
    }
}
