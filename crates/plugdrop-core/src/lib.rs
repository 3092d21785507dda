//! Plugdrop Core Library
//!
//! Deploys manifest bundles into a target application's plugin
//! directory, persists its behavior toggle, and restarts it. The
//! interactive session that drives these lives in [`session`].

pub mod catalog;
pub mod config;
pub mod context;
pub mod deploy;
pub mod error;
pub mod fs;
pub mod process;
pub mod provision;
pub mod session;
pub mod settings;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::catalog::ManifestCatalog;
    pub use crate::config::{ConfigStore, PlugdropConfig, TargetProfile};
    pub use crate::context::AppContext;
    pub use crate::deploy::{DeployReport, Deployer, Drift, DriftKind};
    pub use crate::error::{Error, Result};
    pub use crate::process::{
        ProcessControl, RestartController, RestartOutcome, RestartScheduler,
        SystemProcessControl, TokioRestartScheduler,
    };
    pub use crate::provision::{ProvisionOutcome, Provisioner};
    pub use crate::session::{Flow, InstallLocation, Session, SessionDriver, SessionEvent};
    pub use crate::settings::{
        MemorySettingsStore, SettingsStore, TargetSettings, TomlSettingsStore,
    };
}
