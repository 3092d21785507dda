use std::path::PathBuf;

/// Discrete input delivered by the interactive surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Quit,
    MoveUp,
    MoveDown,
    Toggle,
    Deploy,
    Refresh,
}

/// Side effect requested by the session, executed by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    PersistToggle(bool),
    Deploy { manifest: String, install: PathBuf },
    ScheduleRestart,
    RefreshCatalog,
}

/// Result of an executed [`Command`], fed back into the session.
/// Errors arrive already rendered for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ToggleWritten {
        enabled: bool,
        result: Result<(), String>,
    },
    Deployed {
        manifest: String,
        result: Result<(), String>,
    },
    CatalogRefreshed(Vec<String>),
}
