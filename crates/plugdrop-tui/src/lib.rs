//! Plugdrop TUI
//!
//! Ratatui front end: pick a manifest, deploy it into the target install,
//! flip the behavior toggle.

pub mod app;
pub mod keymap;
pub mod logging;
pub mod view;

pub use app::run;
pub use logging::init_logging;
