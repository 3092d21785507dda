//! Interactive session: cursor over the catalog, toggle flag, status line.

pub mod driver;
pub mod event;
pub mod state;

pub use driver::{Flow, SessionDriver};
pub use event::{Command, Outcome, SessionEvent};
pub use state::{InstallLocation, READY, Session};
