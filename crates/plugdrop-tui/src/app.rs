//! Terminal setup and the event loop.

use std::io::{self, Stdout, Write};
use std::sync::Arc;

use anyhow::Context;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plugdrop_core::context::AppContext;
use plugdrop_core::process::TokioRestartScheduler;
use plugdrop_core::session::{Flow, SessionDriver};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::{keymap, view};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive session until the user quits.
pub fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let catalog = ctx.catalog();
    catalog
        .ensure_dir()
        .with_context(|| format!("failed to create {}", catalog.dir().display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let res = run_session(ctx, runtime.handle().clone());

    // In-flight restarts are not joined.
    runtime.shutdown_background();
    debug!("tui stopped");
    res
}

fn run_session(ctx: &AppContext, handle: Handle) -> anyhow::Result<()> {
    let scheduler = TokioRestartScheduler::new(handle, Arc::new(ctx.restart_controller()));
    let mut driver =
        SessionDriver::start(ctx.target_settings(), ctx.deployer(), Arc::new(scheduler));
    info!(manifests_dir = %ctx.catalog().dir().display(), "tui started");

    let _screen = ScreenGuard::enter(io::stdout(), true)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    event_loop(&mut terminal, &mut driver, ctx)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop(
    terminal: &mut Term,
    driver: &mut SessionDriver,
    ctx: &AppContext,
) -> anyhow::Result<()> {
    let catalog_dir = ctx.config().catalog.dir.clone();
    loop {
        terminal.draw(|frame| view::render(frame, driver.session(), &catalog_dir))?;

        if let Event::Key(key) = event::read()?
            && let Some(event) = keymap::map_key(key)
            && driver.dispatch(event) == Flow::Quit
        {
            return Ok(());
        }
    }
}

/// Raw mode plus the alternate screen, undone on drop so every exit
/// path leaves the terminal usable.
struct ScreenGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> ScreenGuard<W> {
    fn enter(out: W, raw_mode: bool) -> io::Result<Self> {
        if raw_mode {
            enable_raw_mode()?;
        }
        let mut guard = Self { out, raw_mode };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = disable_raw_mode();
        }
        let _ = execute!(self.out, LeaveAlternateScreen, cursor::Show);
    }
}
