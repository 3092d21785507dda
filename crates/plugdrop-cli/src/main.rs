//! Plugdrop - manifest deployer
//!
//! Usage:
//!   plugdrop                  # Launch TUI (default)
//!   plugdrop list             # List available manifests
//!   plugdrop deploy <name>    # Deploy a manifest and restart the target
//!   plugdrop toggle on|off    # Write the behavior toggle
//!   plugdrop init             # Write plugdrop.toml

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plugdrop_core::config::StoreBackend;
use plugdrop_core::context::AppContext;
use plugdrop_core::deploy::{DeployReport, DriftKind};
use plugdrop_core::process::RestartOutcome;
use plugdrop_core::provision::ProvisionOutcome;

#[derive(Parser)]
#[command(name = "plugdrop")]
#[command(about = "Deploy manifest bundles into a target application", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to plugdrop.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the manifest folders
    #[arg(long, global = true)]
    manifests_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available manifests
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Deploy a manifest into the target install
    Deploy {
        /// Manifest directory name
        name: String,

        /// Skip restarting the target afterwards
        #[arg(long)]
        no_restart: bool,
    },

    /// Persist the behavior toggle
    Toggle {
        state: ToggleState,
    },

    /// Terminate and relaunch the target
    Restart,

    /// Check a deployed manifest for missing or modified files
    Verify {
        /// Manifest directory name
        name: String,
    },

    /// Show the effective paths
    Paths,

    /// Write the effective configuration to plugdrop.toml
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq, Debug)]
enum ToggleState {
    On,
    Off,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut ctx = AppContext::load(cli.config)?;
    if let Some(dir) = cli.manifests_dir {
        ctx = ctx.with_manifests_dir(dir);
    }

    match cli.command {
        Some(command) => {
            init_stderr_logging();
            run_cli(&ctx, command)
        }
        None => {
            plugdrop_tui::init_logging(ctx.state_dir())?;
            plugdrop_tui::run(&ctx)
        }
    }
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plugdrop_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_cli(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::List { format } => run_list(ctx, format),
        Commands::Deploy { name, no_restart } => run_deploy(ctx, &name, no_restart),
        Commands::Toggle { state } => run_toggle(ctx, state),
        Commands::Restart => {
            print_restart(ctx.restart_controller().restart_blocking());
            Ok(())
        }
        Commands::Verify { name } => run_verify(ctx, &name),
        Commands::Paths => {
            print_paths(ctx);
            Ok(())
        }
        Commands::Init { force } => run_init(ctx, force),
    }
}

fn run_init(ctx: &AppContext, force: bool) -> Result<()> {
    let path = ctx.config_path();
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ctx.config_store().save(ctx.config())?;
    println!("✓ Wrote {}", path.display());
    Ok(())
}

fn run_list(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let catalog = ctx.catalog();
    let manifests = catalog.list();

    match format {
        OutputFormat::Table => {
            if manifests.is_empty() {
                println!("No manifests found in {}", catalog.dir().display());
                return Ok(());
            }
            println!("{}", style("Available Manifests").bold());
            for name in &manifests {
                println!("  {name}");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "dir": catalog.dir().display().to_string(),
                "manifests": manifests,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn run_deploy(ctx: &AppContext, name: &str, no_restart: bool) -> Result<()> {
    let install = ctx
        .target_settings()
        .read_install_location()
        .context("cannot deploy without an install location")?;

    let report = ctx.deployer().deploy(name, &install)?;
    print_deploy(&report);

    if !no_restart {
        print_restart(ctx.restart_controller().restart_blocking());
    }
    Ok(())
}

fn run_toggle(ctx: &AppContext, state: ToggleState) -> Result<()> {
    let enabled = state == ToggleState::On;
    ctx.target_settings().write_toggle(enabled)?;
    println!(
        "✓ Toggle {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}

fn run_verify(ctx: &AppContext, name: &str) -> Result<()> {
    let install = ctx
        .target_settings()
        .read_install_location()
        .context("cannot verify without an install location")?;

    let drifts = ctx.deployer().verify(name, &install)?;
    if drifts.is_empty() {
        println!("✓ '{name}' matches the deployed files");
        return Ok(());
    }

    for drift in &drifts {
        let label = match drift.kind {
            DriftKind::Missing => style("missing ").red(),
            DriftKind::Modified => style("modified").yellow(),
        };
        println!("  {label} {}", drift.path.display());
    }
    anyhow::bail!("{} file(s) differ from manifest '{}'", drifts.len(), name)
}

fn print_deploy(report: &DeployReport) {
    println!(
        "✓ Deployed '{}' to {}",
        report.manifest,
        report.plugin_dir.display()
    );
    println!(
        "  {} file(s), {} dir(s), {} byte(s)",
        report.copied.files_copied, report.copied.dirs_created, report.copied.bytes_copied
    );
    if report.shim == ProvisionOutcome::Created {
        println!("  Installed runtime shim");
    }
    if report.plugin_dir_outcome == ProvisionOutcome::Created {
        println!("  Created plugin directory");
    }
}

fn print_restart(outcome: RestartOutcome) {
    match outcome {
        RestartOutcome::Relaunched => println!("✓ Target relaunched"),
        RestartOutcome::InstallUnresolved => {
            println!("  ⚠ Install location unresolved; target not relaunched")
        }
        RestartOutcome::ExecutableMissing => {
            println!("  ⚠ Target executable missing; not relaunched")
        }
        RestartOutcome::LaunchFailed => println!("  ⚠ Target relaunch failed"),
    }
}

fn print_paths(ctx: &AppContext) {
    let target = &ctx.config().target;
    println!("{:<12} {}", "Config", ctx.config_path().display());
    match ctx.settings_backend() {
        StoreBackend::Registry => println!("{:<12} registry (HKEY_CURRENT_USER)", "Settings"),
        _ => println!("{:<12} {}", "Settings", ctx.settings_path().display()),
    }
    println!("{:<12} {}", "Manifests", ctx.catalog().dir().display());
    println!("{:<12} {}", "State", ctx.state_dir().display());

    match ctx.target_settings().read_install_location() {
        Ok(install) => {
            println!("{:<12} {}", "Install", install.display());
            println!(
                "{:<12} {}",
                "Plugins",
                target.plugin_dir_path(&install).display()
            );
            println!(
                "{:<12} {}",
                "Executable",
                target.executable_path(&install).display()
            );
        }
        Err(e) => println!("{:<12} {}", "Install", style(format!("Error: {e}")).red()),
    }
}
