use std::path::PathBuf;

use clap::Parser;
use plugdrop_core::context::AppContext;

#[derive(Parser)]
#[command(name = "plugdrop-tui")]
#[command(about = "Interactive manifest deployer")]
#[command(version)]
struct Args {
    /// Path to plugdrop.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the manifest folders
    #[arg(long)]
    manifests_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut ctx = AppContext::load(args.config)?;
    if let Some(dir) = args.manifests_dir {
        ctx = ctx.with_manifests_dir(dir);
    }

    plugdrop_tui::init_logging(ctx.state_dir())?;
    plugdrop_tui::run(&ctx)
}
