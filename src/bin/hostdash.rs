//! hostdash - terminal dashboard of local and remote host metrics.
//!
//! Run: `hostdash --config dashboard.yaml`

use clap::Parser;
use hostdash::{debug, App, Config};
use std::path::PathBuf;

/// Terminal dashboard of local and remote host metrics
#[derive(Parser, Debug)]
#[command(name = "hostdash")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Terminal dashboard of local and remote host metrics", long_about = None)]
struct Cli {
    /// Config file path (default: <config dir>/hostdash/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Write debug logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    debug::enable_from_env();
    if cli.debug {
        debug::enable();
    }
    if let Some(path) = &cli.log_file {
        debug::log_to_file(path)?;
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let path = Config::default_path();
            hostdash::info!("main", "loading {}", path.display());
            Config::load_or_default(path)?
        }
    };
    config.validate()?;

    if config.widgets.is_empty() {
        hostdash::warn!("main", "no widgets configured");
    }

    let mut app = App::new(config);
    app.run()?;

    Ok(())
}
