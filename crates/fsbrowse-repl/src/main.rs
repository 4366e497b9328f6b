//! fsbrowse entry point.
//!
//! Launch the interactive browser:
//! ```bash
//! cargo run -p fsbrowse-repl -- --project-dir /data/proj
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fsbrowse_core::{BrowserConfig, UsbMountConfig};
use fsbrowse_repl::Repl;

/// Browse the filesystem through symbolic, root-relative paths.
#[derive(Parser, Debug)]
#[command(name = "fsbrowse", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the %APPLICATIONDIR% root resolves to
    #[arg(long, value_name = "DIR")]
    application_dir: Option<PathBuf>,

    /// Directory the %PROJECTDIR% root resolves to
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// Bind a USB slot to a mount directory (repeatable)
    #[arg(long = "usb", value_name = "SLOT=DIR")]
    usb: Vec<String>,

    /// Namespace qualifier carried on application and project paths
    #[arg(long)]
    namespace: Option<String>,

    /// Start path, e.g. '%PROJECTDIR%\reports'
    #[arg(long)]
    path: Option<String>,

    /// Extension filter, e.g. '*.csv;*.txt'
    #[arg(long)]
    filter: Option<String>,

    /// Print listings as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var). Diagnostics go to
    // stderr; stdout belongs to the shell.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tracing::debug!(
        "roots: application='{}' project='{}', {} usb binding(s)",
        config.application_dir.display(),
        config.project_dir.display(),
        config.usb.len()
    );

    let mut navigator = config.build_navigator()?;
    navigator
        .initialize(&config.path)
        .context("Failed to open the start directory")?;

    let mut repl = Repl::new(navigator, config.max_usb_slots).with_json_listings(cli.json);
    repl.run()
}

/// Config file first, then command line flags on top.
fn load_config(cli: &Cli) -> Result<BrowserConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config '{}'", path.display()))?;
            BrowserConfig::from_toml(&text)?
        }
        None => {
            let project_dir = std::env::current_dir().context("Cannot determine the working directory")?;
            BrowserConfig::for_dirs(default_application_dir()?, project_dir)
        }
    };

    if let Some(dir) = &cli.application_dir {
        config.application_dir = dir.clone();
    }
    if let Some(dir) = &cli.project_dir {
        config.project_dir = dir.clone();
    }
    if let Some(namespace) = &cli.namespace {
        config.namespace = Some(namespace.clone());
    }
    if let Some(path) = &cli.path {
        config.path = path.clone();
    }
    if let Some(filter) = &cli.filter {
        config.extension_filter = filter.clone();
    }
    for binding in &cli.usb {
        config.usb.push(parse_usb_binding(binding)?);
    }

    Ok(config)
}

fn parse_usb_binding(text: &str) -> Result<UsbMountConfig> {
    let (slot, mount) = text
        .split_once('=')
        .with_context(|| format!("USB binding '{text}' is not of the form SLOT=DIR"))?;
    let slot: u8 = slot
        .parse()
        .with_context(|| format!("USB slot '{slot}' is not a number"))?;
    Ok(UsbMountConfig {
        slot,
        mount: PathBuf::from(mount),
    })
}

/// Without a config file, the application root is the directory holding
/// the running binary.
fn default_application_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Cannot determine the application directory")?;
    Ok(exe.parent().map(Path::to_path_buf).unwrap_or(exe))
}
