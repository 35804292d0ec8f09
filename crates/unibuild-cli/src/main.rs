//! Unibuild CLI - query the unified device-configuration document

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;
use unibuild_core::ConfigSet;

use commands::FileKind;

#[derive(Parser, Debug)]
#[command(name = "unibuild")]
#[command(about = "Query tool for the unified device configuration")]
#[command(version)]
struct Args {
    /// Path to the configuration document (JSON)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Restrict to these models (repeatable); default is all models
    #[arg(short, long)]
    model: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List device names in document order
    ListModels,
    /// Print one scalar property of one model
    GetProperty {
        model: String,
        path: String,
        key: String,
    },
    /// Print every resolved firmware-info entry
    GetFirmwareInfo,
    /// Print the distinct firmware image URIs
    GetFirmwareUris,
    /// Print touch firmware files (source destination symlink)
    GetTouchFirmwareFiles,
    /// Print ARC files (source destination)
    GetArcFiles,
    /// Print audio files (source destination)
    GetAudioFiles,
    /// Print thermal files (source destination)
    GetThermalFiles,
    /// Print wallpaper values
    GetWallpaperFiles,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let set = load_set(&args)?;
    for line in run(&args.command, &set)? {
        println!("{line}");
    }
    Ok(())
}

fn load_set(args: &Args) -> Result<ConfigSet> {
    debug!(path = %args.config.display(), models = args.model.len(), "loading configuration");
    let set = if args.model.is_empty() {
        ConfigSet::from_file(&args.config)
    } else {
        let content = std::fs::read_to_string(&args.config)?;
        let doc = serde_json::from_str(&content)?;
        ConfigSet::with_filter(doc, |name| args.model.iter().any(|m| m == name))
    };
    set.with_context(|| format!("failed to load {}", args.config.display()))
}

fn run(command: &Command, set: &ConfigSet) -> Result<Vec<String>> {
    Ok(match command {
        Command::ListModels => commands::list_models(set),
        Command::GetProperty { model, path, key } => {
            vec![commands::get_property(set, model, path, key)?]
        }
        Command::GetFirmwareInfo => commands::firmware_info_lines(set),
        Command::GetFirmwareUris => commands::firmware_uris(set),
        Command::GetTouchFirmwareFiles => commands::touch_file_lines(set),
        Command::GetArcFiles => commands::file_lines(set, FileKind::Arc),
        Command::GetAudioFiles => commands::file_lines(set, FileKind::Audio),
        Command::GetThermalFiles => commands::file_lines(set, FileKind::Thermal),
        Command::GetWallpaperFiles => commands::wallpaper_lines(set),
    })
}
