//! Card index builder (cardfuse-index) - Main entry point
//!
//! Runs one full fusion pass over the source files in the root folder and
//! writes the raw, published, missing-translation and JSON catalogs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use cardfuse_common::config::{default_config_path, load_toml_file};
use cardfuse_index::{CliOverrides, IndexConfig, IndexToml, Pipeline};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for cardfuse-index
#[derive(Parser, Debug)]
#[command(name = "cardfuse-index")]
#[command(about = "Fuse card sources into the published card catalog")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder containing the source files (overrides CARDFUSE_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Folder receiving the generated artifacts
    #[arg(short, long)]
    output_folder: Option<PathBuf>,

    /// Copy the structured catalog here (repeatable, replaces configured targets)
    #[arg(long = "publish", value_name = "PATH")]
    publish: Vec<PathBuf>,

    /// Skip copying the structured catalog anywhere
    #[arg(long)]
    no_publish: bool,
}

fn init_tracing(level: &str) {
    let default_directive = format!("cardfuse_index={level},cardfuse_common={level}");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let loaded: Option<IndexToml> = match &config_path {
        Some(path) => load_toml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => None,
    };
    let from_file = loaded.is_some();
    let toml = loaded.unwrap_or_default();

    // The subscriber needs the configured level, so it starts after the config
    // file is read
    init_tracing(&toml.base.logging.level);
    match (&config_path, from_file) {
        (Some(path), true) => info!("Config: {}", path.display()),
        _ => info!("Config: built-in defaults"),
    }

    let config = IndexConfig::resolve(
        toml,
        CliOverrides {
            root_folder: args.root_folder,
            output_folder: args.output_folder,
            publish: args.publish,
            no_publish: args.no_publish,
        },
    );

    info!("Root folder: {}", config.root_folder.display());
    info!("Output folder: {}", config.output_folder.display());

    let stats = Pipeline::new(config).run().context("Catalog build failed")?;

    for line in stats.summary_lines() {
        info!("{}", line);
    }
    info!("Done");
    Ok(())
}
