mod control;
mod engine;
mod loader;
mod tool;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::loader::mesh_builder::load_mesh;
use crate::loader::smf::FaceMode;
use crate::tool::app_config::AppConfig;

/// Interactive SMF mesh viewer with Gouraud and Phong shading.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// SMF model to display
    model: PathBuf,

    /// Config file, defaults to smfview.ron in the working directory if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// How face records are parsed, overrides the config file
    #[arg(long)]
    face_mode: Option<FaceMode>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up tracing
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(if cfg!(debug_assertions) { "info,smfview=trace" } else { "info" })
    })?;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
    info!("Starting smfview");

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(face_mode) = args.face_mode {
        config.face_mode = face_mode;
    }

    let mesh = load_mesh(&args.model, config.face_mode, config.normal_weighting)
        .inspect_err(|err| error!("{err}"))?;
    tool::run_app(config, mesh)
}
