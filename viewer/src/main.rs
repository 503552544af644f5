//! Kennel - articulated dog viewer
//!
//! # Usage
//!
//! ```bash
//! kennel
//! kennel --model assets/bone.obj --animate
//! kennel --config my-config.toml --width 1280 --height 720
//! ```
//!
//! Settings come from `config.toml` in the platform config directory (or
//! `--config FILE`); command-line flags override them.

mod app;
mod graphics;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kennel_core::{Config, config};

#[derive(Parser, Debug)]
#[command(name = "kennel")]
#[command(version, about = "Articulated procedural dog with Phong lighting")]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// OBJ model to show next to the dog
    #[arg(long, value_name = "OBJ")]
    model: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Start walking immediately
    #[arg(long)]
    animate: bool,

    /// Color surfaces by their normals
    #[arg(long)]
    normals: bool,

    /// Start with lighting switched off
    #[arg(long)]
    no_lights: bool,
}

impl Args {
    /// Override config values with any flags given
    fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.scene.model_path = Some(model.clone());
        }
        if let Some(width) = self.width {
            config.window.width = width.max(1);
        }
        if let Some(height) = self.height {
            config.window.height = height.max(1);
        }
        if self.animate {
            config.scene.animate = true;
        }
        if self.normals {
            config.scene.normal_debug = true;
        }
        if self.no_lights {
            config.lighting.enabled = false;
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => config::load(),
    };
    args.apply(&mut config);

    if let Some(model) = &config.scene.model_path
        && !model.exists()
    {
        tracing::warn!("Model file not found: {}", model.display());
    }

    app::run(config)
}
