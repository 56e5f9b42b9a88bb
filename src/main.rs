//! Command line front end for the TSP tree builder.
//!
//! Reads a raw volume timestep sequence and writes the reordered,
//! multi-resolution Time-Space Partitioning tree file consumed by the
//! volume renderer.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tempovox::tsp::{TspBuilder, TspConfig};

/// Builds a Time-Space Partitioning tree file from a raw volume sequence.
#[derive(Parser, Debug)]
#[command(name = "tempovox")]
#[command(about = "Builds a TSP tree file from a time-varying scalar volume")]
struct Args {
    /// Input volume sequence file
    input: PathBuf,

    /// Output TSP tree file
    output: PathBuf,

    /// Brick edge length in voxels, applied to all three axes
    #[arg(short, long, default_value_t = 32)]
    brick_dim: u32,

    /// Padding width recorded in the output header
    #[arg(long, default_value_t = 0)]
    padding_width: u32,

    /// Structure tag recorded in the output header
    #[arg(long, default_value_t = 0)]
    structure: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let builder = TspBuilder::new(TspConfig {
        input_path: args.input.clone(),
        output_path: args.output,
        brick_dim: args.brick_dim,
        padding_width: args.padding_width,
        structure: args.structure,
    });
    builder
        .construct()
        .with_context(|| format!("building TSP tree from {}", args.input.display()))?;
    Ok(())
}
