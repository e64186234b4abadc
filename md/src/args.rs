//! Command-line argument parsing

use clap::{Parser, Subcommand};

/// Lennard-Jones Monte Carlo and soft-sphere collision runs driven by a YAML configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Write log output to this file instead of stdout
    #[arg(short, long)]
    pub log: Option<String>,

    /// Write plot frames to this file
    #[arg(short, long)]
    pub frames: Option<String>,

    /// Override the number of steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Metropolis Monte Carlo of Lennard-Jones particles
    Metropolis,
    /// PEFRL dynamics of colliding soft spheres
    Collide,
}
