//! Command-line argument definitions for the Catalog CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the model and configuration files,
//! override output settings, and control logging verbosity.

use clap::Parser;

/// Command-line arguments for the Catalog documentation tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input model file (JSON)
    #[arg(help = "Path to the input model")]
    pub input: String,

    /// Output directory, overriding the configuration
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Print embeddable diagrams instead of writing files
    #[arg(long)]
    pub inline: bool,

    /// Generate Mermaid instead of PlantUML
    #[arg(long)]
    pub mermaid: bool,

    /// Title of the integration view
    #[arg(short, long)]
    pub title: Option<String>,
}
