//! Command-line argument definitions for the Astrolabe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the scene, the output files and their
//! resolution, the configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Astrolabe diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML scene file. The built-in architecture scene is used when omitted.
    #[arg(short, long)]
    pub scene: Option<String>,

    /// Output image path; the format is taken from the extension (png, webp).
    /// May be repeated.
    #[arg(short, long = "output")]
    pub outputs: Vec<String>,

    /// Dots per canvas unit; overrides the configured resolution
    #[arg(long)]
    pub dpi: Option<f32>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
