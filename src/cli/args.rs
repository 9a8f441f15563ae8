//! Command line argument parsing
//!
//! Subcommands:
//! - `scan`: scan a directory tree through the worker pool
//! - `analyze`: stat and classify a single file

use crate::pool::DEFAULT_MAX_DEPTH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scanpool")]
#[command(author = "Scanpool Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scan directories and analyze files through an isolated worker pool")]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory tree and report discovered entries
    Scan {
        /// Directory to scan
        path: PathBuf,
        /// Maximum recursion depth
        #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: u32,
        /// Override the worker count
        #[arg(short = 'w', long = "workers")]
        workers: Option<usize>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Emit JSON instead of a text summary
        #[arg(long = "json")]
        json: bool,
        /// Print pool statistics after the scan
        #[arg(long = "stats")]
        stats: bool,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Analyze a single file
    Analyze {
        /// File to analyze
        file: PathBuf,
        /// Base directory for the reported relative path
        #[arg(short = 'b', long = "base")]
        base: Option<PathBuf>,
        /// Emit JSON instead of a text summary
        #[arg(long = "json")]
        json: bool,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
}
