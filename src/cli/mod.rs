//! CLI command definitions for optstack.
//!
//! The `Cli` struct carries the global options; each subcommand maps onto
//! one settings-store operation.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::settings::UnknownPathBehavior;

/// Layered settings store and CLI tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings database (default: OPTSTACK_DB_PATH or the
    /// platform data directory)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the full merged settings tree as JSON
    Show,

    /// Print a single value by dotted path
    Get {
        /// Dotted settings path, e.g. debug.log_level
        path: String,
    },

    /// Set a value by dotted path and persist the tree
    Set {
        /// Dotted settings path, e.g. debug.log_level
        path: String,

        /// New value; cast like an environment variable unless --json
        value: String,

        /// Parse the value as raw JSON instead of casting
        #[arg(long)]
        json: bool,

        /// Policy for paths outside the default schema
        #[arg(long, value_enum, default_value = "warn")]
        unknown: UnknownPathBehavior,
    },

    /// Delete the persisted settings and rebuild from defaults
    Reset,

    /// Print the detected host environment and its classification
    Environment,

    /// Write the merged settings tree as pretty JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge a JSON settings file into the tree and persist
    Import {
        /// JSON file holding a (partial) settings mapping
        file: PathBuf,

        /// Reset to defaults before applying the file
        #[arg(long)]
        replace: bool,

        /// Policy for paths outside the default schema
        #[arg(long, value_enum, default_value = "warn")]
        unknown: UnknownPathBehavior,
    },
}

/// Resolve the settings database path.
///
/// Order: explicit `--database`, the `OPTSTACK_DB_PATH` environment
/// variable, `<platform data dir>/optstack/options.db`, then a relative
/// fallback for hosts without a data directory.
pub fn resolve_store_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var("OPTSTACK_DB_PATH").ok().map(PathBuf::from))
        .or_else(|| dirs::data_local_dir().map(|dir| dir.join("optstack").join("options.db")))
        .unwrap_or_else(|| PathBuf::from("optstack/options.db"))
}
