//! Defines the command-line arguments and subcommands for the casebook CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "casebook",
    version,
    about = "Inspect and validate table-driven test case files."
)]
pub struct CasebookArgs {
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every case in the case files under a path.
    List {
        /// A case file, or a directory searched recursively.
        #[arg(default_value = "tests/cases")]
        path: PathBuf,
        /// Print a JSON document instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Load and validate every case file under a path.
    Check {
        /// A case file, or a directory searched recursively.
        #[arg(default_value = "tests/cases")]
        path: PathBuf,
    },
}
