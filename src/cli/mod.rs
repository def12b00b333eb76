//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::infrastructure::DEFAULT_GRAPH_URL;

/// Tool for exporting various data from a Facebook page.
#[derive(Parser, Debug)]
#[command(name = "fbexporter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file in JSON format, required.
    #[arg(short, long, env = "FB_CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Graph API root URL.
    #[arg(long, env = "FB_GRAPH_URL", default_value = DEFAULT_GRAPH_URL, global = true)]
    pub graph_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export all conversations on page.
    Messages {
        #[command(flatten)]
        export: ExportArgs,

        /// Escape backslashes the way earlier releases did.
        #[arg(long)]
        legacy_escape: bool,
    },

    /// Export all users that have chatted with the page.
    Users {
        #[command(flatten)]
        export: ExportArgs,
    },
}

/// Options shared by the export commands.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Use long-lived token (for tasks expected to run more than 2 hours).
    #[arg(long = "longlived", visible_alias = "ll")]
    pub long_lived: bool,

    /// Template file to generate from.
    #[arg(short, long)]
    pub template: PathBuf,

    /// Output file, appended to. Standard output if not specified.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
