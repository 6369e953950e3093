//! Command-line interface implementation for forge.
//! Provides argument parsing and help text formatting using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments structure for forge.
#[derive(Parser, Debug)]
#[command(author, version, about = "Forge: generate projects from template packs", long_about = None)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List templates available across all packs
    List,

    /// Generate a project from a template
    New(NewArgs),

    /// List available features
    Features,

    /// Apply a feature to an existing project
    Add {
        /// Feature name
        #[arg(value_name = "FEATURE")]
        feature: String,

        /// Project root
        #[arg(value_name = "DEST")]
        dest: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Manage template packs
    #[command(subcommand)]
    Pack(PackCommand),

    /// Check that tools commonly used by templates are installed
    Doctor,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Template name
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Destination folder
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Template variable (key=value). Repeatable.
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Non-interactive: use defaults, fail on missing variables, run hooks without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be written without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Initialize a git repository in the destination
    #[arg(long)]
    pub git: bool,

    /// How to print the created files
    #[arg(long, value_enum, default_value_t = OutputStyle::List)]
    pub output: OutputStyle,
}

#[derive(Subcommand, Debug)]
pub enum PackCommand {
    /// List registered packs
    List,

    /// Register a local folder or fetch a git repository as a pack
    Add {
        /// Local folder path or git URL
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Override the pack name
        #[arg(long)]
        name: Option<String>,
    },

    /// Remove a registered pack
    Remove {
        /// Pack name
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStyle {
    List,
    Tree,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
