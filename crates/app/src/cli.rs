//! Command line definition.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use varsync_domain::ColorFormat;
use varsync_infrastructure::DEFAULT_MODE_LIMIT;

/// Import and export design variables.
#[derive(Debug, Parser)]
#[command(name = "varsync", version, about = "Import and export design variables")]
pub struct Cli {
    /// Directory holding settings and the default store file
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Store file (defaults to `store.json` in the config directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Maximum number of modes per collection
    #[arg(long, global = true, default_value_t = DEFAULT_MODE_LIMIT)]
    pub mode_limit: usize,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import a JSON or YAML document into the store
    Import(ImportArgs),

    /// Export store collections as a document
    Export(ExportArgs),

    /// List the collections in the store
    Collections,

    /// Show or change import settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

/// Arguments of `import`.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Document to import
    pub file: PathBuf,

    /// Validate and resolve without saving the store
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments of `export`.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Export only this collection
    #[arg(long, short)]
    pub collection: Option<String>,

    /// Color encoding (HEX, HEXA, RGB, RGBA, HSL, HSLA)
    #[arg(long, default_value_t = ColorFormat::default())]
    pub color_format: ColorFormat,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// `settings` subcommands.
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the effective settings
    Show,

    /// Change one or more settings
    Set(SettingsArgs),

    /// Restore the defaults
    Reset,
}

/// Fields accepted by `settings set`. Omitted fields keep their value.
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Reject references to missing variables instead of substituting
    #[arg(long)]
    pub fail_on_null_alias: Option<bool>,

    /// Fallback for number references
    #[arg(long, allow_negative_numbers = true)]
    pub number_fallback: Option<f64>,

    /// Fallback for boolean references
    #[arg(long)]
    pub boolean_fallback: Option<bool>,

    /// Fallback for string references
    #[arg(long)]
    pub string_fallback: Option<String>,

    /// Fallback for color references
    #[arg(long)]
    pub color_fallback: Option<String>,

    /// Add to existing collections instead of creating new ones
    #[arg(long)]
    pub extend_existing_collections: Option<bool>,
}
