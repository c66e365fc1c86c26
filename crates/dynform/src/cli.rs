//! Clap CLI definitions for the `dynform` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// dynform -- fill dynamic forms described by a field catalog.
///
/// Stands in for a rendering surface: each `--set` is one user edit, each
/// `--patch` group one programmatic patch, and derived fields update the way
/// they would on screen.
#[derive(Parser, Debug)]
#[command(
    name = "dynform",
    about = "Fill dynamic forms described by a field catalog",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Config file (default: auto-discover .dynform/config.yaml).
    #[arg(long, global = true, env = "DYNFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Field catalog name or path (default: config `catalog`, then the bundled catalog).
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the fields of the catalog, including handler-backed fields.
    Fields,

    /// Build the form, apply edits and print the resulting values.
    Fill(FillArgs),

    /// Like `fill`, but fail when required fields are still empty.
    Check(FillArgs),
}

/// Edits applied by `fill` and `check`.
#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// User edit (NAME=VALUE), applied in order. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    pub sets: Vec<String>,

    /// Programmatic value (NAME=VALUE); all are applied as one patch after the edits.
    #[arg(long = "patch", value_name = "NAME=VALUE")]
    pub patches: Vec<String>,

    /// Also print the change log.
    #[arg(long)]
    pub events: bool,
}
