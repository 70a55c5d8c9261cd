use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "asset",
    about = "Inspect and manage stored asset property trees",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory; overrides the config file
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Store settings (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the outline of a stored tree
    Show(ShowArgs),
    /// Re-hash every side file of a stored tree
    Verify(VerifyArgs),
    /// Store raw binary files as one buffer property
    ImportBuffer(ImportBufferArgs),
    /// Write a stored buffer's bytes to a file
    ExportBuffer(ExportBufferArgs),
    /// List stored aliases
    List,
}

#[derive(Args)]
pub struct ShowArgs {
    pub alias: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub alias: String,
}

#[derive(Args)]
pub struct ImportBufferArgs {
    pub alias: String,
    /// Element size in bytes
    #[arg(long)]
    pub stride: u32,
    /// Files to concatenate, in order
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ExportBufferArgs {
    pub alias: String,
    pub out: PathBuf,
    /// Slash-separated path from the root to the buffer object
    #[arg(long, default_value = "")]
    pub path: String,
}
