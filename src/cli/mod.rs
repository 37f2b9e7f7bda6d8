//! CLI command implementations
//!
//! The two interactive actions of the original tool — extract-and-tabulate
//! and download — exposed as clap subcommands with the same optional filters.

use clap::{Parser, Subcommand};

pub mod download;
pub mod error;
pub mod extract;

pub use download::DownloadArgs;
pub use error::CliError;
pub use extract::ExtractArgs;

/// Default worksheet location relative to the working directory.
pub const DEFAULT_WORKSHEET: &str = "data/demonstracoes.xlsx";

/// Default statement sheet name.
pub const DEFAULT_SHEET_NAME: &str = "demonstracoes";

/// Default directory for downloaded PDFs.
pub const DEFAULT_PDFS_DIR: &str = "data/pdfs";

/// Central Balanços CLI
#[derive(Parser, Debug)]
#[command(name = "central-balancos")]
#[command(about = "Extract financial-statement metadata from Central de Balanços and download statement PDFs", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract company statements and generate the worksheet
    Extract(ExtractArgs),
    /// Download PDFs for previously extracted statements
    Download(DownloadArgs),
}
