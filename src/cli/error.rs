//! CLI error types and conversions

use crate::client::ClientError;
use crate::extract::ExtractError;
use crate::pdfs::DownloadError;
use crate::workbook::WorkbookError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Transport error
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// Extraction error
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Worksheet error
    #[error("worksheet error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Download error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
