//! Download command implementation

use std::path::PathBuf;
use std::str::FromStr;

use clap::Args;
use tracing::info;

use crate::client::HttpClient;
use crate::pdfs::{self, PublishDate};

use super::{CliError, DEFAULT_PDFS_DIR, DEFAULT_SHEET_NAME, DEFAULT_WORKSHEET};

/// Download statement PDFs listed in a previously generated worksheet.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Keep only statements of exactly this type,
    /// e.g. "Balanço Patrimonial (BP)"
    #[arg(long, default_value = "")]
    pub statement_type: String,

    /// Keep only the latest or oldest publication per company and type
    #[arg(long, value_parser = PublishDate::from_str, default_value = "all")]
    pub publish_date: PublishDate,

    /// Directory for downloaded PDFs
    #[arg(long, default_value = DEFAULT_PDFS_DIR)]
    pub pdfs_dir: PathBuf,

    /// Worksheet path (generated by the extract command)
    #[arg(long, default_value = DEFAULT_WORKSHEET)]
    pub worksheet: PathBuf,

    /// Statement sheet name
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,
}

impl DownloadArgs {
    /// Run the filter-and-download pipeline.
    ///
    /// Files follow the naming convention
    /// `<company_name>_<statement_type>_<publish_date>.pdf`.
    pub async fn execute(&self) -> Result<(), CliError> {
        info!(
            "downloading PDFs; the files will be available at {}",
            self.pdfs_dir.display()
        );

        let client = HttpClient::new()?;
        let downloaded = pdfs::download_pdfs(
            &client,
            &self.pdfs_dir,
            &self.worksheet,
            &self.sheet_name,
            &self.statement_type,
            self.publish_date,
        )
        .await?;

        info!("done; {downloaded} files written");
        Ok(())
    }
}
