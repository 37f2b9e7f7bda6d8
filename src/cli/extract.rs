//! Extract command implementation

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::client::HttpClient;
use crate::extract::table::StatementTable;
use crate::extract::Extractor;
use crate::registry::{CompanySelector, RegistryClient};
use crate::workbook;

use super::{CliError, DEFAULT_SHEET_NAME, DEFAULT_WORKSHEET};

/// Extract company statements and persist them as a worksheet.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Extract a single company by CNPJ (digits only); omit to extract the
    /// full catalog (~8.5k companies)
    #[arg(long, value_parser = parse_cnpj)]
    pub cnpj: Option<String>,

    /// Worksheet output path
    #[arg(long, default_value = DEFAULT_WORKSHEET)]
    pub worksheet: PathBuf,

    /// Statement sheet name
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,
}

impl ExtractArgs {
    /// Run the extraction pipeline end to end.
    pub async fn execute(&self) -> Result<(), CliError> {
        let selector = match &self.cnpj {
            Some(cnpj) => CompanySelector::Cnpj(cnpj.clone()),
            None => CompanySelector::All,
        };

        info!(
            "extracting company info; the worksheet will be available at {}",
            self.worksheet.display()
        );

        let api = RegistryClient::new(HttpClient::new()?);
        let rows = Extractor::new(api).extract(&selector).await?;
        let table = StatementTable::from_rows(rows)?;
        workbook::write_statements(&table, &self.worksheet, &self.sheet_name)?;

        info!("extracted {} statements", table.len());
        Ok(())
    }
}

/// Validate a CNPJ argument: non-empty, digits only.
///
/// Runs at argument-parse time, before any network activity.
fn parse_cnpj(s: &str) -> Result<String, String> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!(
            "please input a valid CNPJ with only digits. {s:?} provided"
        ));
    }
    Ok(s.to_string())
}
