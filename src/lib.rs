//! # Central Balanços
//!
//! A library and CLI for extracting corporate financial-statement metadata from
//! Brazil's Central de Balanços public registry, tabulating it into an XLSX
//! worksheet, and downloading the referenced statement PDFs.
//!
//! ## Features
//!
//! - **Two-Level Catalog Walk**: fetches the participant list, then each
//!   participant's statement list from the registry API
//! - **Per-Company Retry**: companies whose statement fetch fails are retried
//!   with exponential backoff up to a bound, then dropped with a warning
//! - **Order-Stable Output**: rows are sorted by participant name, statement
//!   type, and publication date for reproducible worksheets
//! - **Deterministic Filenames**: downloaded PDFs are named from row metadata
//! - **Allow-List Downloads**: an optional `cnpjs` sheet restricts which
//!   companies' PDFs are fetched
//!
//! ## Quick Start
//!
//! ```no_run
//! use central_balancos::client::HttpClient;
//! use central_balancos::extract::{table::StatementTable, Extractor};
//! use central_balancos::registry::{CompanySelector, RegistryClient};
//! use central_balancos::workbook;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Walk the whole catalog and persist the result
//! let api = RegistryClient::new(HttpClient::new()?);
//! let rows = Extractor::new(api).extract(&CompanySelector::All).await?;
//! let table = StatementTable::from_rows(rows)?;
//! workbook::write_statements(&table, "data/demonstracoes.xlsx".as_ref(), "demonstracoes")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`client`] - HTTP transport with request timeout and error classification
//! - [`registry`] - Registry endpoints, wire types, and the [`registry::RegistryApi`] trait
//! - [`extract`] - Retrying fetch engine and column-oriented tabulation
//! - [`workbook`] - XLSX persistence with auto-sized columns
//! - [`pdfs`] - Statement filtering and PDF download
//! - [`cli`] - Command-line front end

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// CLI command implementations
pub mod cli;

/// HTTP transport
pub mod client;

/// Retrying fetch engine and tabulation
pub mod extract;

/// Statement filtering and PDF download
pub mod pdfs;

/// Registry API surface
pub mod registry;

/// XLSX persistence
pub mod workbook;

/// One financial statement belonging to one registry participant.
///
/// Field names mirror the registry's JSON and the worksheet column headers.
/// `cnpj` holds digits only; `pdf` is the templated document URL derived from
/// the statement's remote id at extraction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRow {
    /// Participant (company) name
    pub nome_participante: String,
    /// Participant tax id, digits only
    pub cnpj: String,
    /// Statement type, e.g. "Balanço Patrimonial (BP)"
    pub tipo_demonstracao: String,
    /// Publication status
    pub status: String,
    /// Period end date
    pub data_fim: String,
    /// Publication timestamp, ISO-8601
    pub data_publicacao: String,
    /// Document URL
    pub pdf: String,
}

impl StatementRow {
    /// Composite sort key: `(nomeParticipante, tipoDemonstracao, dataPublicacao)`.
    ///
    /// This is the canonical row ordering for worksheets; ties keep fetch order.
    pub fn sort_key(&self) -> (&str, &str, &str) {
        (
            &self.nome_participante,
            &self.tipo_demonstracao,
            &self.data_publicacao,
        )
    }
}

/// Strip every non-digit character from a CNPJ (or any identifier).
///
/// The registry formats CNPJs as `12.345.678/0001-99`; worksheets and the
/// download allow-list both carry the bare 14 digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
