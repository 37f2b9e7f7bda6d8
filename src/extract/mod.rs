//! Retrying fetch engine
//!
//! Walks the two-level catalog: the participant list first, then each
//! participant's statement list. The list fetch is fatal on error; per-company
//! statement fetches are recovered by queueing the company for another pass
//! with exponential backoff, up to [`MAX_RETRIES`]. Companies still failing
//! after the bound are dropped from the output with a warning.

use std::time::Duration;

use tracing::{info, warn};

use crate::client::ClientError;
use crate::registry::{pdf_url, CompanySelector, Participant, RegistryApi, StatementItem};
use crate::{digits_only, StatementRow};

pub mod table;

/// Maximum number of retry passes over the failed-company queue.
///
/// With the initial pass this allows up to four fetch attempts per company
/// (max total backoff 1 + 2 + 4 = 7 seconds).
pub const MAX_RETRIES: u32 = 3;

/// Backoff before retry pass `attempt + 1`: `2^attempt` seconds.
pub fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt)
}

/// Extraction errors
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The participant list could not be fetched. There is no retry at this
    /// level; nothing useful can happen without the catalog.
    #[error("failed to fetch company list: {0}")]
    CompanyList(#[source] ClientError),

    /// Tabulation received zero rows; the column set cannot be derived.
    #[error("no statement rows to tabulate")]
    EmptyTable,
}

/// The retrying fetch engine.
///
/// Generic over [`RegistryApi`] so the retry logic is testable against stubs
/// without any network.
pub struct Extractor<A: RegistryApi> {
    api: A,
}

impl<A: RegistryApi> Extractor<A> {
    /// Create an extractor over the given registry.
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Extract every statement of every selected company.
    ///
    /// Output order: rows from companies that succeeded on an earlier pass
    /// precede rows recovered on later passes; within a pass, catalog order
    /// and per-company statement order are preserved.
    ///
    /// A company whose fetch fails, or returns zero statements, is queued and
    /// retried; after [`MAX_RETRIES`] passes it is dropped without failing the
    /// run. A zero-statement company is indistinguishable from a failed fetch
    /// here, so it burns through the retry budget before being dropped.
    pub async fn extract(
        &self,
        selector: &CompanySelector,
    ) -> Result<Vec<StatementRow>, ExtractError> {
        let companies = self
            .api
            .fetch_companies(selector)
            .await
            .map_err(ExtractError::CompanyList)?;

        info!("fetched {} companies", companies.len());

        let mut rows = Vec::new();
        let mut pending = companies;
        let mut attempt = 0u32;

        loop {
            let retry_queue = self.run_pass(&pending, &mut rows).await;

            if retry_queue.is_empty() {
                break;
            }
            if attempt >= MAX_RETRIES {
                warn!(
                    "dropping {} companies that still failed after {} retries",
                    retry_queue.len(),
                    MAX_RETRIES
                );
                break;
            }

            let delay = backoff_delay(attempt);
            warn!(
                "{} companies failed on attempt {}; retrying in {:?}",
                retry_queue.len(),
                attempt,
                delay
            );
            tokio::time::sleep(delay).await;

            pending = retry_queue;
            attempt += 1;
        }

        Ok(rows)
    }

    /// One pass over `pending`: append rows for each company that yields
    /// statements, return the companies to retry.
    async fn run_pass(
        &self,
        pending: &[Participant],
        rows: &mut Vec<StatementRow>,
    ) -> Vec<Participant> {
        let mut retry_queue = Vec::new();

        for company in pending {
            info!("--- Extracting {}...", company.nome);

            match self.api.fetch_statements(company.id).await {
                Ok(statements) if !statements.is_empty() => {
                    let cnpj = digits_only(&company.cnpj);
                    for statement in statements {
                        rows.push(self.to_row(statement, &cnpj));
                    }
                }
                Ok(_) => {
                    warn!("{} returned no statements; queueing for retry", company.nome);
                    retry_queue.push(company.clone());
                }
                Err(err) => {
                    warn!("statement fetch for {} failed ({err}); queueing for retry", company.nome);
                    retry_queue.push(company.clone());
                }
            }
        }

        retry_queue
    }

    /// Pure transform: statement item + sanitized CNPJ -> output row.
    fn to_row(&self, statement: StatementItem, cnpj: &str) -> StatementRow {
        StatementRow {
            nome_participante: statement.nome_participante,
            cnpj: cnpj.to_string(),
            tipo_demonstracao: statement.tipo_demonstracao,
            status: statement.status,
            data_fim: statement.data_fim,
            data_publicacao: statement.data_publicacao,
            pdf: pdf_url(self.api.base_url(), statement.id),
        }
    }
}
