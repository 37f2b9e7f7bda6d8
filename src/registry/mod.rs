//! Central de Balanços registry API surface
//!
//! URL builders for the three read endpoints, the wire types they return, and
//! the [`RegistryApi`] trait the fetch engine consumes. The production
//! implementation is [`RegistryClient`]; tests substitute stubs.

use async_trait::async_trait;
use serde::Deserialize;

use crate::client::{ClientError, HttpClient};

/// Production registry host
pub const BASE_URL: &str = "https://centraldebalancos.estaleiro.serpro.gov.br";

/// Page size for catalog requests.
///
/// Large enough to cover the whole catalog (~8.5k participants) in a single
/// page, so no pagination loop is needed.
pub const PAGE_SIZE: u32 = 10_000;

/// Which companies to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanySelector {
    /// The full catalog
    All,
    /// A single company, looked up by its CNPJ (digits only)
    Cnpj(String),
}

/// A paginated registry response.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
}

/// A registry participant (company).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Opaque registry identifier
    pub id: i64,
    /// Tax id as formatted by the registry, e.g. `12.345.678/0001-99`
    pub cnpj: String,
    /// Company name
    pub nome: String,
}

/// One statement entry from the per-company statement list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementItem {
    /// Statement identifier; the PDF endpoint is keyed by it
    pub id: i64,
    /// Participant name as repeated on the statement
    pub nome_participante: String,
    /// Statement type, e.g. "Balanço Patrimonial (BP)"
    pub tipo_demonstracao: String,
    /// Publication status
    pub status: String,
    /// Period end date
    pub data_fim: String,
    /// Publication timestamp
    pub data_publicacao: String,
}

/// Participant list URL: full catalog or single-CNPJ lookup.
pub fn participants_url(base_url: &str, selector: &CompanySelector) -> String {
    match selector {
        CompanySelector::All => format!(
            "{base_url}/centralbalancos/servicesapi/api/Participante\
             ?page=1&pageSize={PAGE_SIZE}&orderBy=nome"
        ),
        CompanySelector::Cnpj(cnpj) => {
            format!("{base_url}/centralbalancos/servicesapi/api/Participante/{cnpj}")
        }
    }
}

/// Statement list URL for one company.
pub fn statements_url(base_url: &str, company_id: i64) -> String {
    format!(
        "{base_url}/centralbalancos/servicesapi/api/Demonstracao\
         /{company_id}/0/0?page=1&pageSize={PAGE_SIZE}"
    )
}

/// PDF document URL for one statement.
pub fn pdf_url(base_url: &str, statement_id: i64) -> String {
    format!("{base_url}/centralbalancos/servicesapi/api/Demonstracao/pdf/{statement_id}")
}

/// Read access to the registry catalog.
///
/// Both calls are single-shot; the retry policy lives in the fetch engine, not
/// here.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Fetch the participant list (or a single participant).
    async fn fetch_companies(
        &self,
        selector: &CompanySelector,
    ) -> Result<Vec<Participant>, ClientError>;

    /// Fetch one company's statement list.
    async fn fetch_statements(&self, company_id: i64) -> Result<Vec<StatementItem>, ClientError>;

    /// Base URL used to derive document URLs.
    fn base_url(&self) -> &str;
}

/// Registry client backed by [`HttpClient`].
pub struct RegistryClient {
    http: HttpClient,
    base_url: String,
}

impl RegistryClient {
    /// Create a client against the production registry.
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, BASE_URL)
    }

    /// Create a client against an alternate host (used by tests).
    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn fetch_companies(
        &self,
        selector: &CompanySelector,
    ) -> Result<Vec<Participant>, ClientError> {
        let url = participants_url(&self.base_url, selector);
        let page: Page<Participant> = self.http.get_json(&url).await?;
        Ok(page.items)
    }

    async fn fetch_statements(&self, company_id: i64) -> Result<Vec<StatementItem>, ClientError> {
        let url = statements_url(&self.base_url, company_id);
        let page: Page<StatementItem> = self.http.get_json(&url).await?;
        Ok(page.items)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
