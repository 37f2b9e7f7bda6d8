//! Statement filtering and PDF download
//!
//! Loads the persisted worksheet, applies the optional CNPJ allow-list,
//! statement-type, and publish-date filters, then fetches each surviving
//! row's document and writes it under a deterministic name. A failed document
//! fetch aborts the run; there is no per-document retry.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::client::{ClientError, HttpClient};
use crate::workbook::{self, WorkbookError};
use crate::StatementRow;

pub mod filename;

pub use filename::file_name;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A document fetch failed; not retried.
    #[error("failed to fetch PDF {url}: {source}")]
    Fetch {
        /// Document URL from the worksheet row
        url: String,
        /// Transport failure
        #[source]
        source: ClientError,
    },

    /// Worksheet could not be read
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    /// Filesystem error while writing a document
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Publish-date recency filter: keep one row per
/// `(nomeParticipante, tipoDemonstracao)` group by extreme timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PublishDate {
    /// Keep every publication
    #[default]
    All,
    /// Keep only the most recent publication per group
    Latest,
    /// Keep only the earliest publication per group
    Oldest,
}

impl FromStr for PublishDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(PublishDate::All),
            "latest" => Ok(PublishDate::Latest),
            "oldest" => Ok(PublishDate::Oldest),
            _ => Err(format!(
                "invalid publish date: {s}. Valid options: latest, oldest"
            )),
        }
    }
}

impl std::fmt::Display for PublishDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PublishDate::All => "all",
            PublishDate::Latest => "latest",
            PublishDate::Oldest => "oldest",
        };
        write!(f, "{s}")
    }
}

/// Download the PDFs of every worksheet row surviving the filters.
///
/// Returns the number of files written. Files land in `pdfs_directory`
/// (created if absent), named by [`file_name`]; name collisions overwrite.
pub async fn download_pdfs(
    client: &HttpClient,
    pdfs_directory: &Path,
    worksheet_path: &Path,
    sheet_name: &str,
    statement_type: &str,
    publish_date: PublishDate,
) -> Result<usize, DownloadError> {
    let table = workbook::read_statements(worksheet_path, sheet_name)?;
    let allow_list = workbook::read_filter_cnpjs(worksheet_path)?;
    let rows = filter_rows(table.rows().collect(), &allow_list, statement_type, publish_date);

    info!(
        "downloading {} PDFs to {} (type filter: {:?}, dates: {})",
        rows.len(),
        pdfs_directory.display(),
        statement_type,
        publish_date
    );

    std::fs::create_dir_all(pdfs_directory).map_err(|e| DownloadError::Io {
        path: pdfs_directory.display().to_string(),
        source: e,
    })?;

    let progress = ProgressBar::new(rows.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid progress template"),
    );

    let mut downloaded = 0;
    for row in &rows {
        progress.set_message(row.nome_participante.clone());

        let bytes = client
            .get_bytes(&row.pdf)
            .await
            .map_err(|source| DownloadError::Fetch {
                url: row.pdf.clone(),
                source,
            })?;

        let path = pdfs_directory.join(file_name(row));
        debug!("writing {}", path.display());
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| DownloadError::Io {
                path: path.display().to_string(),
                source: e,
            })?;

        downloaded += 1;
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!("downloaded {downloaded} PDFs");
    Ok(downloaded)
}

/// Apply the CNPJ allow-list, statement-type, and publish-date filters.
///
/// Output is in composite-key order regardless of input order.
pub fn filter_rows(
    mut rows: Vec<StatementRow>,
    allow_list: &Option<HashSet<String>>,
    statement_type: &str,
    publish_date: PublishDate,
) -> Vec<StatementRow> {
    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    if let Some(cnpjs) = allow_list {
        rows.retain(|row| cnpjs.contains(&row.cnpj));
    }

    if !statement_type.is_empty() {
        rows.retain(|row| row.tipo_demonstracao == statement_type);
    }

    match publish_date {
        PublishDate::All => rows,
        PublishDate::Latest => select_by_recency(rows, true),
        PublishDate::Oldest => select_by_recency(rows, false),
    }
}

/// Keep one row per `(nomeParticipante, tipoDemonstracao)` group.
///
/// Input must be sorted by the composite key, so groups are contiguous and
/// timestamps ascend within each group. Ties keep the row that sorts first.
fn select_by_recency(rows: Vec<StatementRow>, latest: bool) -> Vec<StatementRow> {
    let mut selected: Vec<StatementRow> = Vec::new();

    for row in rows {
        match selected.last_mut() {
            Some(current)
                if current.nome_participante == row.nome_participante
                    && current.tipo_demonstracao == row.tipo_demonstracao =>
            {
                if latest && row.data_publicacao > current.data_publicacao {
                    *current = row;
                }
                // oldest: the first row of an ascending group already wins
            }
            _ => selected.push(row),
        }
    }

    selected
}
