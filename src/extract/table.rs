//! Column-oriented statement table
//!
//! Transposes a flat row sequence into column-oriented storage sorted by the
//! composite key `(nomeParticipante, tipoDemonstracao, dataPublicacao)`. The
//! sort is stable so equal keys keep their fetch order, which makes worksheet
//! output reproducible across runs.

use crate::StatementRow;

use super::ExtractError;

/// Worksheet column headers, in output order.
pub const COLUMNS: [&str; 7] = [
    "nomeParticipante",
    "cnpj",
    "tipoDemonstracao",
    "status",
    "dataFim",
    "dataPublicacao",
    "pdf",
];

/// Column-oriented projection of an ordered statement sequence.
///
/// The `cnpj` column is text throughout; it never passes through a numeric
/// type, so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementTable {
    columns: Vec<Vec<String>>,
}

impl StatementTable {
    /// Build a table from rows, sorting by the composite key.
    ///
    /// Fails with [`ExtractError::EmptyTable`] on empty input: a table with no
    /// rows has no derivable column set.
    pub fn from_rows(mut rows: Vec<StatementRow>) -> Result<Self, ExtractError> {
        if rows.is_empty() {
            return Err(ExtractError::EmptyTable);
        }

        // Vec::sort_by is stable; ties keep fetch order.
        rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut columns: Vec<Vec<String>> = (0..COLUMNS.len())
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for row in rows {
            columns[0].push(row.nome_participante);
            columns[1].push(row.cnpj);
            columns[2].push(row.tipo_demonstracao);
            columns[3].push(row.status);
            columns[4].push(row.data_fim);
            columns[5].push(row.data_publicacao);
            columns[6].push(row.pdf);
        }

        Ok(Self { columns })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    /// Whether the table has no rows. Cannot happen for a constructed table;
    /// present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cells of one column, by header name.
    pub fn column(&self, name: &str) -> Option<&[String]> {
        let idx = COLUMNS.iter().position(|header| *header == name)?;
        Some(&self.columns[idx])
    }

    /// Reconstitute the row at `index`.
    pub fn row(&self, index: usize) -> StatementRow {
        StatementRow {
            nome_participante: self.columns[0][index].clone(),
            cnpj: self.columns[1][index].clone(),
            tipo_demonstracao: self.columns[2][index].clone(),
            status: self.columns[3][index].clone(),
            data_fim: self.columns[4][index].clone(),
            data_publicacao: self.columns[5][index].clone(),
            pdf: self.columns[6][index].clone(),
        }
    }

    /// Iterate over all rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = StatementRow> + '_ {
        (0..self.len()).map(|index| self.row(index))
    }
}
