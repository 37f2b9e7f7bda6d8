//! XLSX persistence
//!
//! Writes the statement table to a single-sheet workbook with auto-sized
//! columns, reads it back for the download phase, and reads the optional
//! `cnpjs` allow-list sheet. Every cell is treated as text on both paths;
//! in particular the `cnpj` column never becomes numeric, so leading zeros
//! survive a round trip.

use std::collections::HashSet;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use tracing::{debug, info};

use crate::digits_only;
use crate::extract::table::{StatementTable, COLUMNS};
use crate::StatementRow;

/// Sheet name of the optional download allow-list.
pub const FILTER_SHEET: &str = "cnpjs";

/// Header of the allow-list column.
pub const FILTER_COLUMN: &str = "cnpj";

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum WorkbookError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(String),

    /// XLSX write error
    #[error("XLSX write error: {0}")]
    Write(String),

    /// XLSX read error
    #[error("XLSX read error: {0}")]
    Read(String),

    /// Requested sheet not present in the workbook
    #[error("sheet {0:?} not found in {1}")]
    MissingSheet(String, String),

    /// Expected column header not present in the sheet
    #[error("column {0:?} missing from sheet {1:?}")]
    MissingColumn(String, String),

    /// Sheet has a header but no data rows
    #[error("sheet {0:?} contains no data rows")]
    EmptySheet(String),
}

/// Result type for persistence operations
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Write the table to `path` as a single-sheet workbook.
///
/// Parent directories are created as needed; an existing file is overwritten.
/// Each column is sized to the longest cell rendering (or the header, if
/// longer) plus one character unit.
pub fn write_statements(
    table: &StatementTable,
    path: &Path,
    sheet_name: &str,
) -> WorkbookResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WorkbookError::Io(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
    }

    info!("writing {} rows to {}", table.len(), path.display());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet
        .set_name(sheet_name)
        .map_err(|e| WorkbookError::Write(e.to_string()))?;

    for (col, header) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        let cells = table
            .column(header)
            .expect("table columns match the header list");

        sheet
            .write_string(0, col, *header)
            .map_err(|e| WorkbookError::Write(e.to_string()))?;

        let mut max_len = header.chars().count();
        for (row, cell) in cells.iter().enumerate() {
            max_len = max_len.max(cell.chars().count());
            sheet
                .write_string(row as u32 + 1, col, cell)
                .map_err(|e| WorkbookError::Write(e.to_string()))?;
        }

        sheet
            .set_column_width(col, (max_len + 1) as f64)
            .map_err(|e| WorkbookError::Write(e.to_string()))?;
    }

    workbook
        .save(path)
        .map_err(|e| WorkbookError::Write(e.to_string()))?;

    Ok(())
}

/// Read the statement sheet back into a table.
///
/// Blank cells are forward-filled column-wise before rows are built: a
/// company's repeated name and CNPJ are often elided visually in source
/// worksheets and must be propagated downward before filtering.
pub fn read_statements(path: &Path, sheet_name: &str) -> WorkbookResult<StatementTable> {
    let mut reader = open_reader(path)?;
    let range = sheet_range(&mut reader, path, sheet_name)?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = rows_iter
        .next()
        .map(|cells| cells.iter().map(render_cell).collect())
        .unwrap_or_default();

    let indices: Vec<usize> = COLUMNS
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| {
                    WorkbookError::MissingColumn(name.to_string(), sheet_name.to_string())
                })
        })
        .collect::<WorkbookResult<_>>()?;

    let mut last_seen: Vec<String> = vec![String::new(); headers.len()];
    let mut rows = Vec::new();

    for cells in rows_iter {
        let mut values: Vec<String> = Vec::with_capacity(headers.len());
        for col in 0..headers.len() {
            let rendered = cells.get(col).map(render_cell).unwrap_or_default();
            if rendered.is_empty() {
                values.push(last_seen[col].clone());
            } else {
                last_seen[col] = rendered.clone();
                values.push(rendered);
            }
        }

        rows.push(StatementRow {
            nome_participante: values[indices[0]].clone(),
            cnpj: values[indices[1]].clone(),
            tipo_demonstracao: values[indices[2]].clone(),
            status: values[indices[3]].clone(),
            data_fim: values[indices[4]].clone(),
            data_publicacao: values[indices[5]].clone(),
            pdf: values[indices[6]].clone(),
        });
    }

    debug!("read {} rows from {}", rows.len(), path.display());

    StatementTable::from_rows(rows)
        .map_err(|_| WorkbookError::EmptySheet(sheet_name.to_string()))
}

/// Read the download allow-list from the `cnpjs` sheet, if present.
///
/// Returns `None` when the sheet is absent (no filtering applied). Values are
/// stripped to digits, so both formatted and bare CNPJs match.
pub fn read_filter_cnpjs(path: &Path) -> WorkbookResult<Option<HashSet<String>>> {
    let mut reader = open_reader(path)?;

    if !reader.sheet_names().iter().any(|name| name == FILTER_SHEET) {
        return Ok(None);
    }

    let range = sheet_range(&mut reader, path, FILTER_SHEET)?;
    let mut rows_iter = range.rows();

    let header_col = rows_iter
        .next()
        .and_then(|cells| {
            cells
                .iter()
                .position(|cell| render_cell(cell) == FILTER_COLUMN)
        })
        .ok_or_else(|| {
            WorkbookError::MissingColumn(FILTER_COLUMN.to_string(), FILTER_SHEET.to_string())
        })?;

    let cnpjs: HashSet<String> = rows_iter
        .filter_map(|cells| {
            let rendered = cells.get(header_col).map(render_cell)?;
            let digits = digits_only(&rendered);
            (!digits.is_empty()).then_some(digits)
        })
        .collect();

    info!("download allow-list contains {} CNPJs", cnpjs.len());
    Ok(Some(cnpjs))
}

fn open_reader(path: &Path) -> WorkbookResult<Xlsx<std::io::BufReader<std::fs::File>>> {
    open_workbook(path)
        .map_err(|e| WorkbookError::Io(format!("failed to open {}: {e}", path.display())))
}

fn sheet_range(
    reader: &mut Xlsx<std::io::BufReader<std::fs::File>>,
    path: &Path,
    sheet_name: &str,
) -> WorkbookResult<calamine::Range<Data>> {
    if !reader.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(WorkbookError::MissingSheet(
            sheet_name.to_string(),
            path.display().to_string(),
        ));
    }
    reader
        .worksheet_range(sheet_name)
        .map_err(|e| WorkbookError::Read(e.to_string()))
}

/// Render any cell as text.
///
/// Integral floats (how spreadsheet tools store hand-typed CNPJs) are rendered
/// without a decimal point so digit filtering sees the full number.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}
