//! Filter-and-download pipeline against a mock document endpoint

use central_balancos::client::HttpClient;
use central_balancos::pdfs::{self, PublishDate};
use httpmock::prelude::*;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

const HEADERS: [&str; 7] = [
    "nomeParticipante",
    "cnpj",
    "tipoDemonstracao",
    "status",
    "dataFim",
    "dataPublicacao",
    "pdf",
];

/// Write a statements workbook by hand, optionally with a `cnpjs` allow-list
/// sheet, the way an end user would author one.
fn write_workbook(path: &Path, rows: &[[&str; 7]], allow_list: Option<&[&str]>) {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("demonstracoes").unwrap();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet
                .write_string(row_idx as u32 + 1, col as u16, *value)
                .unwrap();
        }
    }

    if let Some(cnpjs) = allow_list {
        let filter = workbook.add_worksheet();
        filter.set_name("cnpjs").unwrap();
        filter.write_string(0, 0, "cnpj").unwrap();
        for (idx, cnpj) in cnpjs.iter().enumerate() {
            filter.write_string(idx as u32 + 1, 0, *cnpj).unwrap();
        }
    }

    workbook.save(path).unwrap();
}

#[tokio::test]
async fn downloads_every_row_without_filters() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/1");
            then.status(200).body("%PDF-1.4 one");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/2");
            then.status(200).body("%PDF-1.4 two");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let worksheet = dir.path().join("demonstracoes.xlsx");
    let pdf_1 = server.url("/pdf/1");
    let pdf_2 = server.url("/pdf/2");
    write_workbook(
        &worksheet,
        &[
            [
                "EMPRESA A",
                "111",
                "Balanço Patrimonial (BP)",
                "Publicado",
                "2022-12-31T00:00:00",
                "2023-06-21T11:24:32.34",
                &pdf_1,
            ],
            [
                "EMPRESA B",
                "222",
                "Balanço Patrimonial (BP)",
                "Publicado",
                "2022-12-31T00:00:00",
                "2023-06-22T08:00:00.00",
                &pdf_2,
            ],
        ],
        None,
    );

    let pdfs_dir = dir.path().join("pdfs");
    let client = HttpClient::new().unwrap();
    let downloaded = pdfs::download_pdfs(
        &client,
        &pdfs_dir,
        &worksheet,
        "demonstracoes",
        "",
        PublishDate::All,
    )
    .await
    .unwrap();

    assert_eq!(downloaded, 2);
    let a = pdfs_dir.join("EMPRESA_A_BP_2023_06_21.pdf");
    let b = pdfs_dir.join("EMPRESA_B_BP_2023_06_22.pdf");
    assert_eq!(std::fs::read(a).unwrap(), b"%PDF-1.4 one");
    assert_eq!(std::fs::read(b).unwrap(), b"%PDF-1.4 two");
}

#[tokio::test]
async fn allow_list_restricts_downloads() {
    let server = MockServer::start_async().await;
    let allowed = server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/1");
            then.status(200).body("%PDF-1.4 one");
        })
        .await;
    let excluded = server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/2");
            then.status(200).body("%PDF-1.4 two");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let worksheet = dir.path().join("demonstracoes.xlsx");
    let pdf_1 = server.url("/pdf/1");
    let pdf_2 = server.url("/pdf/2");
    write_workbook(
        &worksheet,
        &[
            [
                "EMPRESA A",
                "111",
                "Balanço Patrimonial (BP)",
                "Publicado",
                "2022-12-31T00:00:00",
                "2023-06-21T11:24:32.34",
                &pdf_1,
            ],
            [
                "EMPRESA B",
                "222",
                "Balanço Patrimonial (BP)",
                "Publicado",
                "2022-12-31T00:00:00",
                "2023-06-22T08:00:00.00",
                &pdf_2,
            ],
        ],
        Some(&["111"]),
    );

    let pdfs_dir = dir.path().join("pdfs");
    let client = HttpClient::new().unwrap();
    let downloaded = pdfs::download_pdfs(
        &client,
        &pdfs_dir,
        &worksheet,
        "demonstracoes",
        "",
        PublishDate::All,
    )
    .await
    .unwrap();

    assert_eq!(downloaded, 1);
    assert_eq!(allowed.hits_async().await, 1);
    assert_eq!(excluded.hits_async().await, 0);
    assert!(pdfs_dir.join("EMPRESA_A_BP_2023_06_21.pdf").exists());
    assert!(!pdfs_dir.join("EMPRESA_B_BP_2023_06_22.pdf").exists());
}

#[tokio::test]
async fn latest_filter_downloads_one_file_per_group() {
    let server = MockServer::start_async().await;
    let newest = server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/new");
            then.status(200).body("%PDF-1.4 new");
        })
        .await;
    let older = server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/old");
            then.status(200).body("%PDF-1.4 old");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let worksheet = dir.path().join("demonstracoes.xlsx");
    let pdf_new = server.url("/pdf/new");
    let pdf_old = server.url("/pdf/old");
    write_workbook(
        &worksheet,
        &[
            [
                "EMPRESA A",
                "111",
                "Balanço Patrimonial (BP)",
                "Publicado",
                "2021-12-31T00:00:00",
                "2022-06-01T00:00:00.00",
                &pdf_old,
            ],
            [
                "EMPRESA A",
                "111",
                "Balanço Patrimonial (BP)",
                "Publicado",
                "2022-12-31T00:00:00",
                "2023-06-21T11:24:32.34",
                &pdf_new,
            ],
        ],
        None,
    );

    let pdfs_dir = dir.path().join("pdfs");
    let client = HttpClient::new().unwrap();
    let downloaded = pdfs::download_pdfs(
        &client,
        &pdfs_dir,
        &worksheet,
        "demonstracoes",
        "",
        PublishDate::Latest,
    )
    .await
    .unwrap();

    assert_eq!(downloaded, 1);
    assert_eq!(newest.hits_async().await, 1);
    assert_eq!(older.hits_async().await, 0);
}

#[tokio::test]
async fn failed_document_fetch_aborts_the_run() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pdf/1");
            then.status(500).body("boom");
        })
        .await;

    let dir = TempDir::new().unwrap();
    let worksheet = dir.path().join("demonstracoes.xlsx");
    let pdf_1 = server.url("/pdf/1");
    write_workbook(
        &worksheet,
        &[[
            "EMPRESA A",
            "111",
            "Balanço Patrimonial (BP)",
            "Publicado",
            "2022-12-31T00:00:00",
            "2023-06-21T11:24:32.34",
            &pdf_1,
        ]],
        None,
    );

    let client = HttpClient::new().unwrap();
    let result = pdfs::download_pdfs(
        &client,
        &dir.path().join("pdfs"),
        &worksheet,
        "demonstracoes",
        "",
        PublishDate::All,
    )
    .await;

    assert!(matches!(result, Err(pdfs::DownloadError::Fetch { .. })));
}
