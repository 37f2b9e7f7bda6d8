//! End-to-end extraction: mock registry -> retry engine -> table -> worksheet

use central_balancos::client::HttpClient;
use central_balancos::extract::{table::StatementTable, Extractor};
use central_balancos::registry::{CompanySelector, RegistryClient};
use central_balancos::workbook;
use httpmock::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn statement_json(id: i64, nome: &str, tipo: &str, publicacao: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nomeParticipante": nome,
        "tipoDemonstracao": tipo,
        "status": "Publicado",
        "dataFim": "2022-12-31T00:00:00",
        "dataPublicacao": publicacao
    })
}

#[tokio::test]
async fn extract_full_catalog_and_persist() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/centralbalancos/servicesapi/api/Participante");
            then.status(200).json_body(json!({
                "items": [
                    {"id": 1, "cnpj": "12.345.678/0001-99", "nome": "EMPRESA B"},
                    {"id": 2, "cnpj": "00.123.456/0001-00", "nome": "EMPRESA A"}
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/centralbalancos/servicesapi/api/Demonstracao/1/0/0");
            then.status(200).json_body(json!({
                "items": [
                    statement_json(10, "EMPRESA B", "Balanço Patrimonial (BP)", "2023-06-21T11:24:32.34"),
                    statement_json(11, "EMPRESA B", "Demonstração do Resultado do Exercício (DRE)", "2023-06-21T11:25:00.00")
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/centralbalancos/servicesapi/api/Demonstracao/2/0/0");
            then.status(200).json_body(json!({
                "items": [
                    statement_json(20, "EMPRESA A", "Balanço Patrimonial (BP)", "2023-01-15T09:00:00.00")
                ]
            }));
        })
        .await;

    let api = RegistryClient::with_base_url(HttpClient::new().unwrap(), server.base_url());
    let rows = Extractor::new(api)
        .extract(&CompanySelector::All)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    let table = StatementTable::from_rows(rows).unwrap();

    // Sorted by participant name despite catalog order.
    assert_eq!(
        table.column("nomeParticipante").unwrap(),
        ["EMPRESA A", "EMPRESA B", "EMPRESA B"]
    );
    // CNPJs are digit-stripped, text, leading zeros intact.
    assert_eq!(
        table.column("cnpj").unwrap(),
        ["00123456000100", "12345678000199", "12345678000199"]
    );
    // Document URLs are derived from statement ids on the same host.
    assert_eq!(
        table.column("pdf").unwrap()[0],
        format!(
            "{}/centralbalancos/servicesapi/api/Demonstracao/pdf/20",
            server.base_url()
        )
    );

    // Persist and read back: row-for-row equal.
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("demonstracoes.xlsx");
    workbook::write_statements(&table, &path, "demonstracoes").unwrap();
    let read_back = workbook::read_statements(&path, "demonstracoes").unwrap();
    assert_eq!(read_back, table);
}

#[tokio::test]
async fn extract_single_company_uses_lookup_endpoint() {
    let server = MockServer::start_async().await;

    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/centralbalancos/servicesapi/api/Participante/12345678000199");
            then.status(200).json_body(json!({
                "items": [{"id": 7, "cnpj": "12.345.678/0001-99", "nome": "EMPRESA UNICA"}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/centralbalancos/servicesapi/api/Demonstracao/7/0/0");
            then.status(200).json_body(json!({
                "items": [statement_json(70, "EMPRESA UNICA", "BP", "2023-06-21T11:24:32.34")]
            }));
        })
        .await;

    let api = RegistryClient::with_base_url(HttpClient::new().unwrap(), server.base_url());
    let selector = CompanySelector::Cnpj("12345678000199".to_string());
    let rows = Extractor::new(api).extract(&selector).await.unwrap();

    lookup.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].nome_participante, "EMPRESA UNICA");
}

#[tokio::test]
async fn company_list_failure_aborts_the_run() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/centralbalancos/servicesapi/api/Participante");
            then.status(500).body("boom");
        })
        .await;

    let api = RegistryClient::with_base_url(HttpClient::new().unwrap(), server.base_url());
    let result = Extractor::new(api).extract(&CompanySelector::All).await;
    assert!(result.is_err());
}
