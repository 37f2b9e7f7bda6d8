//! CLI argument validation: bad input is rejected before any network activity

use assert_cmd::Command;

#[test]
fn invalid_cnpj_is_rejected_at_parse_time() {
    let mut cmd = Command::cargo_bin("central-balancos").unwrap();
    cmd.arg("extract")
        .arg("--cnpj")
        .arg("12.345.678/0001-99")
        .assert()
        .failure()
        .stderr(predicates::str::contains("valid CNPJ"));
}

#[test]
fn invalid_publish_date_is_rejected_at_parse_time() {
    let mut cmd = Command::cargo_bin("central-balancos").unwrap();
    cmd.arg("download")
        .arg("--publish-date")
        .arg("newest")
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid publish date"));
}

#[test]
fn help_lists_both_commands() {
    let mut cmd = Command::cargo_bin("central-balancos").unwrap();
    let assert = cmd.arg("--help").assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("extract"));
    assert!(output.contains("download"));
}
