use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use paylane_ipn::domain::hash::outgoing_hash;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn process(csv: &NamedTempFile, settings: &str) -> Command {
    let mut cmd = Command::new(cargo_bin!("paylane-ipn"));
    cmd.args([
        "--settings",
        settings,
        "--state",
        "tests/fixtures/state.json",
        "process",
    ])
    .arg(csv.path());
    cmd
}

#[test]
fn test_malformed_rows_skipped() {
    let hash = outgoing_hash("s3cr3t", "NGHSTR-42", "19.99", "EUR", "S");
    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "transaction_id, bb_invoice_id, bb_gateway_id, id_sale, status, amount, currency, hash").unwrap();
    // Non-numeric transaction id
    writeln!(csv, "abc, 42, 3, SALE0, PERFORMED, 19.99, EUR, {hash}").unwrap();
    // Amount that is not a number
    writeln!(csv, "1, 42, 3, SALE0, PERFORMED, lots, EUR, {hash}").unwrap();
    // Unknown invoice
    writeln!(csv, "1, 404, 3, SALE0, PERFORMED, 19.99, EUR, {hash}").unwrap();
    // Valid notification
    writeln!(csv, "2, 42, 3, SALE2, PERFORMED, 19.99, EUR, {hash}").unwrap();

    process(&csv, "tests/fixtures/settings.json")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error reading notification"))
        .stderr(predicate::str::contains("Invoice #404 not found"))
        .stdout(predicate::str::contains("1,,,,,"))
        .stdout(predicate::str::contains("2,42,SALE2,PERFORMED,19.99,EUR"));
}

#[test]
fn test_invalid_settings_rejected() {
    let mut settings = NamedTempFile::new().unwrap();
    writeln!(settings, r#"{{"redirection_method": "PUT", "merchant_id": "m", "hash": "s"}}"#)
        .unwrap();
    let csv = NamedTempFile::new().unwrap();

    process(&csv, settings.path().to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("POST"));
}
