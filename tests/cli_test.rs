use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn ledger() -> Command {
    let mut cmd = Command::new(cargo_bin!("contractor-ledger"));
    cmd.env_remove("RUST_LOG")
        .arg("--ledger")
        .arg("tests/fixtures/ledger.json");
    cmd
}

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = ledger();
    cmd.arg("process").arg("tests/fixtures/requests.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("profile,role,balance"))
        .stdout(predicate::str::contains("1,client,949"))
        .stdout(predicate::str::contains("2,client,281.11"))
        .stdout(predicate::str::contains("4,client,1.3"))
        .stdout(predicate::str::contains("6,contractor,1415"))
        .stderr(predicate::str::contains("status=200"))
        .stderr(predicate::str::contains("status=401"))
        .stderr(predicate::str::contains("status=403"))
        .stderr(predicate::str::contains("status=404"))
        .stderr(predicate::str::contains("status=409"))
        .stderr(predicate::str::contains("Error reading request"));

    Ok(())
}

#[test]
fn test_balances_without_requests() {
    let mut cmd = ledger();
    cmd.arg("balances");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,client,1150"))
        .stdout(predicate::str::contains("8,contractor,314"));
}

#[test]
fn test_invalid_amounts_are_rejected() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "op, profile, target, amount").unwrap();
    writeln!(csv, "deposit, , 2, not_a_number").unwrap();
    writeln!(csv, "deposit, , 2, -5").unwrap();
    writeln!(csv, "deposit, , 2, 10").unwrap();

    let mut cmd = ledger();
    cmd.arg("process").arg(csv.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("status=400"))
        .stdout(predicate::str::contains("2,client,241.11"));
}

#[test]
fn test_report_best_profession() {
    let mut cmd = ledger();
    cmd.args([
        "report",
        "best-profession",
        "--start",
        "2020-08-01",
        "--end",
        "2020-08-31",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"profession\": \"Programmer\""))
        .stdout(predicate::str::contains("\"earned\": \"2704\""));
}

#[test]
fn test_report_best_clients() {
    let mut cmd = ledger();
    cmd.args([
        "report",
        "best-clients",
        "--start",
        "2020-08-01",
        "--end",
        "2020-08-31",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Ash Kethcum"))
        .stdout(predicate::str::contains("Harry Potter"))
        .stdout(predicate::str::contains("Mr Robot").not());
}

#[test]
fn test_report_limit_from_config() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[reports]\nbest_clients_limit = 1").unwrap();

    let mut cmd = ledger();
    cmd.arg("--config").arg(config.path()).args([
        "report",
        "best-clients",
        "--start",
        "2020-08-01",
        "--end",
        "2020-08-31",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Ash Kethcum"))
        .stdout(predicate::str::contains("Harry Potter").not());
}

#[test]
fn test_report_failures_carry_status() {
    let mut cmd = ledger();
    cmd.args(["report", "contract", "--profile", "1", "3"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": 404"));

    let mut cmd = ledger();
    cmd.args(["report", "contracts", "--profile", "99"]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": 401"));

    let mut cmd = ledger();
    cmd.args([
        "report",
        "best-profession",
        "--start",
        "2020-09-01",
        "--end",
        "2020-08-01",
    ]);
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": 400"));
}

#[test]
fn test_invalid_seed_is_fatal() {
    let mut seed = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        seed,
        r#"{{"profiles": [{{"id": 1, "first_name": "A", "last_name": "B", "profession": "", "role": "client", "balance": "-1"}}]}}"#
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("contractor-ledger"));
    cmd.arg("--ledger").arg(seed.path()).arg("balances");

    cmd.assert().failure();
}
