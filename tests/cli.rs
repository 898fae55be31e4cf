use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "cash-envelope";

fn command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("CASH_ENVELOPE_DATA_DIR", home.path())
        .env_remove("CASH_ENVELOPE_OWNER")
        .env_remove("RUST_LOG");
    cmd
}

fn run(home: &TempDir, args: &[&str]) {
    command(home).args(args).assert().success();
}

/// Initialized store with Principal 50%, Ahorro 30%, Gastos remainder and a
/// monthly Internet expense of 15.00
fn standard_home() -> TempDir {
    let home = TempDir::new().expect("temp dir");
    run(&home, &["init"]);
    run(&home, &["account", "create", "Principal", "--percent", "50"]);
    run(&home, &["account", "create", "Ahorro", "--percent", "30"]);
    run(&home, &["account", "create", "Gastos", "--remainder"]);
    run(&home, &["expense", "add", "Internet", "15.00"]);
    home
}

#[test]
fn commands_require_init() {
    let home = TempDir::new().expect("temp dir");
    command(&home)
        .args(["account", "list"])
        .assert()
        .failure()
        .stderr(contains("not initialized"));
}

#[test]
fn init_creates_default_owner() {
    let home = TempDir::new().expect("temp dir");
    command(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete"));

    command(&home)
        .args(["owner", "list"])
        .assert()
        .success()
        .stdout(contains("default"));
}

#[test]
fn deposit_preview_does_not_save() {
    let home = standard_home();

    command(&home)
        .args(["deposit", "--preview", "50=2"])
        .assert()
        .success()
        .stdout(contains("$42.50").and(contains("Preview only")));

    command(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("No transactions found."));
}

#[test]
fn deposit_distributes_by_percentage() {
    let home = standard_home();

    command(&home)
        .args(["deposit", "50=2"])
        .assert()
        .success()
        .stdout(contains("Reserved for expenses: $15.00").and(contains("Pending cash: $100.00")));

    command(&home)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(
            contains("$42.50")
                .and(contains("$25.50"))
                .and(contains("$17.00"))
                .and(contains("Total: $100.00")),
        );
}

#[test]
fn deposit_rejects_bad_input() {
    let home = standard_home();

    command(&home)
        .args(["deposit", "10=1"])
        .assert()
        .failure()
        .stderr(contains("does not cover expenses"));

    command(&home)
        .args(["deposit", "3=1"])
        .assert()
        .failure()
        .stderr(contains("unknown denomination"));

    command(&home)
        .args(["deposit", "fifty"])
        .assert()
        .failure()
        .stderr(contains("KEY=COUNT"));
}

#[test]
fn withdraw_and_history() {
    let home = standard_home();
    run(&home, &["deposit", "20=5"]);

    command(&home)
        .args(["withdraw", "Principal", "20=1", "-d", "Mercado"])
        .assert()
        .success()
        .stdout(contains("Withdrew $20.00"));

    command(&home)
        .args(["withdraw", "Principal", "20=5"])
        .assert()
        .failure()
        .stderr(contains("Not enough cash in 'Principal'"));

    command(&home)
        .args(["history", "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("Mercado").and(contains("Deposit").not()));
}

#[test]
fn history_audit_shows_postings() {
    let home = standard_home();
    run(&home, &["deposit", "50=2"]);

    command(&home)
        .args(["history", "--audit", "--limit", "1"])
        .assert()
        .success()
        .stdout(contains("TransactionGroup").and(contains("Deposit for default")));
}

#[test]
fn deposit_rejects_malformed_denomination_keys() {
    let home = standard_home();

    for arg in ["0.5\u{e9}=1", "0.019=1", "$50=1"] {
        command(&home)
            .args(["deposit", arg])
            .assert()
            .failure()
            .stderr(contains("unknown denomination"));
    }

    command(&home)
        .args(["deposit", "50=2000000000000000"])
        .assert()
        .failure()
        .stderr(contains("exceeds the limit"));
}

#[test]
fn transfer_and_settle() {
    let home = standard_home();
    run(&home, &["deposit", "20=5"]);

    command(&home)
        .args(["transfer", "Principal", "Gastos", "20=1"])
        .assert()
        .success()
        .stdout(contains("Transferred $20.00"));

    command(&home)
        .arg("settle")
        .assert()
        .success()
        .stdout(contains("Pending cash"));
}

#[test]
fn export_formats() {
    let home = standard_home();
    run(&home, &["deposit", "50=2"]);

    command(&home)
        .args(["export", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"schema_version\": \"1.0.0\""));

    command(&home)
        .args(["export", "--format", "csv"])
        .assert()
        .success()
        .stdout(contains("group_id,posted_at").and(contains("Internet")));

    let output = home.path().join("ledger.yaml");
    command(&home)
        .args(["export", "--format", "yaml", "-o"])
        .arg(&output)
        .assert()
        .success();
    let yaml = std::fs::read_to_string(&output).expect("export written");
    assert!(yaml.contains("transaction_groups"));
}

#[test]
fn second_owner_is_isolated() {
    let home = standard_home();
    run(&home, &["owner", "create", "luis"]);
    run(&home, &["--owner", "luis", "account", "create", "Todo", "--remainder"]);
    run(&home, &["--owner", "luis", "deposit", "20=1"]);

    command(&home)
        .args(["--owner", "luis", "account", "list"])
        .assert()
        .success()
        .stdout(contains("Todo").and(contains("Principal").not()));

    command(&home)
        .args(["--owner", "nadie", "account", "list"])
        .assert()
        .failure()
        .stderr(contains("Cannot select owner 'nadie'"));
}
