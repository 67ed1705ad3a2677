use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("subtrack_cli").expect("binary builds");
    cmd.env("SUBTRACK_HOME", home.path());
    cmd.env("SUBTRACK_PLAIN", "1");
    cmd
}

#[test]
fn help_lists_the_commands() {
    let home = TempDir::new().expect("temp dir");
    cli(&home)
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("schedule"));
}

#[test]
fn added_subscriptions_show_up_in_list() {
    let home = TempDir::new().expect("temp dir");
    cli(&home)
        .args([
            "add",
            "Netflix",
            "1490",
            "JPY",
            "monthly",
            "entertainment",
            "2024-01-31",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("added `Netflix`"));

    cli(&home)
        .args(["list", "--name", "net"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Netflix"));

    cli(&home)
        .args(["list", "--name", "spotify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no subscriptions matched"));
}

#[test]
fn unknown_currency_is_reported_as_an_error() {
    let home = TempDir::new().expect("temp dir");
    cli(&home)
        .args([
            "add",
            "Mystery",
            "10",
            "EUR",
            "monthly",
            "other",
            "2024-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("currency"));
}

#[test]
fn month_total_uses_the_configured_rate() {
    let home = TempDir::new().expect("temp dir");
    cli(&home)
        .args(["config", "rate", "150"])
        .assert()
        .success();
    cli(&home)
        .args([
            "add",
            "Domain",
            "10",
            "USD",
            "yearly",
            "work",
            "2024-03-10",
        ])
        .assert()
        .success();
    cli(&home)
        .args(["month", "2025-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("¥1,500"));
}
