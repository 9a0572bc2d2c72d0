//! CLI end-to-end tests that invoke the compiled `kpush` binary.
//!
//! Every test points `KPUSH_HOME` at a fresh [`TestHome`]. None of them
//! reach `kubectl`: pushes run against empty source directories.

use assert_cmd::Command;
use kpush_test_utils::TestHome;
use predicates::prelude::*;

fn kpush(home: &TestHome) -> Command {
    let mut cmd = Command::cargo_bin("kpush").unwrap();
    cmd.env("KPUSH_HOME", home.root()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TestHome::new();
    kpush(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("push-all"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("KPUSH_HOME"));
}

#[test]
fn test_missing_subcommand_fails() {
    let home = TestHome::new();
    kpush(&home).assert().failure();
}

#[test]
fn test_status_lists_jobs_in_name_order() {
    let home = TestHome::new();
    home.write_descriptor("web");
    home.write_descriptor("api");

    let output = kpush(&home).arg("status").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["- api", "- web"]);
}

#[test]
fn test_status_with_filter_shows_details() {
    let home = TestHome::new();
    home.write_descriptor("web");
    home.write_descriptor_for("api", "api", "backend");

    kpush(&home)
        .args(["status", "API.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target: api"))
        .stdout(predicate::str::contains("  Namespace   : backend"))
        .stdout(predicate::str::contains("  Pod         : api-0"))
        .stdout(predicate::str::contains("  Container   : -"))
        .stdout(predicate::str::contains("web").not());
}

#[test]
fn test_missing_config_dir_is_not_an_error() {
    let home = TestHome::new();
    std::fs::remove_dir(home.config_dir()).unwrap();

    kpush(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Config directory not found"));
}

#[test]
fn test_explicit_config_file() {
    let home = TestHome::new();
    home.write_descriptor("web");
    let api = home.write_descriptor("api");

    kpush(&home)
        .arg("status")
        .arg("-c")
        .arg(&api)
        .assert()
        .success()
        .stdout("- api\n");
}

#[test]
fn test_touch_requires_time_window() {
    let home = TestHome::new();
    home.write_descriptor("web");

    kpush(&home)
        .arg("touch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_touch_rejects_bad_time_window() {
    let home = TestHome::new();
    home.write_descriptor("web");

    kpush(&home)
        .args(["touch", "-t", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("soon"));
}

#[test]
fn test_touch_then_reset() {
    let home = TestHome::new();
    home.write_descriptor("web");

    kpush(&home)
        .args(["touch", "-t", "1h"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web touched to"));
    home.assert_file_exists("state/web.json");

    let touched = kpush(&home).arg("status").output().unwrap();
    let touched = String::from_utf8(touched.stdout).unwrap();
    assert!(touched.ends_with(" web\n"));
    assert_ne!(touched, "- web\n");

    kpush(&home).arg("reset").assert().success();
    kpush(&home).arg("status").assert().success().stdout("- web\n");
}

#[test]
fn test_push_with_nothing_to_transfer() {
    let home = TestHome::new();
    home.write_descriptor("web");

    kpush(&home)
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("web: 0 file(s) pushed"));
    home.assert_file_exists("state/web.json");
}

#[test]
fn test_dry_run_counts_files() {
    let home = TestHome::new();
    home.write_descriptor("web");
    home.write_source_file("web", "index.html", "<h1>hi</h1>");
    home.write_source_file("web", "css/site.css", "body {}");

    kpush(&home)
        .arg("test")
        .assert()
        .success()
        .stdout("web: 2 file(s) to push\n");
}

#[test]
fn test_broken_descriptor_is_skipped() {
    let home = TestHome::new();
    home.write_descriptor("web");
    home.write_config("broken.yaml", "name: [unterminated\n");

    kpush(&home)
        .arg("status")
        .assert()
        .success()
        .stdout("- web\n")
        .stderr(predicate::str::contains("skipped"));
}

#[test]
fn test_broken_descriptor_is_fatal_when_strict() {
    let home = TestHome::new();
    home.write_descriptor("web");
    home.write_config("broken.yaml", "name: [unterminated\n");

    kpush(&home)
        .args(["status", "--strict"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_duplicate_job_names_are_fatal() {
    let home = TestHome::new();
    home.write_descriptor_for("one", "web", "default");
    home.write_descriptor_for("two", "web", "default");

    kpush(&home)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("web"));
}

#[test]
fn test_unmatched_filter_warns() {
    let home = TestHome::new();
    home.write_descriptor("web");

    kpush(&home)
        .args(["status", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no job matches NOPE"));
}
