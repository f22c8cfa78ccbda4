#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a config pointing at the mock server.
fn write_config(dir: &Path, base_url: &str) {
    std::fs::write(
        dir.join("config.toml"),
        format!("[station]\ncall_sign = \"KCTSDT\"\n\n[api]\nbase_url = \"{base_url}/\"\n"),
    )
    .unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("listings"))
        .stdout(predicate::str::contains("channels"))
        .stdout(predicate::str::contains("--call-sign"));
}

#[test]
fn test_listings_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["listings", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--date"))
        .stdout(predicate::str::contains("--kids"));
}

#[test]
fn test_listings_missing_date() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.arg("listings")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--date"));
}

#[test]
fn test_listings_invalid_date() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["listings", "--date", "07/04/2019"])
        .env("TVSS_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --date"));
}

#[test]
fn test_search_missing_term() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--term"));
}

#[test]
fn test_search_programs_only_conflicts_with_shows_only() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args([
        "search",
        "--term",
        "jamestown",
        "--programs-only",
        "--shows-only",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_search_kids_all_stations_is_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["search", "--term", "pinkalicious", "--kids", "--all-stations"])
        .env("TVSS_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "call sign must be included for kids only search",
        ));
}

#[test]
fn test_today_requires_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "today"])
        .env_remove("TVSS_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "TVSS_API_KEY environment variable is required",
        ));
}

#[test]
fn test_today_requires_call_sign() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "today"])
        .env("TVSS_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("a call sign is required"));
}

#[test]
fn test_config_set_and_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    // Act
    let mut set = cargo_bin_cmd!("tvss");
    set.args([
        "--dir",
        dir_arg,
        "config",
        "set",
        "--station-call-sign",
        "KCTSDT",
        "--timeout-secs",
        "30",
    ])
    .assert()
    .success();

    // Assert
    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("call_sign = \"KCTSDT\""));
    assert!(!saved.contains("TVSS_API_KEY"));

    let mut show = cargo_bin_cmd!("tvss");
    show.args(["--dir", dir_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("station.call_sign = KCTSDT"))
        .stdout(predicate::str::contains("api.timeout_secs = 30"));
}

#[test]
fn test_config_dir_env_locates_config() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut set = cargo_bin_cmd!("tvss");
    set.args(["config", "set", "--station-call-sign", "KYVEDT"])
        .env("TVSS_CONFIG_DIR", dir.path())
        .assert()
        .success();

    // Assert
    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("call_sign = \"KYVEDT\""));

    let mut show = cargo_bin_cmd!("tvss");
    show.args(["config", "show"])
        .env("TVSS_CONFIG_DIR", dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("station.call_sign = KYVEDT"));
}

#[test]
fn test_config_set_without_values() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "config", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to set"));
}

#[tokio::test]
async fn test_channels_by_zip_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    let body = include_str!("../../../fixtures/tvss/channels_98030.json");
    Mock::given(method("GET"))
        .and(path("/kctsdt/channels/zip/98030"))
        .and(header("X-PBSAUTH", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args([
        "--dir",
        dir.path().to_str().unwrap(),
        "channels",
        "--zip",
        "98030",
    ])
    .env("TVSS_API_KEY", "test-key")
    .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
    .env("RUST_LOG", "info")
    .assert()
    .success()
    .stdout(predicate::str::contains("DISH Seattle"))
    .stdout(predicate::str::contains("Total: 2 headends"));
}

#[tokio::test]
async fn test_call_sign_flag_overrides_config() {
    // Arrange
    let server = MockServer::start().await;
    let body = include_str!("../../../fixtures/tvss/today.json");
    Mock::given(method("GET"))
        .and(path("/kyvedt/today"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args([
        "--dir",
        dir.path().to_str().unwrap(),
        "--call-sign",
        "KYVEDT",
        "feeds",
    ])
    .env("TVSS_API_KEY", "test-key")
    .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
    .env("RUST_LOG", "info")
    .assert()
    .success()
    .stdout(predicate::str::contains("KCTSDT4"))
    .stdout(predicate::str::contains("Total: 6 feeds"));
}

#[tokio::test]
async fn test_forbidden_reports_api_key_error() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("tvss");
    cmd.args(["--dir", dir.path().to_str().unwrap(), "programs"])
        .env("TVSS_API_KEY", "bad-key")
        .env_remove("OTEL_EXPORTER_OTLP_ENDPOINT")
        .assert()
        .failure()
        .stderr(predicate::str::contains("an API key is required"));
}
