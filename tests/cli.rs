use assert_cmd::Command;
use predicates::str::contains;

/// Binary with a clean credential/config environment rooted in `config_dir`.
fn cmd(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("certverify").unwrap();
    cmd.env_remove("API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("CERTVERIFY_MODEL")
        .env_remove("CERTVERIFY_ENDPOINT")
        .env("CERTVERIFY_CONFIG_DIR", config_dir);
    cmd
}

fn write_png(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("diploma.png");
    image::RgbImage::from_pixel(8, 8, image::Rgb([250, 250, 250]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("verify"))
        .stdout(contains("session"))
        .stdout(contains("test-connection"))
        .stdout(contains("Show or change the persisted settings"));
}

#[test]
fn missing_api_key_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_png(dir.path());
    cmd(dir.path())
        .arg("verify")
        .arg(&png)
        .assert()
        .failure()
        .stderr(contains("API_KEY environment variable not set"));
}

#[test]
fn unsupported_file_type_fails_without_calling_the_service() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();
    cmd(dir.path())
        .env("API_KEY", "test-key")
        // unroutable: any request would fail with a different message
        .env("CERTVERIFY_ENDPOINT", "http://127.0.0.1:9")
        .arg("verify")
        .arg(&notes)
        .assert()
        .failure()
        .stderr(contains("Invalid file type. Please upload a PNG, JPG, or WEBP image."));
}

#[test]
fn unreachable_service_renders_error_panel() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_png(dir.path());
    cmd(dir.path())
        .env("API_KEY", "test-key")
        .env("CERTVERIFY_ENDPOINT", "http://127.0.0.1:9")
        .arg("verify")
        .arg(&png)
        .assert()
        .failure()
        .stdout(contains("Verification Failed"))
        .stdout(contains("The service may be temporarily unavailable."));
}

#[test]
fn unreachable_service_json_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let png = write_png(dir.path());
    cmd(dir.path())
        .env("API_KEY", "test-key")
        .env("CERTVERIFY_ENDPOINT", "http://127.0.0.1:9")
        .args(["--json", "verify"])
        .arg(&png)
        .assert()
        .failure()
        .stdout(contains("\"error\""))
        .stdout(contains("Failed to communicate with the AI verification service"));
}

#[test]
fn config_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["config", "set", "model", "gemini-2.5-pro"])
        .assert()
        .success()
        .stdout(contains("model = gemini-2.5-pro"));
    cmd(dir.path())
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(contains("\"model\": \"gemini-2.5-pro\""))
        .stdout(contains("\"timeout_secs\": 60"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    cmd(dir.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(contains("Unknown setting: colour"));
}
