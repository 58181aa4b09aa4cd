use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

fn write_config(dir: &Path, extra: &str) -> anyhow::Result<String> {
    let export = dir.join("order-status.csv");
    std::fs::write(&export, "1001|3\nbad-line\n1002|9\n1003|5\n")?;

    let cfg = dir.join("sync.yaml");
    std::fs::write(
        &cfg,
        format!(
            "source:\n  directory: \"{}/\"\n  filename: order-status.csv\nmapping: \"3:2<br>5:6\"\n{extra}",
            dir.display()
        ),
    )?;
    Ok(cfg.to_string_lossy().to_string())
}

#[test]
fn config_hash_prints_hash_and_canonical_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_config(dir.path(), "")?;

    Command::cargo_bin("ordsync")?
        .args(["config-hash", &cfg])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_hash="))
        .stdout(predicate::str::contains("\"mapping\":\"3:2<br>5:6\""));
    Ok(())
}

#[test]
fn inspect_reports_export_shape_without_db() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_config(dir.path(), "")?;

    Command::cargo_bin("ordsync")?
        .env_remove("ORDSYNC_DATABASE_URL")
        .args(["inspect", "--config", &cfg])
        .assert()
        .success()
        .stdout(predicate::str::contains("mapping_entries=2"))
        .stdout(predicate::str::contains("lines=4"))
        .stdout(predicate::str::contains("invalid_lines=1"))
        .stdout(predicate::str::contains("status_not_found=1"));
    Ok(())
}

#[test]
fn sync_requires_database_url() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_config(dir.path(), "")?;

    Command::cargo_bin("ordsync")?
        .current_dir(dir.path())
        .env_remove("ORDSYNC_DATABASE_URL")
        .args(["sync", "--config", &cfg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing env var ORDSYNC_DATABASE_URL"));
    Ok(())
}

#[test]
fn strict_config_rejects_unused_keys_before_connecting() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_config(dir.path(), "notify_customer: true\n")?;

    Command::cargo_bin("ordsync")?
        .current_dir(dir.path())
        .env_remove("ORDSYNC_DATABASE_URL")
        .args(["sync", "--strict-config", "--config", &cfg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));
    Ok(())
}

#[test]
fn missing_input_file_is_reported_with_path() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = dir.path().join("sync.yaml");
    std::fs::write(
        &cfg,
        "source:\n  directory: /nonexistent-ordsync\n  filename: x.csv\nmapping: \"1:2\"\n",
    )?;

    Command::cargo_bin("ordsync")?
        .args(["inspect", "--config", &cfg.to_string_lossy()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent-ordsync/x.csv"));
    Ok(())
}
