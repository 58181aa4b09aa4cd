use ordsync_config::{load_layered_yaml, SyncConfig};

#[test]
fn layered_files_resolve_to_sync_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let base = dir.path().join("base.yaml");
    let env = dir.path().join("prod.yaml");

    std::fs::write(
        &base,
        "source:\n  directory: /srv/import/\n  filename: status.csv\nmapping: \"3:2<br>5:6\"\n",
    )?;
    std::fs::write(&env, "source:\n  directory: /srv/prod-import//\nprogress:\n  redraw_frequency: 50\n")?;

    let base_s = base.to_string_lossy().to_string();
    let env_s = env.to_string_lossy().to_string();
    let loaded = load_layered_yaml(&[base_s.as_str(), env_s.as_str()])?;
    let cfg = SyncConfig::from_loaded(&loaded)?;

    assert_eq!(cfg.input_path(), "/srv/prod-import/status.csv");
    assert_eq!(cfg.mapping, "3:2<br>5:6");
    assert_eq!(cfg.redraw_frequency, 50);
    Ok(())
}

#[test]
fn missing_file_is_reported_with_path() {
    let err = load_layered_yaml(&["/definitely/not/here.yaml"]).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.yaml"));
}
