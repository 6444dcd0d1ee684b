use super::*;

use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn missing_config_file_yields_defaults() {
    let settings = load_settings(Path::new("definitely/not/here/tracker.toml")).expect("settings");
    assert_eq!(settings.log_filter, Settings::default().log_filter);
    assert!(settings.unknown_templates.is_empty());
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
        data_path = "assets/data.json"
        state_dir = "run"
        log_filter = "debug"

        [templates]
        currentStage = "Stage %CURRENT_STAGE%"
        sidebar = "%NOPE%"
        "#,
    )
    .expect("apply");

    assert_eq!(settings.data_path, PathBuf::from("assets/data.json"));
    assert_eq!(settings.state_dir, PathBuf::from("run"));
    assert_eq!(settings.export_dir, PathBuf::from("."));
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.templates.current_stage, "Stage %CURRENT_STAGE%");
    assert_eq!(settings.unknown_templates, vec!["sidebar".to_string()]);
}

#[test]
fn app_prefixed_env_wins_over_tracker_prefixed_env() {
    let mut settings = Settings::default();
    let env: HashMap<&str, &str> = [
        ("TRACKER_DATA_PATH", "tracker.json"),
        ("APP__DATA_PATH", "app.json"),
        ("TRACKER_STATE_DIR", "state-a"),
        ("APP__LOG_FILTER", "warn"),
    ]
    .into_iter()
    .collect();

    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));
    assert_eq!(settings.data_path, PathBuf::from("app.json"));
    assert_eq!(settings.state_dir, PathBuf::from("state-a"));
    assert_eq!(settings.log_filter, "warn");
}

#[test]
fn malformed_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("tracker_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("tracker.toml");
    fs::write(&path, "data_path = [").expect("write");

    let err = load_settings(&path).expect_err("should fail");
    assert!(err.to_string().contains("tracker.toml"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}
