use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use tracker_core::PageTemplates;

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path: PathBuf,
    pub state_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_filter: String,
    pub templates: PageTemplates,
    /// Template table entries that name no surface.
    pub unknown_templates: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: "data.json".into(),
            state_dir: "./data/state".into(),
            export_dir: ".".into(),
            log_filter: "info".into(),
            templates: PageTemplates::default(),
            unknown_templates: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_path: Option<String>,
    state_dir: Option<String>,
    export_dir: Option<String>,
    log_filter: Option<String>,
    #[serde(default)]
    templates: HashMap<String, String>,
}

/// Defaults, then `config_path` if it exists, then environment overrides.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config '{}'", config_path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config '{}'", config_path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.data_path {
        settings.data_path = v.into();
    }
    if let Some(v) = file_cfg.state_dir {
        settings.state_dir = v.into();
    }
    if let Some(v) = file_cfg.export_dir {
        settings.export_dir = v.into();
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }

    let mut templates: Vec<_> = file_cfg.templates.into_iter().collect();
    templates.sort();
    for (surface_id, template) in templates {
        if !settings.templates.set(&surface_id, template) {
            settings.unknown_templates.push(surface_id);
        }
    }

    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("TRACKER_DATA_PATH") {
        settings.data_path = v.into();
    }
    if let Some(v) = var("APP__DATA_PATH") {
        settings.data_path = v.into();
    }

    if let Some(v) = var("TRACKER_STATE_DIR") {
        settings.state_dir = v.into();
    }
    if let Some(v) = var("APP__STATE_DIR") {
        settings.state_dir = v.into();
    }

    if let Some(v) = var("TRACKER_EXPORT_DIR") {
        settings.export_dir = v.into();
    }
    if let Some(v) = var("APP__EXPORT_DIR") {
        settings.export_dir = v.into();
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
