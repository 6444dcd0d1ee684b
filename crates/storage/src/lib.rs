use anyhow::{Context, Result};
use serde_json::{Map, Value};
use shared::persisted::PersistedState;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub mod migrate;

pub use migrate::{migrate, MigrationError, CURRENT_GAME_VERSION};

pub const STATE_KEY: &str = "state";
pub const SAVE_FILE_NAME: &str = "TerrariaRandomWeapon.save";
pub const SAVE_FILE_EXTENSION: &str = "save";

// Keys written by releases that stored each field separately.
const LEGACY_BLACKLIST_KEY: &str = "weaponBlacklist";
const LEGACY_SELECTED_KEY: &str = "selectedWeapon";
const LEGACY_STAGE_KEY: &str = "currentStage";

const DIR_STORE_EXTENSION: &str = "kv";

/// String key/value persistence in the style of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// One `<key>.kv` file per key inside `root`. The directory is created on the
/// first write; `clear` only touches `.kv` files.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.{DIR_STORE_EXTENSION}"))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read store key '{key}' at '{}'", path.display()))?;
        Ok(Some(raw))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| {
            format!("failed to create store directory '{}'", self.root.display())
        })?;
        let path = self.key_path(key);
        fs::write(&path, value)
            .with_context(|| format!("failed to write store key '{key}' at '{}'", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| {
                format!("failed to remove store key '{key}' at '{}'", path.display())
            })?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }
        let entries = fs::read_dir(&self.root).with_context(|| {
            format!("failed to list store directory '{}'", self.root.display())
        })?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(DIR_STORE_EXTENSION) {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove '{}'", path.display()))?;
            }
        }
        Ok(())
    }
}

pub struct StateStore<K> {
    store: K,
}

impl<K: KeyValueStore> StateStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn save(&mut self, state: &PersistedState) -> Result<()> {
        let raw = serde_json::to_string(state).context("failed to serialize state")?;
        self.store.clear()?;
        self.store.set(STATE_KEY, &raw)?;
        debug!(current_stage = state.current_stage, "saved state");
        Ok(())
    }

    /// Loads the persisted state on top of `defaults`. Malformed blobs are
    /// dropped from the store and replaced by defaults; an unknown version tag
    /// is an error.
    pub fn load(&mut self, defaults: PersistedState, stage_count: usize) -> Result<PersistedState> {
        let raw = match self.store.get(STATE_KEY)? {
            Some(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => value,
                Err(error) => {
                    warn!(key = STATE_KEY, %error, "persisted state is malformed; resetting it");
                    self.store.remove(STATE_KEY)?;
                    return Ok(defaults);
                }
            },
            None => self.load_legacy_fields()?,
        };
        restore(raw, defaults, stage_count)
    }

    fn load_legacy_fields(&mut self) -> Result<Value> {
        let mut legacy = Map::new();
        for key in [LEGACY_BLACKLIST_KEY, LEGACY_SELECTED_KEY, LEGACY_STAGE_KEY] {
            if let Some(value) = self.legacy_field(key)? {
                legacy.insert(key.to_string(), value);
            }
        }
        if legacy.is_empty() {
            return Ok(Value::Null);
        }
        debug!(fields = legacy.len(), "loaded legacy per-field state");
        Ok(Value::Object(legacy))
    }

    fn legacy_field(&mut self, key: &str) -> Result<Option<Value>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                warn!(key, %error, "legacy state field is malformed; it was reset");
                self.store.remove(key)?;
                Ok(None)
            }
        }
    }
}

/// Migrates `raw` and overlays its fields on `defaults`, the way a freshly
/// reset run absorbs a loaded one. A field whose value does not fit keeps its
/// default; the rest of the run is kept.
pub fn restore(raw: Value, defaults: PersistedState, stage_count: usize) -> Result<PersistedState> {
    let Value::Object(overrides) = migrate(raw)? else {
        return Ok(defaults);
    };

    let Value::Object(mut merged) =
        serde_json::to_value(&defaults).context("failed to serialize defaults")?
    else {
        return Ok(defaults);
    };
    for (field, value) in overrides {
        let previous = merged.insert(field.clone(), value);
        if let Err(error) = serde_json::from_value::<PersistedState>(Value::Object(merged.clone())) {
            warn!(%field, %error, "persisted field has an unexpected type; keeping its default");
            match previous {
                Some(previous) => merged.insert(field, previous),
                None => merged.remove(&field),
            };
        }
    }

    let mut state = serde_json::from_value::<PersistedState>(Value::Object(merged))
        .context("failed to rebuild persisted state")?;
    state.clamp_stage(stage_count);
    Ok(state)
}

pub fn default_export_path(dir: &Path) -> PathBuf {
    dir.join(SAVE_FILE_NAME)
}

pub fn export_to_file(path: &Path, state: &PersistedState) -> Result<()> {
    ensure_parent_dir_exists(path)?;
    let raw = serde_json::to_string(state).context("failed to serialize state")?;
    fs::write(path, raw)
        .with_context(|| format!("failed to write save file '{}'", path.display()))?;
    debug!(path = %path.display(), "exported state");
    Ok(())
}

pub fn import_from_file(
    path: &Path,
    defaults: PersistedState,
    stage_count: usize,
) -> Result<PersistedState> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(SAVE_FILE_EXTENSION) {
        warn!(path = %path.display(), "importing a file without the .{SAVE_FILE_EXTENSION} extension");
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read save file '{}'", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("save file '{}' is not valid JSON", path.display()))?;
    restore(value, defaults, stage_count)
        .with_context(|| format!("failed to restore save file '{}'", path.display()))
}

fn ensure_parent_dir_exists(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for save file '{}'",
            parent.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
