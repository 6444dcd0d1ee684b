//! Upgrades persisted state blobs written by older releases.
//!
//! The blob is handled as raw JSON because older shapes do not deserialize
//! into [`shared::persisted::PersistedState`]. Each game-version transition is
//! a pure step function; steps run in ascending order, each one requiring the
//! exact tag the previous step stamped.

use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub const FIRST_TOOL_VERSION: &str = "0.0.1";
pub const FIRST_GAME_VERSION: &str = "1.4.3";
pub const CURRENT_GAME_VERSION: &str = "1.4.4.7";

type Blob = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    #[error("persisted state has no game version tag")]
    MissingGameVersion,
    #[error("persisted state has unknown game version {0:?}")]
    UnknownGameVersion(String),
}

struct MigrationStep {
    from: &'static str,
    to: &'static str,
    apply: fn(Blob) -> Blob,
}

const STEPS: &[MigrationStep] = &[MigrationStep {
    from: FIRST_GAME_VERSION,
    to: CURRENT_GAME_VERSION,
    apply: rename_weapons_1_4_4,
}];

/// Weapons renamed by the 1.4.4 update, old name first.
pub const WEAPON_RENAMES_1_4_4: &[(&str, &str)] = &[("Fiery Greatsword", "Volcano")];

pub fn migrate(raw: Value) -> Result<Value, MigrationError> {
    let mut state = match raw {
        Value::Object(state) => state,
        other => return Ok(other),
    };
    if !state.contains_key("currentStage") {
        return Ok(Value::Object(state));
    }

    if !state.contains_key("trwVersion") {
        // Untagged blobs predate version tracking and were written for 1.4.3.
        state.insert("trwVersion".into(), FIRST_TOOL_VERSION.into());
        state.insert("terrariaVersion".into(), FIRST_GAME_VERSION.into());
    }

    let mut state = normalize_selected_weapon(state);

    loop {
        let tag = match state.get("terrariaVersion") {
            Some(Value::String(tag)) => tag.clone(),
            _ => return Err(MigrationError::MissingGameVersion),
        };
        if tag == CURRENT_GAME_VERSION {
            break;
        }
        let step = STEPS
            .iter()
            .find(|step| step.from == tag)
            .ok_or(MigrationError::UnknownGameVersion(tag))?;
        debug!(from = step.from, to = step.to, "migrating persisted state");
        state = (step.apply)(state);
        state.insert("terrariaVersion".into(), step.to.into());
    }

    Ok(Value::Object(state))
}

/// Releases stored the selected weapon either as a bare name or as a
/// `{name, img}` descriptor. The descriptor is canonical.
fn normalize_selected_weapon(mut state: Blob) -> Blob {
    let normalized = match state.remove("selectedWeapon") {
        None => return state,
        Some(Value::Null) => Value::Null,
        Some(Value::String(name)) => json!({ "name": name }),
        Some(Value::Object(descriptor)) if descriptor.get("name").is_some_and(Value::is_string) => {
            Value::Object(descriptor)
        }
        Some(other) => {
            warn!(selected_weapon = %other, "discarding unrecognised selected weapon");
            Value::Null
        }
    };
    state.insert("selectedWeapon".into(), normalized);
    state
}

fn rename_weapons_1_4_4(state: Blob) -> Blob {
    rename_weapons(state, WEAPON_RENAMES_1_4_4)
}

fn rename_weapons(mut state: Blob, renames: &[(&str, &str)]) -> Blob {
    if let Some(Value::Object(blacklist)) = state.get_mut("weaponBlacklist") {
        for (old, new) in renames {
            if let Some(flag) = blacklist.remove(*old) {
                blacklist.insert((*new).to_string(), flag);
            }
        }
    }

    if let Some(Value::Object(selected)) = state.get_mut("selectedWeapon") {
        if let Some(Value::String(name)) = selected.get_mut("name") {
            if let Some((_, new)) = renames.iter().find(|(old, _)| *old == name.as_str()) {
                *name = (*new).to_string();
            }
        }
    }

    state
}

#[cfg(test)]
#[path = "tests/migrate_tests.rs"]
mod tests;
