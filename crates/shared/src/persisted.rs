use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{SortMode, Weapon};

/// Version tag of the persisted-state schema written by this tool.
pub const TOOL_VERSION: &str = "0.0.1";

/// Everything about a run that survives a restart. Field names match the
/// save files written by earlier releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub terraria_version: String,
    pub trw_version: String,
    pub current_stage: usize,
    #[serde(default)]
    pub weapon_blacklist: BTreeMap<String, bool>,
    #[serde(default)]
    pub selected_weapon: Option<Weapon>,
    pub enable_stage_clear_previous_weapons: bool,
    pub sort_weapons: SortMode,
    pub open_weapon_list: bool,
}

impl PersistedState {
    pub fn fresh(game_version: impl Into<String>) -> Self {
        Self {
            terraria_version: game_version.into(),
            trw_version: TOOL_VERSION.to_string(),
            current_stage: 0,
            weapon_blacklist: BTreeMap::new(),
            selected_weapon: None,
            enable_stage_clear_previous_weapons: true,
            sort_weapons: SortMode::default(),
            open_weapon_list: false,
        }
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.weapon_blacklist.get(name).copied().unwrap_or(false)
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_weapon
            .as_ref()
            .is_some_and(|weapon| weapon.name == name)
    }

    pub fn clamp_stage(&mut self, stage_count: usize) {
        self.current_stage = self.current_stage.min(stage_count.saturating_sub(1));
    }
}
