//! Typed value maps, one per bound surface, plus the weapon markup helpers.

use percent_template::{escape_text, Values};
use shared::domain::Weapon;

use crate::{Tracker, WeaponListEntry};

pub const CURRENT_STAGE_KEY: &str = "CURRENT_STAGE";
pub const WEAPON_COUNT_KEY: &str = "WEAPON_COUNT";
pub const SELECTED_WEAPON_KEY: &str = "SELECTED_WEAPON";
pub const CURRENT_WEAPON_KEY: &str = "CURRENT_WEAPON";
pub const ACTION_KEY: &str = "ACTION";
pub const DATA_PROVIDER_KEY: &str = "DATA_PROVIDER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageView {
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponCountView {
    pub count: usize,
}

/// The weapon offered by the last roll, as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickView {
    pub weapon_markup: String,
}

/// The weapon the run currently uses, as markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentWeaponView {
    pub weapon_markup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleView {
    pub action: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditsView {
    pub data_provider: String,
}

impl StageView {
    pub fn of(tracker: &Tracker) -> Self {
        Self {
            label: tracker.stage_label(),
        }
    }
}

impl WeaponCountView {
    pub fn of(tracker: &Tracker) -> Self {
        Self {
            count: tracker.available_count(),
        }
    }
}

impl CurrentWeaponView {
    pub fn of(tracker: &Tracker) -> Self {
        Self {
            weapon_markup: weapon_markup(tracker.state().selected_weapon.as_ref()),
        }
    }
}

impl ToggleView {
    pub fn weapon_list(tracker: &Tracker) -> Self {
        Self {
            action: if tracker.state().open_weapon_list {
                "Close"
            } else {
                "Open"
            },
        }
    }

    pub fn stage_clear(tracker: &Tracker) -> Self {
        Self {
            action: if tracker.state().enable_stage_clear_previous_weapons {
                "Disable"
            } else {
                "Enable"
            },
        }
    }
}

impl From<StageView> for Values {
    fn from(view: StageView) -> Self {
        Values::new().with(CURRENT_STAGE_KEY, view.label)
    }
}

impl From<WeaponCountView> for Values {
    fn from(view: WeaponCountView) -> Self {
        Values::new().with(WEAPON_COUNT_KEY, view.count.to_string())
    }
}

impl From<PickView> for Values {
    fn from(view: PickView) -> Self {
        Values::new().with(SELECTED_WEAPON_KEY, view.weapon_markup)
    }
}

impl From<CurrentWeaponView> for Values {
    fn from(view: CurrentWeaponView) -> Self {
        Values::new().with(CURRENT_WEAPON_KEY, view.weapon_markup)
    }
}

impl From<ToggleView> for Values {
    fn from(view: ToggleView) -> Self {
        Values::new().with(ACTION_KEY, view.action)
    }
}

impl From<CreditsView> for Values {
    fn from(view: CreditsView) -> Self {
        Values::new().with(DATA_PROVIDER_KEY, view.data_provider)
    }
}

/// `None` when no weapon, otherwise the weapon's image followed by its name.
pub fn weapon_markup(weapon: Option<&Weapon>) -> String {
    let Some(weapon) = weapon else {
        return "None".to_string();
    };
    format!(
        r#"<img class="weaponImage" src="{}"> {}"#,
        escape_text(weapon.img.as_deref().unwrap_or_default()),
        escape_text(&weapon.name)
    )
}

pub fn weapon_list_row(entry: &WeaponListEntry<'_>) -> String {
    let name = escape_text(&entry.weapon.name);
    let button_id = format!("blacklistButton_{name}");
    let color = if entry.selected {
        "blue"
    } else if entry.blacklisted {
        "red"
    } else {
        "white"
    };
    let toggle = if entry.blacklisted { "W" } else { "B" };
    format!(
        r#"<div><button id="{button_id}" class="defaultButton weaponListButton left">{toggle}</button><label class="defaultText weaponListLabel" for="{button_id}"><span style="color: {color}">{}</span></label></div>"#,
        weapon_markup(Some(entry.weapon))
    )
}

/// One row per line so the text rendering keeps a row per weapon.
pub fn weapon_list_markup(entries: &[WeaponListEntry<'_>]) -> String {
    entries
        .iter()
        .map(weapon_list_row)
        .collect::<Vec<_>>()
        .join("\n")
}
