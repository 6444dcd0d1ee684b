use std::cmp::Ordering;

use rand::{seq::SliceRandom, Rng};
use shared::{
    domain::{GameData, SortMode, Weapon},
    error::{GameDataError, TrackerError},
    persisted::PersistedState,
};
use tracing::{debug, warn};

pub mod page;
pub mod session;
pub mod views;

pub use page::{Page, PageSurfaces, PageTemplates};
pub use session::Session;

/// A user intent, applied to the tracker in one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NextStage,
    PreviousStage,
    Roll,
    ConfirmPick {
        accept: bool,
        add_to_blacklist: bool,
    },
    ToggleBlacklist(String),
    ToggleStageClear,
    ToggleWeaponList,
    SetSortMode(SortMode),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponListEntry<'a> {
    pub weapon: &'a Weapon,
    pub blacklisted: bool,
    pub selected: bool,
}

/// Game data plus the run state derived from it. The random pick awaiting
/// confirmation is session-only and never persisted.
#[derive(Debug, Clone)]
pub struct Tracker {
    data: GameData,
    state: PersistedState,
    pending_pick: Option<Weapon>,
}

impl Tracker {
    /// Fails when the game data has no stages; every stage lookup relies on
    /// at least one being present.
    pub fn new(data: GameData) -> Result<Self, GameDataError> {
        data.validate()?;
        let state = Self::defaults_for(&data);
        Ok(Self {
            data,
            state,
            pending_pick: None,
        })
    }

    pub fn defaults_for(data: &GameData) -> PersistedState {
        PersistedState::fresh(data.terraria_version.clone())
    }

    pub fn with_state(data: GameData, state: PersistedState) -> Result<Self, GameDataError> {
        let mut tracker = Self::new(data)?;
        tracker.replace_state(state);
        Ok(tracker)
    }

    /// Installs a loaded state: clamps the stage and refreshes the selected
    /// weapon's descriptor from the game data when the name is known.
    pub fn replace_state(&mut self, mut state: PersistedState) {
        if state.terraria_version != self.data.terraria_version {
            warn!(
                state_version = %state.terraria_version,
                data_version = %self.data.terraria_version,
                "loaded state targets a different game version than the game data"
            );
        }
        state.clamp_stage(self.data.stage_count());
        if let Some(selected) = state.selected_weapon.as_mut() {
            if let Some(known) = self.data.find_weapon(&selected.name) {
                *selected = known.clone();
            }
        }
        self.state = state;
        self.pending_pick = None;
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    pub fn pending_pick(&self) -> Option<&Weapon> {
        self.pending_pick.as_ref()
    }

    pub fn current_stage(&self) -> usize {
        self.state.current_stage
    }

    pub fn stage_name(&self, index: usize) -> &str {
        &self.data.stages[self.data.clamp_stage(index)].name
    }

    /// `"<name> (<1-based index>/<stage count>)"`
    pub fn stage_label(&self) -> String {
        format!(
            "{} ({}/{})",
            self.stage_name(self.state.current_stage),
            self.state.current_stage + 1,
            self.data.stage_count()
        )
    }

    /// Weapons obtainable by `stage`, blacklist ignored. With stage clearing
    /// enabled, a stage flagged `clearPreviousWeapons` drops everything
    /// accumulated before it.
    pub fn unlocked_weapons(&self, stage: usize) -> Vec<&Weapon> {
        let last = self.data.clamp_stage(stage);
        let mut weapons = Vec::new();
        for stage in &self.data.stages[..=last] {
            if self.state.enable_stage_clear_previous_weapons && stage.clear_previous_weapons {
                weapons.clear();
            }
            weapons.extend(stage.weapons.iter());
        }
        weapons
    }

    pub fn available_weapons(&self, stage: usize) -> Vec<&Weapon> {
        self.unlocked_weapons(stage)
            .into_iter()
            .filter(|weapon| !self.state.is_blacklisted(&weapon.name))
            .collect()
    }

    pub fn available_count(&self) -> usize {
        self.available_weapons(self.state.current_stage).len()
    }

    pub fn next_stage(&mut self) -> bool {
        if self.state.current_stage + 1 >= self.data.stage_count() {
            return false;
        }
        self.state.current_stage += 1;
        debug!(stage = self.state.current_stage, "advanced stage");
        true
    }

    pub fn previous_stage(&mut self) -> bool {
        if self.state.current_stage == 0 {
            return false;
        }
        self.state.current_stage -= 1;
        debug!(stage = self.state.current_stage, "went back a stage");
        true
    }

    pub fn toggle_stage_clear(&mut self) {
        self.state.enable_stage_clear_previous_weapons =
            !self.state.enable_stage_clear_previous_weapons;
    }

    pub fn toggle_weapon_list(&mut self) {
        self.state.open_weapon_list = !self.state.open_weapon_list;
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) -> bool {
        if self.state.sort_weapons == mode {
            return false;
        }
        self.state.sort_weapons = mode;
        true
    }

    /// Flips the blacklist flag of a weapon known to the game data and
    /// returns the new flag.
    pub fn toggle_blacklist(&mut self, name: &str) -> Result<bool, TrackerError> {
        if self.data.find_weapon(name).is_none() {
            return Err(TrackerError::UnknownWeapon(name.to_string()));
        }
        let flag = !self.state.is_blacklisted(name);
        self.state.weapon_blacklist.insert(name.to_string(), flag);
        debug!(weapon = name, blacklisted = flag, "toggled blacklist");
        Ok(flag)
    }

    /// Picks uniformly among the weapons available at the current stage and
    /// holds the pick until it is confirmed.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Weapon> {
        let pick = self
            .available_weapons(self.state.current_stage)
            .choose(rng)
            .map(|weapon| (*weapon).clone());
        debug!(pick = ?pick.as_ref().map(|weapon| &weapon.name), "rolled weapon");
        self.pending_pick = pick;
        self.pending_pick.as_ref()
    }

    pub fn confirm_pick(&mut self, accept: bool, add_to_blacklist: bool) -> Result<(), TrackerError> {
        let pick = self.pending_pick.take().ok_or(TrackerError::NoPendingPick)?;
        if add_to_blacklist {
            self.state.weapon_blacklist.insert(pick.name.clone(), true);
        }
        self.state.selected_weapon = accept.then_some(pick);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = Self::defaults_for(&self.data);
        self.pending_pick = None;
    }

    /// Every weapon unlocked at the current stage, flagged and ordered by the
    /// configured sort mode.
    pub fn weapon_list(&self) -> Vec<WeaponListEntry<'_>> {
        let mut entries: Vec<_> = self
            .unlocked_weapons(self.state.current_stage)
            .into_iter()
            .map(|weapon| WeaponListEntry {
                weapon,
                blacklisted: self.state.is_blacklisted(&weapon.name),
                selected: self.state.is_selected(&weapon.name),
            })
            .collect();
        let mode = self.state.sort_weapons;
        entries.sort_by(|a, b| compare_entries(mode, a, b));
        entries
    }

    /// Returns whether the persisted part of the state changed.
    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Result<bool, TrackerError> {
        let changed = match action {
            Action::NextStage => self.next_stage(),
            Action::PreviousStage => self.previous_stage(),
            Action::Roll => {
                self.roll(rng);
                false
            }
            Action::ConfirmPick {
                accept,
                add_to_blacklist,
            } => {
                self.confirm_pick(accept, add_to_blacklist)?;
                true
            }
            Action::ToggleBlacklist(name) => {
                self.toggle_blacklist(&name)?;
                true
            }
            Action::ToggleStageClear => {
                self.toggle_stage_clear();
                true
            }
            Action::ToggleWeaponList => {
                self.toggle_weapon_list();
                true
            }
            Action::SetSortMode(mode) => self.set_sort_mode(mode),
            Action::Reset => {
                self.reset();
                true
            }
        };
        Ok(changed)
    }
}

fn compare_entries(mode: SortMode, a: &WeaponListEntry<'_>, b: &WeaponListEntry<'_>) -> Ordering {
    match mode {
        SortMode::Name => a.weapon.name.cmp(&b.weapon.name),
        SortMode::Availability => a.blacklisted.cmp(&b.blacklisted),
        SortMode::AvailabilityAndName => a
            .blacklisted
            .cmp(&b.blacklisted)
            .then_with(|| a.weapon.name.cmp(&b.weapon.name)),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
