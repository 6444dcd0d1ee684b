//! The tracker page: one template binder per named surface plus the weapon
//! list container, all re-rendered from a [`Tracker`] after every action.

use percent_template::{MemorySurface, RenderMode, Surface, TemplateBinder};

use crate::{
    views::{
        weapon_list_markup, weapon_markup, CreditsView, CurrentWeaponView, PickView, StageView,
        ToggleView, WeaponCountView,
    },
    Tracker,
};

pub const CURRENT_STAGE_SURFACE: &str = "currentStage";
pub const AVAIL_WEAPONS_SURFACE: &str = "availWeapons";
pub const RANDOM_PICK_SURFACE: &str = "randomlySelectedWeapon";
pub const SELECTED_WEAPON_SURFACE: &str = "selectedWeapon";
pub const WEAPON_LIST_SURFACE: &str = "weaponList";
pub const OPT_WEAPON_LIST_SURFACE: &str = "optWeaponList";
pub const OPT_STAGE_CLEAR_SURFACE: &str = "optStageClear";
pub const CREDITS_SURFACE: &str = "credits";

/// Source templates for the bound surfaces, keyed by surface id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplates {
    pub current_stage: String,
    pub avail_weapons: String,
    pub random_pick: String,
    pub selected_weapon: String,
    pub opt_weapon_list: String,
    pub opt_stage_clear: String,
    pub credits: String,
}

impl Default for PageTemplates {
    fn default() -> Self {
        Self {
            current_stage: "Current stage: %CURRENT_STAGE%".into(),
            avail_weapons: "Available weapons: %WEAPON_COUNT%".into(),
            random_pick: "Randomly selected weapon: %SELECTED_WEAPON%".into(),
            selected_weapon: "Current weapon: %CURRENT_WEAPON%".into(),
            opt_weapon_list: "%ACTION% weapon list".into(),
            opt_stage_clear: "%ACTION% clearing previous weapons on stage change".into(),
            credits: "Weapon data provided by %DATA_PROVIDER%".into(),
        }
    }
}

impl PageTemplates {
    /// Returns `false` when `surface_id` names no templated surface.
    pub fn set(&mut self, surface_id: &str, template: impl Into<String>) -> bool {
        let slot = match surface_id {
            CURRENT_STAGE_SURFACE => &mut self.current_stage,
            AVAIL_WEAPONS_SURFACE => &mut self.avail_weapons,
            RANDOM_PICK_SURFACE => &mut self.random_pick,
            SELECTED_WEAPON_SURFACE => &mut self.selected_weapon,
            OPT_WEAPON_LIST_SURFACE => &mut self.opt_weapon_list,
            OPT_STAGE_CLEAR_SURFACE => &mut self.opt_stage_clear,
            CREDITS_SURFACE => &mut self.credits,
            _ => return false,
        };
        *slot = template.into();
        true
    }
}

pub struct PageSurfaces<S> {
    pub current_stage: Option<S>,
    pub avail_weapons: Option<S>,
    pub random_pick: Option<S>,
    pub selected_weapon: Option<S>,
    pub opt_weapon_list: Option<S>,
    pub opt_stage_clear: Option<S>,
    pub credits: Option<S>,
    pub weapon_list: Option<S>,
}

impl PageSurfaces<MemorySurface> {
    pub fn in_memory(templates: &PageTemplates) -> Self {
        Self {
            current_stage: Some(MemorySurface::new(templates.current_stage.as_str())),
            avail_weapons: Some(MemorySurface::new(templates.avail_weapons.as_str())),
            random_pick: Some(MemorySurface::new(templates.random_pick.as_str())),
            selected_weapon: Some(MemorySurface::new(templates.selected_weapon.as_str())),
            opt_weapon_list: Some(MemorySurface::new(templates.opt_weapon_list.as_str())),
            opt_stage_clear: Some(MemorySurface::new(templates.opt_stage_clear.as_str())),
            credits: Some(MemorySurface::new(templates.credits.as_str())),
            weapon_list: Some(MemorySurface::default()),
        }
    }
}

pub struct Page<S> {
    current_stage: TemplateBinder<S>,
    avail_weapons: TemplateBinder<S>,
    random_pick: TemplateBinder<S>,
    selected_weapon: TemplateBinder<S>,
    opt_weapon_list: TemplateBinder<S>,
    opt_stage_clear: TemplateBinder<S>,
    credits: TemplateBinder<S>,
    weapon_list: Option<S>,
    pick_visible: bool,
    weapon_list_visible: bool,
}

impl<S: Surface> Page<S> {
    /// Captures every surface's template and renders the tracker into it.
    pub fn bind(surfaces: PageSurfaces<S>, tracker: &Tracker) -> Self {
        let pick = PickView {
            weapon_markup: weapon_markup(tracker.pending_pick()),
        };
        let credits = CreditsView {
            data_provider: tracker.data().meta.author.clone(),
        };

        let mut page = Self {
            current_stage: TemplateBinder::new(
                surfaces.current_stage,
                StageView::of(tracker).into(),
                RenderMode::Text,
            ),
            avail_weapons: TemplateBinder::new(
                surfaces.avail_weapons,
                WeaponCountView::of(tracker).into(),
                RenderMode::Text,
            ),
            random_pick: TemplateBinder::new(surfaces.random_pick, pick.into(), RenderMode::Markup),
            selected_weapon: TemplateBinder::new(
                surfaces.selected_weapon,
                CurrentWeaponView::of(tracker).into(),
                RenderMode::Markup,
            ),
            opt_weapon_list: TemplateBinder::new(
                surfaces.opt_weapon_list,
                ToggleView::weapon_list(tracker).into(),
                RenderMode::Text,
            ),
            opt_stage_clear: TemplateBinder::new(
                surfaces.opt_stage_clear,
                ToggleView::stage_clear(tracker).into(),
                RenderMode::Text,
            ),
            credits: TemplateBinder::new(surfaces.credits, credits.into(), RenderMode::Text),
            weapon_list: surfaces.weapon_list,
            pick_visible: false,
            weapon_list_visible: false,
        };
        page.render(tracker);
        page
    }

    /// Brings every surface in line with `tracker` and returns how many
    /// surfaces were written. Safe to call at any rate.
    pub fn render(&mut self, tracker: &Tracker) -> usize {
        let mut writes = [
            self.current_stage.update(StageView::of(tracker)),
            self.selected_weapon.update(CurrentWeaponView::of(tracker)),
            self.avail_weapons.update(WeaponCountView::of(tracker)),
            self.opt_weapon_list.update(ToggleView::weapon_list(tracker)),
            self.opt_stage_clear.update(ToggleView::stage_clear(tracker)),
        ]
        .into_iter()
        .filter(|written| *written)
        .count();

        self.pick_visible = tracker.pending_pick().is_some();
        if let Some(pick) = tracker.pending_pick() {
            let view = PickView {
                weapon_markup: weapon_markup(Some(pick)),
            };
            writes += usize::from(self.random_pick.update(view));
        }

        self.weapon_list_visible = tracker.state().open_weapon_list;
        if self.weapon_list_visible {
            writes += usize::from(self.render_weapon_list(tracker));
        }

        writes
    }

    fn render_weapon_list(&mut self, tracker: &Tracker) -> bool {
        let Some(surface) = self.weapon_list.as_mut() else {
            return false;
        };
        let markup = weapon_list_markup(&tracker.weapon_list());
        if surface.content(RenderMode::Markup) == markup {
            return false;
        }
        surface.set_content(RenderMode::Markup, &markup);
        true
    }

    pub fn surface(&self, surface_id: &str) -> Option<&S> {
        match surface_id {
            CURRENT_STAGE_SURFACE => self.current_stage.surface(),
            AVAIL_WEAPONS_SURFACE => self.avail_weapons.surface(),
            RANDOM_PICK_SURFACE => self.random_pick.surface(),
            SELECTED_WEAPON_SURFACE => self.selected_weapon.surface(),
            OPT_WEAPON_LIST_SURFACE => self.opt_weapon_list.surface(),
            OPT_STAGE_CLEAR_SURFACE => self.opt_stage_clear.surface(),
            CREDITS_SURFACE => self.credits.surface(),
            WEAPON_LIST_SURFACE => self.weapon_list.as_ref(),
            _ => None,
        }
    }

    /// The pick prompt shows only while a roll awaits confirmation and the
    /// weapon list only while it is open.
    pub fn is_visible(&self, surface_id: &str) -> bool {
        match surface_id {
            RANDOM_PICK_SURFACE => self.pick_visible,
            WEAPON_LIST_SURFACE => self.weapon_list_visible,
            _ => self.surface(surface_id).is_some(),
        }
    }
}

impl Page<MemorySurface> {
    pub fn in_memory(templates: &PageTemplates, tracker: &Tracker) -> Self {
        Self::bind(PageSurfaces::in_memory(templates), tracker)
    }

    pub fn surface_text(&self, surface_id: &str) -> Option<String> {
        self.surface(surface_id).map(MemorySurface::text)
    }

    /// Plain-text lines of every visible surface in reading order.
    pub fn visible_text(&self) -> Vec<String> {
        const ORDER: [&str; 8] = [
            CURRENT_STAGE_SURFACE,
            AVAIL_WEAPONS_SURFACE,
            SELECTED_WEAPON_SURFACE,
            RANDOM_PICK_SURFACE,
            OPT_WEAPON_LIST_SURFACE,
            OPT_STAGE_CLEAR_SURFACE,
            WEAPON_LIST_SURFACE,
            CREDITS_SURFACE,
        ];
        ORDER
            .into_iter()
            .filter(|id| self.is_visible(id))
            .filter_map(|id| self.surface_text(id))
            .flat_map(|text| {
                text.lines()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
