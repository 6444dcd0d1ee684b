use std::path::Path;

use anyhow::{Context, Result};
use percent_template::Surface;
use rand::Rng;
use shared::domain::GameData;
use storage::{KeyValueStore, StateStore};
use tracing::info;

use crate::{Action, Page, PageSurfaces, Tracker};

/// Ties the tracker to its store and its page: every dispatched action is
/// applied, persisted when it changed the run, then rendered.
pub struct Session<K, S> {
    tracker: Tracker,
    store: StateStore<K>,
    page: Page<S>,
}

impl<K: KeyValueStore, S: Surface> Session<K, S> {
    /// Restores the persisted run (migrating older blobs), writes it back in
    /// the current schema and binds the page.
    pub fn open(data: GameData, store: K, surfaces: PageSurfaces<S>) -> Result<Self> {
        let mut store = StateStore::new(store);
        let defaults = Tracker::defaults_for(&data);
        let state = store
            .load(defaults, data.stage_count())
            .context("failed to load persisted state")?;
        let tracker = Tracker::with_state(data, state)?;
        store.save(tracker.state())?;
        let page = Page::bind(surfaces, &tracker);
        info!(stage = %tracker.stage_label(), "session opened");
        Ok(Self {
            tracker,
            store,
            page,
        })
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn page(&self) -> &Page<S> {
        &self.page
    }

    pub fn store(&self) -> &StateStore<K> {
        &self.store
    }

    /// Returns the number of surfaces that were rewritten.
    pub fn dispatch<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Result<usize> {
        let changed = self.tracker.apply(action, rng)?;
        if changed {
            self.store.save(self.tracker.state())?;
        }
        Ok(self.page.render(&self.tracker))
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        storage::export_to_file(path, self.tracker.state())
    }

    pub fn import(&mut self, path: &Path) -> Result<usize> {
        let data = self.tracker.data();
        let state =
            storage::import_from_file(path, Tracker::defaults_for(data), data.stage_count())?;
        self.tracker.replace_state(state);
        self.store.save(self.tracker.state())?;
        info!(path = %path.display(), "imported save file");
        Ok(self.page.render(&self.tracker))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
