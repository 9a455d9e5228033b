use contracts::shared::filters::{FilterCriterion, SavedFilter};
use leptos::prelude::*;
use uuid::Uuid;

use super::store::{FilterStorage, FilterStoreError, SavedFilterStore};

/// Active filter criteria of one module screen, wired to its saved filter
/// store
///
/// Created once per screen. On creation the module's default saved filter is
/// restored into the criteria signal, the way list screens restore their
/// persisted state on open.
pub struct ModuleFilters<S: FilterStorage> {
    store: SavedFilterStore<S>,
    /// Criteria currently applied to the screen's collection
    pub criteria: RwSignal<Vec<FilterCriterion>>,
}

impl<S: FilterStorage> ModuleFilters<S> {
    pub fn new(store: SavedFilterStore<S>) -> Self {
        let initial = store
            .default_filter()
            .map(|f| f.criteria)
            .unwrap_or_default();
        Self {
            store,
            criteria: RwSignal::new(initial),
        }
    }

    pub fn store(&self) -> &SavedFilterStore<S> {
        &self.store
    }

    /// Saved filters of the module, for the menu
    pub fn saved(&self) -> Vec<SavedFilter> {
        self.store.list()
    }

    /// Snapshot the active criteria under a name
    pub fn save_current(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<SavedFilter, FilterStoreError> {
        self.store
            .save(name, description, &self.criteria.get_untracked())
    }

    /// Replace the active criteria with a saved set
    pub fn load(&self, id: Uuid) -> Result<(), FilterStoreError> {
        let criteria = self.store.load(id)?;
        self.criteria.set(criteria);
        Ok(())
    }

    pub fn delete(&self, id: Uuid) -> Result<(), FilterStoreError> {
        self.store.delete(id)
    }

    pub fn set_default(&self, id: Uuid) -> Result<(), FilterStoreError> {
        self.store.set_default(id)
    }

    /// Add one criterion (filter builder "apply")
    pub fn add_criterion(&self, criterion: FilterCriterion) {
        self.criteria.update(|list| list.push(criterion));
    }

    /// Drop one criterion by position (filter chip removal)
    pub fn remove_criterion(&self, index: usize) {
        self.criteria.update(|list| {
            if index < list.len() {
                list.remove(index);
            }
        });
    }

    /// Clear all active criteria
    pub fn clear(&self) {
        self.criteria.set(Vec::new());
    }
}
