use std::cell::RefCell;
use std::collections::HashMap;

use contracts::shared::filters::{storage_key, FilterCriterion, SavedFilter};
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the saved filter store
#[derive(Debug, Error)]
pub enum FilterStoreError {
    /// The requested id is not in the module's collection. Surfaced instead
    /// of silently ignoring the request so the UI can tell the user.
    #[error("saved filter {0} not found")]
    NotFound(Uuid),
    #[error("filter storage failed: {0}")]
    Storage(String),
}

/// Key-value persistence backend for saved filter collections
pub trait FilterStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, payload: &str) -> Result<(), String>;
}

impl<S: FilterStorage + ?Sized> FilterStorage for &S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), String> {
        (**self).write(key, payload)
    }
}

fn browser_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Браузерный localStorage backend
pub struct LocalStorage;

impl FilterStorage for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        browser_storage()?.get_item(key).ok()?
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), String> {
        let storage =
            browser_storage().ok_or_else(|| "localStorage is not available".to_string())?;
        storage
            .set_item(key, payload)
            .map_err(|err| format!("localStorage write failed: {:?}", err))
    }
}

/// In-memory backend for native tests and headless use
#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl FilterStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), String> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Named filter sets of one module over an injected storage backend
///
/// Each module owns its collection under the key `"<module>-saved-filters"`;
/// collections of different modules never mix. The read-modify-write against
/// the backend is not atomic across browser tabs: two tabs saving filters for
/// the same module can overwrite each other's last write.
pub struct SavedFilterStore<S: FilterStorage> {
    module: String,
    storage: S,
}

impl<S: FilterStorage> SavedFilterStore<S> {
    pub fn new(module: impl Into<String>, storage: S) -> Self {
        Self {
            module: module.into(),
            storage,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// All saved filters of the module, in insertion order
    pub fn list(&self) -> Vec<SavedFilter> {
        self.read_all()
    }

    /// The module's default filter, if one is set
    pub fn default_filter(&self) -> Option<SavedFilter> {
        self.read_all().into_iter().find(|f| f.is_default)
    }

    /// Snapshot the given criteria under a new name and persist
    pub fn save(
        &self,
        name: &str,
        description: Option<String>,
        criteria: &[FilterCriterion],
    ) -> Result<SavedFilter, FilterStoreError> {
        let filter = SavedFilter::new(name, description, criteria.to_vec(), self.module.clone());
        let mut all = self.read_all();
        all.push(filter.clone());
        self.write_all(&all)?;
        Ok(filter)
    }

    /// Criteria of the saved filter with the given id
    pub fn load(&self, id: Uuid) -> Result<Vec<FilterCriterion>, FilterStoreError> {
        self.read_all()
            .into_iter()
            .find(|f| f.id == id)
            .map(|f| f.criteria)
            .ok_or(FilterStoreError::NotFound(id))
    }

    /// Remove by id and persist the remainder
    pub fn delete(&self, id: Uuid) -> Result<(), FilterStoreError> {
        let mut all = self.read_all();
        let before = all.len();
        all.retain(|f| f.id != id);
        if all.len() == before {
            return Err(FilterStoreError::NotFound(id));
        }
        self.write_all(&all)
    }

    /// Mark exactly one filter as the module default
    ///
    /// The full collection is rewritten with the flag cleared everywhere
    /// else, which keeps "at most one default per module" an invariant even
    /// if a stale payload carried several.
    pub fn set_default(&self, id: Uuid) -> Result<(), FilterStoreError> {
        let mut all = self.read_all();
        if !all.iter().any(|f| f.id == id) {
            return Err(FilterStoreError::NotFound(id));
        }
        for filter in &mut all {
            filter.is_default = filter.id == id;
            if filter.is_default {
                filter.touch();
            }
        }
        self.write_all(&all)
    }

    fn read_all(&self) -> Vec<SavedFilter> {
        let key = storage_key(&self.module);
        let Some(raw) = self.storage.read(&key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(filters) => filters,
            Err(err) => {
                // corrupt payload: start over rather than crash the screen
                log::warn!("discarding corrupt saved filters under '{}': {}", key, err);
                Vec::new()
            }
        }
    }

    fn write_all(&self, filters: &[SavedFilter]) -> Result<(), FilterStoreError> {
        let raw = serde_json::to_string(filters)
            .map_err(|err| FilterStoreError::Storage(err.to_string()))?;
        self.storage
            .write(&storage_key(&self.module), &raw)
            .map_err(FilterStoreError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::filters::FilterOperator;
    use serde_json::json;

    fn sample_criteria() -> Vec<FilterCriterion> {
        vec![
            FilterCriterion::new("status", FilterOperator::Equals, json!("active")),
            FilterCriterion::new("balance", FilterOperator::GreaterThan, json!(1000)),
        ]
    }

    #[test]
    fn test_save_then_load_restores_identical_criteria() {
        let storage = MemoryStorage::default();
        let store = SavedFilterStore::new("accounts", &storage);

        let criteria = sample_criteria();
        let saved = store.save("Active", None, &criteria).unwrap();
        assert_eq!(store.load(saved.id).unwrap(), criteria);
    }

    #[test]
    fn test_load_unknown_id_is_an_error() {
        let storage = MemoryStorage::default();
        let store = SavedFilterStore::new("accounts", &storage);

        let missing = Uuid::new_v4();
        assert!(matches!(
            store.load(missing),
            Err(FilterStoreError::NotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_collection_survives_store_reconstruction() {
        let storage = MemoryStorage::default();
        let saved = {
            let store = SavedFilterStore::new("sales", &storage);
            store.save("Big orders", None, &sample_criteria()).unwrap()
        };

        let reopened = SavedFilterStore::new("sales", &storage);
        assert_eq!(reopened.list(), vec![saved]);
    }

    #[test]
    fn test_modules_are_partitioned() {
        let storage = MemoryStorage::default();
        let accounts = SavedFilterStore::new("accounts", &storage);
        let sales = SavedFilterStore::new("sales", &storage);

        accounts.save("Active", None, &sample_criteria()).unwrap();
        assert_eq!(accounts.list().len(), 1);
        assert!(sales.list().is_empty());
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let storage = MemoryStorage::default();
        let store = SavedFilterStore::new("accounts", &storage);

        let first = store.save("First", None, &sample_criteria()).unwrap();
        let second = store.save("Second", None, &[]).unwrap();

        store.delete(first.id).unwrap();
        assert_eq!(store.list(), vec![second]);
        assert!(matches!(
            store.delete(first.id),
            Err(FilterStoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_set_default_leaves_exactly_one() {
        let storage = MemoryStorage::default();
        let store = SavedFilterStore::new("accounts", &storage);

        let a = store.save("A", None, &[]).unwrap();
        let b = store.save("B", None, &[]).unwrap();
        let c = store.save("C", None, &[]).unwrap();

        store.set_default(a.id).unwrap();
        store.set_default(b.id).unwrap();

        let defaults: Vec<Uuid> = store
            .list()
            .into_iter()
            .filter(|f| f.is_default)
            .map(|f| f.id)
            .collect();
        assert_eq!(defaults, vec![b.id]);
        assert_eq!(store.default_filter().unwrap().id, b.id);
        assert!(!store.list().iter().any(|f| f.id == c.id && f.is_default));
    }

    #[test]
    fn test_set_default_repairs_multiple_stale_flags() {
        let storage = MemoryStorage::default();
        let store = SavedFilterStore::new("accounts", &storage);

        let mut a = SavedFilter::new("A", None, vec![], "accounts");
        let mut b = SavedFilter::new("B", None, vec![], "accounts");
        a.is_default = true;
        b.is_default = true;
        let payload = serde_json::to_string(&vec![a.clone(), b]).unwrap();
        storage.write("accounts-saved-filters", &payload).unwrap();

        store.set_default(a.id).unwrap();
        let defaults: Vec<SavedFilter> = store.list().into_iter().filter(|f| f.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, a.id);
    }

    #[test]
    fn test_set_default_touches_updated_at() {
        let storage = MemoryStorage::default();
        let store = SavedFilterStore::new("accounts", &storage);

        let a = store.save("A", None, &[]).unwrap();
        assert!(a.updated_at.is_none());

        store.set_default(a.id).unwrap();
        assert!(store.default_filter().unwrap().updated_at.is_some());
    }

    #[test]
    fn test_corrupt_payload_is_treated_as_empty() {
        let storage = MemoryStorage::default();
        storage
            .write("accounts-saved-filters", "not a json payload")
            .unwrap();

        let store = SavedFilterStore::new("accounts", &storage);
        assert!(store.list().is_empty());

        // next write replaces the corrupt blob
        let saved = store.save("Fresh", None, &[]).unwrap();
        assert_eq!(store.list(), vec![saved]);
    }

    #[test]
    fn test_unknown_operator_in_payload_is_rejected_as_corrupt() {
        let storage = MemoryStorage::default();
        let payload = json!([{
            "id": Uuid::new_v4(),
            "name": "Legacy",
            "criteria": [{ "field": "status", "operator": "matchesRegex", "value": ".*" }],
            "module": "accounts",
            "createdAt": "2024-03-15T14:02:26Z",
            "isDefault": false,
        }]);
        storage
            .write("accounts-saved-filters", &payload.to_string())
            .unwrap();

        let store = SavedFilterStore::new("accounts", &storage);
        assert!(store.list().is_empty());
    }
}
