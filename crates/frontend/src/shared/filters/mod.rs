pub mod evaluate;
pub mod state;
pub mod store;

pub use evaluate::{apply_all, evaluate, resolve_path, Filterable};
pub use state::ModuleFilters;
pub use store::{FilterStorage, FilterStoreError, LocalStorage, MemoryStorage, SavedFilterStore};
