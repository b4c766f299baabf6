use super::{WorkflowState, WorkflowStore};
use crate::history::{DEFAULT_HISTORY_CAPACITY, History};
use crate::io::{DEFAULT_STORAGE_KEY, MemoryStorage, StorageSlot};

/// Configures and creates a [`WorkflowStore`].
pub struct StoreBuilder {
    history_capacity: usize,
    storage: Box<dyn StorageSlot>,
    storage_key: String,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            storage: Box::new(MemoryStorage::new()),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Maximum number of snapshots kept for undo/redo. Values below one are raised to one.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_storage(mut self, storage: impl StorageSlot + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    pub fn build(self) -> WorkflowStore {
        WorkflowStore {
            state: WorkflowState {
                is_loading: false,
                error: None,
                selected_step_id: None,
                step_editor_open: false,
                history: History::new(self.history_capacity),
            },
            storage: self.storage,
            storage_key: self.storage_key,
            subscribers: Vec::new(),
            next_subscription_id: 0,
        }
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
