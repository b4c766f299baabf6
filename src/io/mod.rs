//! Codecs and storage around the store's serialized state.

pub mod codec;
pub mod storage;

pub use codec::{export_file_name, export_workflow, import_workflow_file, parse_workflow, to_json};
pub use storage::{DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, StorageSlot};
