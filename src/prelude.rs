//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the stepweaver
//! crate. Import this module to get access to the core functionality without having to
//! import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use stepweaver::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut store = WorkflowStore::new();
//! store.import_workflow(Path::new("path/to/workflow.json"))?;
//! store.delete_step("step_2");
//! store.save_workflow();
//! # Ok(())
//! # }
//! ```

// Store and history
pub use crate::history::History;
pub use crate::store::{MoveDirection, StoreBuilder, SubscriptionId, WorkflowState, WorkflowStore};

// Data model
pub use crate::model::{
    DataType, Mapping, MappingDraft, MappingPatch, Step, StepConfig, StepDraft, StepPatch,
    StepType, Workflow,
};

// Reference rewriting
pub use crate::references::{Renumbering, referenced_steps, rewrite_source, source_for};

// I/O
pub use crate::io::{FileStorage, MemoryStorage, StorageSlot};
pub use crate::sample::sample_workflow;

// Validation
pub use crate::validation::{validate_mapping, validate_workflow};

// Error types
pub use crate::error::{ImportError, StorageError, ValidationError, WorkflowError};

// Rendering
pub use crate::render::WorkflowFormatter;

// Standard library re-exports commonly used with this crate
pub use std::path::Path;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
