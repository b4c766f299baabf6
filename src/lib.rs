//! # Stepweaver - Workflow Mutation Engine
//!
//! **Stepweaver** keeps a step-by-step workflow consistent while it is being edited. A
//! workflow is an ordered list of steps (API calls, filters, transforms, conditions); each
//! step can carry *mappings* that read fields from the responses of earlier steps through
//! symbolic references such as `${step_2.response.data.email}`.
//!
//! Those references are written with step *numbers*, but they mean step *identities*. The
//! store therefore renumbers steps and rewrites every affected reference whenever steps
//! are deleted, reordered or moved, and records each resulting snapshot in a bounded
//! undo/redo history.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Hand a [`model::Workflow`] to a [`store::WorkflowStore`] (from the bundled
//!     sample, a storage slot, or an imported JSON file).
//! 2.  **Edit**: Call the store's actions (`add_step`, `delete_step`, `reorder_steps`,
//!     `move_step`, `add_mapping`, ...). Every successful action commits a new immutable
//!     snapshot; invalid or inapplicable actions leave the state untouched.
//! 3.  **Observe**: Read [`store::WorkflowStore::state`] or register a subscriber.
//! 4.  **Persist**: Save to the configured [`io::StorageSlot`] or export a JSON file.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stepweaver::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut store = WorkflowStore::builder().with_history_capacity(20).build();
//!     store.load_workflow(sample_workflow()?);
//!
//!     // Move the third step to the top. Every mapping that read from it, or from the
//!     // steps it jumped over, is rewritten to the new numbers.
//!     store.move_step("step_3", MoveDirection::Up);
//!     store.move_step("step_3", MoveDirection::Up);
//!
//!     let draft = StepDraft::with_defaults(StepType::ApiCall, "Notify Admin")?
//!         .with_mapping(MappingDraft::new(
//!             "${step_1.response.payload}",
//!             "request.body",
//!             DataType::Object,
//!         ));
//!     store.add_step(draft)?;
//!
//!     if let Some(workflow) = store.state().workflow() {
//!         println!("{}", WorkflowFormatter::format_workflow(workflow));
//!     }
//!
//!     store.undo();
//!     assert!(store.state().can_redo());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod history;
pub mod io;
pub mod model;
pub mod prelude;
pub mod references;
pub mod render;
pub mod sample;
pub mod store;
pub mod validation;
