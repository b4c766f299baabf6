//! The workflow store: the single owner of the live workflow and its undo/redo history.
//!
//! All edits go through the store's actions. Each action either commits a brand-new
//! workflow snapshot (renumbered, with mapping references rewritten) and records it in
//! history, or leaves the state untouched. Subscribers are called after every state change.

use crate::error::{ImportError, StorageError, ValidationError};
use crate::history::History;
use crate::io::{self, StorageSlot};
use crate::model::{MappingDraft, MappingPatch, StepDraft, StepPatch, Workflow};
use crate::validation::validate_mapping;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

mod builder;
mod mutations;

pub use builder::StoreBuilder;
pub use mutations::MoveDirection;

/// Handle returned by [`WorkflowStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&WorkflowState)>;

/// Everything the presentation layer observes.
///
/// Only the store mutates this value; readers get it by shared reference.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub is_loading: bool,
    /// The last I/O or import failure, until cleared.
    pub error: Option<String>,
    pub selected_step_id: Option<String>,
    pub step_editor_open: bool,
    history: History<Workflow>,
}

impl WorkflowState {
    /// The live workflow, i.e. the snapshot under the history cursor.
    pub fn workflow(&self) -> Option<&Workflow> {
        self.history.current_ref()
    }

    /// A shared handle to the live snapshot.
    pub fn snapshot(&self) -> Option<Arc<Workflow>> {
        self.history.current()
    }

    pub fn history(&self) -> &History<Workflow> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.history.current_index()
    }
}

pub struct WorkflowStore {
    state: WorkflowState,
    storage: Box<dyn StorageSlot>,
    storage_key: String,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription_id: u64,
}

impl WorkflowStore {
    /// A store with default history capacity and in-memory storage.
    pub fn new() -> Self {
        StoreBuilder::new().build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn storage(&self) -> &dyn StorageSlot {
        self.storage.as_ref()
    }

    /// Registers a callback invoked with the new state after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&WorkflowState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.state);
        }
    }

    fn current(&self) -> Option<Arc<Workflow>> {
        self.state.history.current()
    }

    fn commit(&mut self, action: &'static str, next: Option<Workflow>) -> bool {
        match next {
            Some(workflow) => {
                self.state.history.commit(Arc::new(workflow));
                debug!(
                    action,
                    history_len = self.state.history.len(),
                    "workflow mutation committed"
                );
                self.notify();
                true
            }
            None => {
                debug!(action, "workflow mutation rejected");
                false
            }
        }
    }

    fn record_error(&mut self, message: String) {
        warn!(error = %message, "workflow store error");
        self.state.error = Some(message);
        self.notify();
    }

    /// Replaces the live workflow and resets history to this single snapshot.
    pub fn load_workflow(&mut self, workflow: Workflow) {
        info!(workflow_id = %workflow.id, steps = workflow.steps.len(), "workflow loaded");
        self.state.history.reset(Arc::new(workflow));
        self.notify();
    }

    /// Appends a new step and returns its id, or `Ok(None)` when no workflow is loaded.
    pub fn add_step(&mut self, draft: StepDraft) -> Result<Option<String>, ValidationError> {
        let Some(current) = self.current() else {
            return Ok(None);
        };
        mutations::validate_draft(&draft)?;
        let (next, id) = mutations::add_step(&current, draft);
        self.commit("add_step", Some(next));
        Ok(Some(id))
    }

    /// Applies `patch` to the step with `step_id`. Numbering is unaffected.
    /// Returns `Ok(false)` for an unknown id, an empty patch, or no workflow.
    pub fn update_step(&mut self, step_id: &str, patch: StepPatch) -> Result<bool, ValidationError> {
        let Some(current) = self.current() else {
            return Ok(false);
        };
        mutations::validate_patch(&patch)?;
        if patch.is_empty() {
            return Ok(false);
        }
        let next = mutations::update_step(&current, step_id, &patch);
        Ok(self.commit("update_step", next))
    }

    /// Deletes a step. Mappings that read from it are dropped; references to later steps
    /// shift down by one.
    pub fn delete_step(&mut self, step_id: &str) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        let next = mutations::delete_step(&current, step_id);
        if next.is_some() && self.state.selected_step_id.as_deref() == Some(step_id) {
            self.state.selected_step_id = None;
        }
        self.commit("delete_step", next)
    }

    /// Reorders steps to match `ordered_ids`, which must be a permutation of the current ids.
    pub fn reorder_steps<S: AsRef<str>>(&mut self, ordered_ids: &[S]) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        self.commit(
            "reorder_steps",
            mutations::reorder_steps(&current, ordered_ids),
        )
    }

    /// Swaps a step with its neighbour in `direction`.
    pub fn move_step(&mut self, step_id: &str, direction: MoveDirection) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        self.commit(
            "move_step",
            mutations::move_step(&current, step_id, direction),
        )
    }

    /// Adds a mapping to a step and returns its id, or `Ok(None)` for an unknown step or no
    /// workflow.
    pub fn add_mapping(
        &mut self,
        step_id: &str,
        draft: MappingDraft,
    ) -> Result<Option<String>, ValidationError> {
        let Some(current) = self.current() else {
            return Ok(None);
        };
        draft.validate()?;
        match mutations::add_mapping(&current, step_id, draft) {
            Some((next, id)) => {
                self.commit("add_mapping", Some(next));
                Ok(Some(id))
            }
            None => {
                self.commit("add_mapping", None);
                Ok(None)
            }
        }
    }

    /// Applies `patch` to a mapping. The patched mapping must still pass validation.
    pub fn update_mapping(
        &mut self,
        step_id: &str,
        mapping_id: &str,
        patch: MappingPatch,
    ) -> Result<bool, ValidationError> {
        let Some(current) = self.current() else {
            return Ok(false);
        };
        let Some(existing) = current
            .find_step(step_id)
            .and_then(|s| s.find_mapping(mapping_id))
        else {
            return Ok(self.commit("update_mapping", None));
        };

        let updated = patch.apply_to(existing);
        validate_mapping(&updated.source, &updated.target)?;
        let next = mutations::replace_mapping(&current, step_id, updated);
        Ok(self.commit("update_mapping", next))
    }

    pub fn delete_mapping(&mut self, step_id: &str, mapping_id: &str) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        self.commit(
            "delete_mapping",
            mutations::delete_mapping(&current, step_id, mapping_id),
        )
    }

    /// Moves the history cursor back one snapshot.
    pub fn undo(&mut self) -> bool {
        if self.state.history.undo().is_none() {
            return false;
        }
        debug!(index = ?self.state.history.current_index(), "undo");
        self.notify();
        true
    }

    /// Moves the history cursor forward one snapshot.
    pub fn redo(&mut self) -> bool {
        if self.state.history.redo().is_none() {
            return false;
        }
        debug!(index = ?self.state.history.current_index(), "redo");
        self.notify();
        true
    }

    pub fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.notify();
        }
    }

    pub fn select_step(&mut self, step_id: &str) {
        self.state.selected_step_id = Some(step_id.to_string());
        self.notify();
    }

    pub fn deselect_step(&mut self) {
        self.state.selected_step_id = None;
        self.notify();
    }

    pub fn toggle_step_editor(&mut self) {
        self.state.step_editor_open = !self.state.step_editor_open;
        self.notify();
    }

    /// Writes the live workflow into the storage slot. Failures land in `state.error`.
    pub fn save_workflow(&mut self) -> bool {
        let Some(current) = self.current() else {
            return false;
        };
        let result = io::to_json(&current)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.write(&self.storage_key, &json));
        match result {
            Ok(()) => {
                info!(key = %self.storage_key, "workflow saved");
                true
            }
            Err(e) => {
                self.record_error(e.to_string());
                false
            }
        }
    }

    /// Replaces the live workflow with the one in the storage slot, if any, and resets
    /// history. Failures land in `state.error` and leave the workflow unchanged.
    pub fn load_workflow_from_storage(&mut self) -> bool {
        self.state.is_loading = true;
        self.notify();

        let loaded = self.storage.read(&self.storage_key).and_then(|slot| {
            slot.map(|json| {
                io::parse_workflow(&json).map_err(|e| StorageError::Corrupt(e.to_string()))
            })
            .transpose()
        });

        self.state.is_loading = false;
        match loaded {
            Ok(Some(workflow)) => {
                self.load_workflow(workflow);
                true
            }
            Ok(None) => {
                debug!(key = %self.storage_key, "nothing saved in storage slot");
                self.notify();
                false
            }
            Err(e) => {
                self.record_error(e.to_string());
                false
            }
        }
    }

    /// Writes the live workflow as a JSON file into `dir` and returns its path.
    pub fn export_workflow(&mut self, dir: &Path) -> Option<PathBuf> {
        let current = self.current()?;
        match io::export_workflow(&current, dir) {
            Ok(path) => {
                info!(path = %path.display(), "workflow exported");
                Some(path)
            }
            Err(e) => {
                self.record_error(e.to_string());
                None
            }
        }
    }

    /// Loads a workflow from JSON text. On failure the live workflow is left unchanged and
    /// the message is also recorded in `state.error`.
    pub fn import_workflow_str(&mut self, json: &str) -> Result<(), ImportError> {
        let workflow = io::parse_workflow(json).inspect_err(|e| self.record_error(e.to_string()))?;
        self.load_workflow(workflow);
        Ok(())
    }

    /// Loads a workflow from a JSON file. See [`WorkflowStore::import_workflow_str`].
    pub fn import_workflow(&mut self, path: &Path) -> Result<(), ImportError> {
        let workflow =
            io::import_workflow_file(path).inspect_err(|e| self.record_error(e.to_string()))?;
        info!(path = %path.display(), "workflow imported");
        self.load_workflow(workflow);
        Ok(())
    }
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}
