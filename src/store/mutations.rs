//! Pure workflow transformations behind the store's actions.
//!
//! Each function reads the current snapshot and returns a brand-new `Workflow`, or `None`
//! when the operation does not apply (unknown id, boundary move, invalid permutation).
//! The input snapshot is never modified. Every returned workflow has its steps numbered
//! 1..N in array order.

use crate::error::ValidationError;
use crate::model::{Mapping, MappingDraft, Step, StepDraft, StepPatch, Workflow};
use crate::references::{Renumbering, references_step, rewrite_source};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Which neighbour a step is swapped with by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Up => write!(f, "up"),
            MoveDirection::Down => write!(f, "down"),
        }
    }
}

impl FromStr for MoveDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            other => Err(format!("unknown direction '{}', expected up or down", other)),
        }
    }
}

pub(crate) fn new_mapping_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates an id for a step appended to `workflow`.
///
/// The candidate is `step_<len+1>`; if an earlier delete left that id in use, the number is
/// bumped until a free one is found. Ids are never derived from position afterwards.
pub(crate) fn next_step_id(workflow: &Workflow) -> String {
    let taken: AHashSet<&str> = workflow.steps.iter().map(|s| s.id.as_str()).collect();
    let mut n = workflow.steps.len() + 1;
    loop {
        let candidate = format!("step_{}", n);
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

fn rebuilt(workflow: &Workflow, mut steps: Vec<Step>) -> Workflow {
    for (index, step) in steps.iter_mut().enumerate() {
        step.step_number = index as u32 + 1;
    }
    Workflow {
        id: workflow.id.clone(),
        name: workflow.name.clone(),
        steps,
    }
}

fn rewrite_mappings(steps: &mut [Step], renumbering: &Renumbering) {
    if renumbering.is_empty() {
        return;
    }
    for mapping in steps.iter_mut().flat_map(|s| s.mappings.iter_mut()) {
        mapping.source = rewrite_source(&mapping.source, renumbering);
    }
}

/// Appends a step built from `draft`. Returns the new workflow and the new step's id.
pub(crate) fn add_step(workflow: &Workflow, draft: StepDraft) -> (Workflow, String) {
    let id = next_step_id(workflow);
    let step = Step {
        id: id.clone(),
        step_number: workflow.steps.len() as u32 + 1,
        step_type: draft.step_type,
        name: draft.name,
        config: draft.config,
        mappings: draft
            .mappings
            .into_iter()
            .map(|m| m.into_mapping(new_mapping_id()))
            .collect(),
    };

    let mut steps = workflow.steps.clone();
    steps.push(step);
    (rebuilt(workflow, steps), id)
}

pub(crate) fn update_step(workflow: &Workflow, step_id: &str, patch: &StepPatch) -> Option<Workflow> {
    let index = workflow.position_of(step_id)?;
    let mut steps = workflow.steps.clone();
    let step = &mut steps[index];

    if let Some(name) = &patch.name {
        step.name = name.clone();
    }
    if let Some(step_type) = patch.step_type {
        step.step_type = step_type;
    }
    if let Some(config) = &patch.config {
        step.config.extend(config.clone());
    }
    if let Some(mappings) = &patch.mappings {
        step.mappings = mappings.clone();
    }
    Some(rebuilt(workflow, steps))
}

/// Removes a step, drops every mapping that read from it, and shifts references to the
/// steps after it down by one.
pub(crate) fn delete_step(workflow: &Workflow, step_id: &str) -> Option<Workflow> {
    let index = workflow.position_of(step_id)?;
    let removed = index as u32 + 1;
    let renumbering = Renumbering::after_removal(removed, workflow.steps.len() as u32);

    let mut steps = workflow.steps.clone();
    steps.remove(index);
    for step in &mut steps {
        step.mappings.retain(|m| !references_step(&m.source, removed));
    }
    rewrite_mappings(&mut steps, &renumbering);
    Some(rebuilt(workflow, steps))
}

/// Puts the steps into the order given by `ordered_ids`, rewriting every mapping so it keeps
/// pointing at the same producing step.
///
/// Returns `None` unless `ordered_ids` is a permutation of the current step ids. An unchanged
/// order still commits, which renumbers a workflow whose numbers have drifted.
pub(crate) fn reorder_steps<S: AsRef<str>>(workflow: &Workflow, ordered_ids: &[S]) -> Option<Workflow> {
    let ordered_ids: Vec<&str> = ordered_ids.iter().map(|id| id.as_ref()).collect();
    if ordered_ids.len() != workflow.steps.len() || !ordered_ids.iter().all_unique() {
        return None;
    }

    let by_id: AHashMap<&str, &Step> = workflow
        .steps
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();
    let mut steps = ordered_ids
        .iter()
        .map(|id| by_id.get(id).map(|s| (*s).clone()))
        .collect::<Option<Vec<Step>>>()?;

    let renumbering = Renumbering::between_orders(&workflow.step_ids(), &ordered_ids);
    rewrite_mappings(&mut steps, &renumbering);
    Some(rebuilt(workflow, steps))
}

/// Swaps a step with its neighbour. Returns `None` at the boundary or for an unknown id.
pub(crate) fn move_step(workflow: &Workflow, step_id: &str, direction: MoveDirection) -> Option<Workflow> {
    let index = workflow.position_of(step_id)?;
    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1)?,
        MoveDirection::Down if index + 1 < workflow.steps.len() => index + 1,
        MoveDirection::Down => return None,
    };

    let mut order = workflow.step_ids();
    order.swap(index, neighbour);
    reorder_steps(workflow, &order)
}

/// Appends a mapping to a step. Returns the new workflow and the mapping's id.
pub(crate) fn add_mapping(
    workflow: &Workflow,
    step_id: &str,
    draft: MappingDraft,
) -> Option<(Workflow, String)> {
    let index = workflow.position_of(step_id)?;
    let id = new_mapping_id();
    let mut steps = workflow.steps.clone();
    steps[index].mappings.push(draft.into_mapping(id.clone()));
    Some((rebuilt(workflow, steps), id))
}

/// Replaces the mapping with `mapping.id` on the given step.
pub(crate) fn replace_mapping(workflow: &Workflow, step_id: &str, mapping: Mapping) -> Option<Workflow> {
    let step_index = workflow.position_of(step_id)?;
    let mapping_index = workflow.steps[step_index]
        .mappings
        .iter()
        .position(|m| m.id == mapping.id)?;

    let mut steps = workflow.steps.clone();
    steps[step_index].mappings[mapping_index] = mapping;
    Some(rebuilt(workflow, steps))
}

pub(crate) fn delete_mapping(workflow: &Workflow, step_id: &str, mapping_id: &str) -> Option<Workflow> {
    let step_index = workflow.position_of(step_id)?;
    let mapping_index = workflow.steps[step_index]
        .mappings
        .iter()
        .position(|m| m.id == mapping_id)?;

    let mut steps = workflow.steps.clone();
    steps[step_index].mappings.remove(mapping_index);
    Some(rebuilt(workflow, steps))
}

/// Checks every field a patch would write that carries user input.
pub(crate) fn validate_patch(patch: &StepPatch) -> Result<(), ValidationError> {
    if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ValidationError::MissingStepName);
    }
    if let Some(mappings) = &patch.mappings {
        for mapping in mappings {
            crate::validation::validate_mapping(&mapping.source, &mapping.target)?;
        }
        if let Some(id) = mappings.iter().map(|m| m.id.as_str()).duplicates().next() {
            return Err(ValidationError::DuplicateMappingId(id.to_string()));
        }
    }
    Ok(())
}

/// Checks a draft's name and every mapping it carries.
pub(crate) fn validate_draft(draft: &StepDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingStepName);
    }
    draft.mappings.iter().try_for_each(MappingDraft::validate)
}
