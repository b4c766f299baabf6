//! Entry-point validation for mapping input and imported workflows.
//!
//! Structural mutations in the store never re-check the mapping grammar; only the places
//! where a user creates or edits a mapping do.

use crate::error::ValidationError;
use crate::model::{MappingDraft, Workflow};

/// Checks a mapping's source and target, reporting the first problem found.
///
/// A source must look like `${step_<n>...response...}` and a target must be a non-empty
/// path that does not start with `$`.
pub fn validate_mapping(source: &str, target: &str) -> Result<(), ValidationError> {
    validate_source(source)?;
    validate_target(target)
}

pub fn validate_source(source: &str) -> Result<(), ValidationError> {
    if source.trim().is_empty() {
        Err(ValidationError::MissingSource)
    } else if !source.starts_with("${step_") {
        Err(ValidationError::SourcePrefix)
    } else if !source.ends_with('}') {
        Err(ValidationError::SourceSuffix)
    } else if !source.contains(".response") {
        Err(ValidationError::SourceResponse)
    } else {
        Ok(())
    }
}

pub fn validate_target(target: &str) -> Result<(), ValidationError> {
    let target = target.trim();
    if target.is_empty() {
        Err(ValidationError::MissingTarget)
    } else if target.starts_with('$') {
        Err(ValidationError::TargetPrefix)
    } else {
        Ok(())
    }
}

impl MappingDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_mapping(&self.source, &self.target)
    }
}

/// Collects human-readable problems with a workflow's top-level shape and numbering.
/// An empty list means the workflow is usable as-is.
pub fn validate_workflow(workflow: &Workflow) -> Vec<String> {
    let mut errors = Vec::new();
    if workflow.id.trim().is_empty() {
        errors.push("Workflow ID is required".to_string());
    }
    if workflow.name.trim().is_empty() {
        errors.push("Workflow name is required".to_string());
    }
    for (index, step) in workflow.steps.iter().enumerate() {
        if step.step_number as usize != index + 1 {
            errors.push(format!(
                "Step '{}' is numbered {} but sits at position {}",
                step.id,
                step.step_number,
                index + 1
            ));
        }
    }
    errors
}
