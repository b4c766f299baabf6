use crate::error::ImportError;
use crate::io::parse_workflow;
use crate::model::Workflow;

const SAMPLE_WORKFLOW_JSON: &str = include_str!("../data/sample_workflow.json");

/// The bundled four-step onboarding workflow used when nothing else is loaded.
pub fn sample_workflow() -> Result<Workflow, ImportError> {
    parse_workflow(SAMPLE_WORKFLOW_JSON)
}
