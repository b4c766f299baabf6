use crate::model::{Step, Workflow};
use itertools::Itertools;

/// Formats workflows into human-readable text for terminals and logs.
pub struct WorkflowFormatter;

impl WorkflowFormatter {
    /// Renders the whole workflow: a header line followed by one block per step.
    pub fn format_workflow(workflow: &Workflow) -> String {
        let mut result = format!(
            "{} ({}) - {} step{}\n",
            workflow.name,
            workflow.id,
            workflow.steps.len(),
            if workflow.steps.len() == 1 { "" } else { "s" }
        );
        for step in &workflow.steps {
            result.push_str(&Self::format_step(step));
        }
        result
    }

    /// Renders one step with its configuration and mappings, indented under its number.
    pub fn format_step(step: &Step) -> String {
        let mut result = format!(
            "{:>3}. [{}] {} <{}>\n",
            step.step_number, step.step_type, step.name, step.id
        );
        if !step.config.is_empty() {
            let config = step
                .config
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .join(", ");
            result.push_str(&format!("       config: {}\n", config));
        }
        for mapping in &step.mappings {
            result.push_str(&format!(
                "       {} -> {} ({}) <{}>\n",
                mapping.source, mapping.target, mapping.data_type, mapping.id
            ));
        }
        result
    }

    /// One line per step, e.g. `1:step_1, 2:step_3`.
    pub fn format_order(workflow: &Workflow) -> String {
        workflow
            .steps
            .iter()
            .map(|s| format!("{}:{}", s.step_number, s.id))
            .join(", ")
    }
}
