use super::workflow::{StepConfig, StepType};
use serde_json::json;

impl StepType {
    /// The configuration a freshly added step of this type starts with.
    pub fn default_config(&self) -> StepConfig {
        let pairs = match self {
            StepType::ApiCall => vec![("url", json!("/api/endpoint")), ("method", json!("GET"))],
            StepType::Filter | StepType::Condition => {
                vec![("condition", json!("equals")), ("value", json!(""))]
            }
            StepType::Transform => vec![("transformType", json!("object_restructure"))],
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}
