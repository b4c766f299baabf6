use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form step configuration, keyed by setting name. Keys keep their insertion order.
pub type StepConfig = serde_json::Map<String, serde_json::Value>;

/// The kind of work a step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepType {
    ApiCall,
    Filter,
    Transform,
    Condition,
}

impl StepType {
    pub const ALL: [StepType; 4] = [
        StepType::ApiCall,
        StepType::Filter,
        StepType::Transform,
        StepType::Condition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepType::ApiCall => "API_CALL",
            StepType::Filter => "FILTER",
            StepType::Transform => "TRANSFORM",
            StepType::Condition => "CONDITION",
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownStepType(s.to_string()))
    }
}

/// The declared type of the value carried by a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Object,
    Array,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Object => "object",
            DataType::Array => "array",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(DataType::String),
            "number" => Ok(DataType::Number),
            "object" => Ok(DataType::Object),
            "array" => Ok(DataType::Array),
            _ => Err(ValidationError::UnknownDataType(s.to_string())),
        }
    }
}

/// A data link from an earlier step's response into the request of the owning step.
///
/// `source` is a symbolic reference such as `${step_2.response.data.email}`; the step
/// number inside it is rewritten by the store whenever the producing step changes position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub id: String,
    pub source: String,
    pub target: String,
    pub data_type: DataType,
}

/// One unit of workflow execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Stable identity. Never regenerated after creation.
    pub id: String,
    /// 1-based position in the owning workflow, recomputed on every structural change.
    pub step_number: u32,
    #[serde(rename = "type")]
    pub step_type: StepType,
    pub name: String,
    #[serde(default)]
    pub config: StepConfig,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

impl Step {
    pub fn find_mapping(&self, mapping_id: &str) -> Option<&Mapping> {
        self.mappings.iter().find(|m| m.id == mapping_id)
    }
}

/// An ordered sequence of steps. Values of this type are treated as immutable snapshots
/// once published by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub steps: Vec<Step>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn find_step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// Returns the zero-based index of the step with the given id.
    pub fn position_of(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    pub fn step_ids(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.id.as_str()).collect()
    }

    /// True when every step's number matches its 1-based position.
    pub fn is_contiguous(&self) -> bool {
        self.steps
            .iter()
            .enumerate()
            .all(|(i, s)| s.step_number as usize == i + 1)
    }
}
