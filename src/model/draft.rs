use super::workflow::{DataType, Mapping, StepConfig, StepType};
use crate::error::ValidationError;

/// The caller-supplied part of a new step. The store assigns `id` and `step_number`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDraft {
    pub step_type: StepType,
    pub name: String,
    pub config: StepConfig,
    pub mappings: Vec<MappingDraft>,
}

impl StepDraft {
    /// Builds a draft carrying the default configuration for `step_type`.
    /// The name is trimmed; a blank name is rejected.
    pub fn with_defaults(step_type: StepType, name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingStepName);
        }
        Ok(Self {
            step_type,
            name: name.to_string(),
            config: step_type.default_config(),
            mappings: Vec::new(),
        })
    }

    pub fn with_mapping(mut self, mapping: MappingDraft) -> Self {
        self.mappings.push(mapping);
        self
    }
}

/// The caller-supplied part of a new mapping. The store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDraft {
    pub source: String,
    pub target: String,
    pub data_type: DataType,
}

impl MappingDraft {
    pub fn new(source: impl Into<String>, target: impl Into<String>, data_type: DataType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            data_type,
        }
    }

    pub(crate) fn into_mapping(self, id: String) -> Mapping {
        Mapping {
            id,
            source: self.source,
            target: self.target,
            data_type: self.data_type,
        }
    }
}

/// Partial update of a step. `None` fields are left untouched; `config` entries are
/// merged key-by-key into the existing configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPatch {
    pub name: Option<String>,
    pub step_type: Option<StepType>,
    pub config: Option<StepConfig>,
    pub mappings: Option<Vec<Mapping>>,
}

impl StepPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn step_type(mut self, step_type: StepType) -> Self {
        self.step_type = Some(step_type);
        self
    }

    pub fn config_entry(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config
            .get_or_insert_with(StepConfig::new)
            .insert(key.into(), value);
        self
    }

    pub fn mappings(mut self, mappings: Vec<Mapping>) -> Self {
        self.mappings = Some(mappings);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.step_type.is_none()
            && self.config.is_none()
            && self.mappings.is_none()
    }
}

/// Partial update of a mapping. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPatch {
    pub source: Option<String>,
    pub target: Option<String>,
    pub data_type: Option<DataType>,
}

impl MappingPatch {
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Returns a copy of `mapping` with this patch applied.
    pub fn apply_to(&self, mapping: &Mapping) -> Mapping {
        Mapping {
            id: mapping.id.clone(),
            source: self.source.clone().unwrap_or_else(|| mapping.source.clone()),
            target: self.target.clone().unwrap_or_else(|| mapping.target.clone()),
            data_type: self.data_type.unwrap_or(mapping.data_type),
        }
    }
}
