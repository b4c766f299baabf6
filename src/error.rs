use thiserror::Error;

/// Errors raised when user-supplied step or mapping data fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Source is required")]
    MissingSource,

    #[error("Source must start with ${{step_")]
    SourcePrefix,

    #[error("Source must end with }}")]
    SourceSuffix,

    #[error("Source must include .response")]
    SourceResponse,

    #[error("Target is required")]
    MissingTarget,

    #[error("Target should not start with $")]
    TargetPrefix,

    #[error("Step name is required")]
    MissingStepName,

    #[error("Mapping id '{0}' is used more than once in the step")]
    DuplicateMappingId(String),

    #[error("Unknown step type '{0}'")]
    UnknownStepType(String),

    #[error("Unknown data type '{0}'")]
    UnknownDataType(String),
}

/// Errors that can occur when importing a workflow from JSON text or a file.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid workflow format: {0}")]
    InvalidFormat(String),
}

/// Errors raised by a storage slot or by writing an exported file.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize workflow: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Stored workflow is unusable: {0}")]
    Corrupt(String),
}

/// Umbrella error for callers that drive the store through fallible entry points.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
