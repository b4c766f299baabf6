use crate::error::{ImportError, StorageError};
use crate::model::Workflow;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Serializes a workflow to pretty-printed JSON with two-space indentation.
pub fn to_json(workflow: &Workflow) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(workflow)
}

/// Parses and validates a workflow from JSON text.
///
/// The payload must carry a non-empty `id`, a non-empty `name`, and a `steps` array before
/// it is decoded into the typed model.
pub fn parse_workflow(json: &str) -> Result<Workflow, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    check_shape(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn check_shape(value: &Value) -> Result<(), ImportError> {
    let is_truthy = |key: &str| match value.get(key) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) | Some(Value::Bool(false)) | None => false,
        Some(_) => true,
    };

    if !value.is_object() {
        return Err(ImportError::InvalidFormat(
            "expected a JSON object".to_string(),
        ));
    }
    if !is_truthy("id") {
        return Err(ImportError::InvalidFormat("missing workflow id".to_string()));
    }
    if !is_truthy("name") {
        return Err(ImportError::InvalidFormat(
            "missing workflow name".to_string(),
        ));
    }
    if !value.get("steps").is_some_and(Value::is_array) {
        return Err(ImportError::InvalidFormat(
            "steps must be an array".to_string(),
        ));
    }
    Ok(())
}

/// Reads and validates a workflow from a JSON file.
pub fn import_workflow_file(path: &Path) -> Result<Workflow, ImportError> {
    let content = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_workflow(&content)
}

/// The download name for an exported workflow: whitespace runs become `_`, the name is
/// lowercased, and the export time in Unix milliseconds is appended.
pub fn export_file_name(workflow_name: &str, timestamp_ms: i64) -> String {
    let slug = WHITESPACE.replace_all(workflow_name, "_").to_lowercase();
    format!("{}_{}.json", slug, timestamp_ms)
}

/// Writes `workflow` as JSON into `dir` under its export file name and returns the path.
pub fn export_workflow(workflow: &Workflow, dir: &Path) -> Result<PathBuf, StorageError> {
    let file_name = export_file_name(&workflow.name, chrono::Utc::now().timestamp_millis());
    let path = dir.join(file_name);
    let json = to_json(workflow)?;
    fs::write(&path, json).map_err(|source| StorageError::Io {
        key: path.display().to_string(),
        source,
    })?;
    Ok(path)
}
