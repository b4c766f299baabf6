//! Common test utilities for building workflows and stores.
use stepweaver::prelude::*;

/// Builds a mapping with the given id and source, targeting `request.<id>`.
#[allow(dead_code)]
pub fn mapping(id: &str, source: &str) -> Mapping {
    Mapping {
        id: id.to_string(),
        source: source.to_string(),
        target: format!("request.{}", id),
        data_type: DataType::String,
    }
}

/// Builds a step whose number is its 1-based `position`.
#[allow(dead_code)]
pub fn step(id: &str, position: u32, mappings: Vec<Mapping>) -> Step {
    Step {
        id: id.to_string(),
        step_number: position,
        step_type: StepType::ApiCall,
        name: id.to_uppercase(),
        config: StepType::ApiCall.default_config(),
        mappings,
    }
}

#[allow(dead_code)]
pub fn workflow(steps: Vec<Step>) -> Workflow {
    Workflow {
        id: "wf_test".to_string(),
        name: "Test Workflow".to_string(),
        steps,
    }
}

/// Creates a four-step chain where later steps read from earlier ones:
///
/// - `a` (1): no mappings
/// - `b` (2): `m_b1` reads step 1
/// - `c` (3): `m_c1` reads step 1, `m_c2` reads step 2
/// - `d` (4): `m_d1` reads step 3, `m_d2` reads step 2
#[allow(dead_code)]
pub fn create_chain_workflow() -> Workflow {
    workflow(vec![
        step("a", 1, vec![]),
        step("b", 2, vec![mapping("m_b1", "${step_1.response.user.id}")]),
        step(
            "c",
            3,
            vec![
                mapping("m_c1", "${step_1.response.user.email}"),
                mapping("m_c2", "${step_2.response.items}"),
            ],
        ),
        step(
            "d",
            4,
            vec![
                mapping("m_d1", "${step_3.response.payload}"),
                mapping("m_d2", "${step_2.response.count}"),
            ],
        ),
    ])
}

/// A store with default settings and `workflow` loaded.
#[allow(dead_code)]
pub fn store_with(workflow: Workflow) -> WorkflowStore {
    let mut store = WorkflowStore::new();
    store.load_workflow(workflow);
    store
}

/// The live workflow of `store`, cloned. Panics if none is loaded.
#[allow(dead_code)]
pub fn live(store: &WorkflowStore) -> Workflow {
    store
        .state()
        .workflow()
        .cloned()
        .expect("store should hold a workflow")
}

/// Looks up the source of a mapping by step id and mapping id.
#[allow(dead_code)]
pub fn source_of(workflow: &Workflow, step_id: &str, mapping_id: &str) -> Option<String> {
    workflow
        .find_step(step_id)
        .and_then(|s| s.find_mapping(mapping_id))
        .map(|m| m.source.clone())
}

/// The step ids of `workflow` in order.
#[allow(dead_code)]
pub fn order(workflow: &Workflow) -> Vec<String> {
    workflow.steps.iter().map(|s| s.id.clone()).collect()
}

/// A storage slot whose every operation fails.
#[allow(dead_code)]
pub struct FailingStorage;

impl StorageSlot for FailingStorage {
    fn read(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read denied"),
        })
    }

    fn write(&mut self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
        Err(StorageError::Io {
            key: key.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "write denied"),
        })
    }
}
