//! Tests for the workflow store's mutation actions.
mod common;
use common::*;
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use stepweaver::prelude::*;

// --- Deleting steps ---

#[test]
fn test_delete_first_step_drops_mapping_that_read_it() {
    let mut store = store_with(workflow(vec![
        step("a", 1, vec![]),
        step("b", 2, vec![mapping("m1", "${step_1.response.x}")]),
    ]));

    assert!(store.delete_step("a"));
    let wf = live(&store);
    assert_eq!(order(&wf), vec!["b"]);
    assert_eq!(wf.steps[0].step_number, 1);
    assert!(wf.steps[0].mappings.is_empty());
}

#[test]
fn test_delete_middle_step_keeps_unrelated_reference() {
    let mut store = store_with(workflow(vec![
        step("a", 1, vec![]),
        step("b", 2, vec![]),
        step("c", 3, vec![mapping("m1", "${step_1.response.x}")]),
    ]));

    assert!(store.delete_step("b"));
    let wf = live(&store);
    assert_eq!(order(&wf), vec!["a", "c"]);
    assert_eq!(wf.steps[1].step_number, 2);
    assert_eq!(source_of(&wf, "c", "m1").as_deref(), Some("${step_1.response.x}"));
}

#[test]
fn test_delete_shifts_later_references_and_drops_dangling_ones() {
    let mut store = store_with(create_chain_workflow());
    assert!(store.delete_step("b"));

    let wf = live(&store);
    assert_eq!(order(&wf), vec!["a", "c", "d"]);
    assert!(wf.is_contiguous());

    // Mappings that read step 2 are gone everywhere.
    assert_eq!(source_of(&wf, "c", "m_c2"), None);
    assert_eq!(source_of(&wf, "d", "m_d2"), None);
    // Earlier references untouched, later ones shifted down.
    assert_eq!(
        source_of(&wf, "c", "m_c1").as_deref(),
        Some("${step_1.response.user.email}")
    );
    assert_eq!(
        source_of(&wf, "d", "m_d1").as_deref(),
        Some("${step_2.response.payload}")
    );
}

#[test]
fn test_delete_last_step_rewrites_nothing() {
    let mut store = store_with(create_chain_workflow());
    let before = live(&store);
    assert!(store.delete_step("d"));

    let wf = live(&store);
    assert_eq!(wf.steps.len(), 3);
    assert_eq!(&wf.steps[..], &before.steps[..3]);
}

#[test]
fn test_delete_unknown_step_is_noop() {
    let mut store = store_with(create_chain_workflow());
    assert!(!store.delete_step("nope"));
    assert_eq!(store.state().history().len(), 1);
}

#[test]
fn test_delete_does_not_confuse_step_1_with_step_12() {
    let steps: Vec<Step> = (1..=12)
        .map(|n| step(&format!("s{}", n), n, vec![]))
        .chain(std::iter::once(step(
            "s13",
            13,
            vec![mapping("m12", "${step_12.response.x}")],
        )))
        .collect();
    let mut store = store_with(workflow(steps));

    assert!(store.delete_step("s1"));
    let wf = live(&store);
    assert_eq!(source_of(&wf, "s13", "m12").as_deref(), Some("${step_11.response.x}"));
}

#[test]
fn test_delete_clears_selection_of_deleted_step() {
    let mut store = store_with(create_chain_workflow());
    store.select_step("c");
    store.delete_step("c");
    assert_eq!(store.state().selected_step_id, None);

    store.select_step("a");
    store.delete_step("d");
    assert_eq!(store.state().selected_step_id.as_deref(), Some("a"));
}

#[test]
fn test_delete_with_duplicate_ids_removes_only_first_match() {
    let mut store = store_with(workflow(vec![
        step("a", 1, vec![]),
        step("a", 2, vec![]),
        step(
            "c",
            3,
            vec![
                mapping("m_first", "${step_1.response.x}"),
                mapping("m_second", "${step_2.response.x}"),
            ],
        ),
    ]));

    assert!(store.delete_step("a"));
    let wf = live(&store);
    assert_eq!(order(&wf), vec!["a", "c"]);
    assert!(wf.is_contiguous());
    assert_eq!(source_of(&wf, "c", "m_first"), None);
    assert_eq!(
        source_of(&wf, "c", "m_second").as_deref(),
        Some("${step_1.response.x}")
    );
}

#[test]
fn test_delete_of_selected_step_notifies_once() {
    let mut store = store_with(create_chain_workflow());
    store.select_step("b");

    let seen: Rc<RefCell<Vec<(Option<String>, usize)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |state| {
        let steps = state.workflow().map_or(0, |w| w.steps.len());
        sink.borrow_mut().push((state.selected_step_id.clone(), steps));
    });

    assert!(store.delete_step("b"));
    assert_eq!(*seen.borrow(), vec![(None, 3)]);
}

// --- Moving steps ---

#[test]
fn test_move_up_swaps_numbers_across_all_mappings() {
    let mut store = store_with(create_chain_workflow());
    assert!(store.move_step("b", MoveDirection::Up));

    let wf = live(&store);
    assert_eq!(order(&wf), vec!["b", "a", "c", "d"]);
    assert!(wf.is_contiguous());

    assert_eq!(source_of(&wf, "b", "m_b1").as_deref(), Some("${step_2.response.user.id}"));
    assert_eq!(
        source_of(&wf, "c", "m_c1").as_deref(),
        Some("${step_2.response.user.email}")
    );
    assert_eq!(source_of(&wf, "c", "m_c2").as_deref(), Some("${step_1.response.items}"));
    assert_eq!(source_of(&wf, "d", "m_d2").as_deref(), Some("${step_1.response.count}"));
    // Step 3 was not involved.
    assert_eq!(
        source_of(&wf, "d", "m_d1").as_deref(),
        Some("${step_3.response.payload}")
    );
}

#[test]
fn test_move_down_then_up_restores_original() {
    let original = create_chain_workflow();
    let mut store = store_with(original.clone());

    assert!(store.move_step("b", MoveDirection::Down));
    assert!(store.move_step("b", MoveDirection::Up));
    assert_eq!(live(&store), original);
}

#[test]
fn test_move_at_boundaries_is_noop() {
    let mut store = store_with(create_chain_workflow());
    assert!(!store.move_step("a", MoveDirection::Up));
    assert!(!store.move_step("d", MoveDirection::Down));
    assert!(!store.move_step("zzz", MoveDirection::Up));
    assert_eq!(store.state().history().len(), 1);
}

// --- Reordering steps ---

#[test]
fn test_reorder_reverse_preserves_identity() {
    let mut store = store_with(create_chain_workflow());
    assert!(store.reorder_steps(&["d", "c", "b", "a"]));

    let wf = live(&store);
    assert_eq!(order(&wf), vec!["d", "c", "b", "a"]);
    assert!(wf.is_contiguous());
    assert_eq!(source_of(&wf, "b", "m_b1").as_deref(), Some("${step_4.response.user.id}"));
    assert_eq!(
        source_of(&wf, "c", "m_c1").as_deref(),
        Some("${step_4.response.user.email}")
    );
    assert_eq!(source_of(&wf, "c", "m_c2").as_deref(), Some("${step_3.response.items}"));
    assert_eq!(
        source_of(&wf, "d", "m_d1").as_deref(),
        Some("${step_2.response.payload}")
    );
    assert_eq!(source_of(&wf, "d", "m_d2").as_deref(), Some("${step_3.response.count}"));
}

#[test]
fn test_reorder_three_cycle() {
    let mut store = store_with(create_chain_workflow());
    assert!(store.reorder_steps(&["c", "a", "b", "d"]));

    let wf = live(&store);
    assert_eq!(
        source_of(&wf, "d", "m_d1").as_deref(),
        Some("${step_1.response.payload}")
    );
    assert_eq!(source_of(&wf, "d", "m_d2").as_deref(), Some("${step_3.response.count}"));
    assert_eq!(
        source_of(&wf, "c", "m_c1").as_deref(),
        Some("${step_2.response.user.email}")
    );
    assert_eq!(source_of(&wf, "c", "m_c2").as_deref(), Some("${step_3.response.items}"));
}

#[test]
fn test_reorder_then_inverse_round_trips() {
    let original = create_chain_workflow();
    let mut store = store_with(original.clone());

    assert!(store.reorder_steps(&["b", "d", "a", "c"]));
    assert!(store.reorder_steps(&["a", "b", "c", "d"]));
    assert_eq!(live(&store), original);
}

#[test]
fn test_reorder_rejects_non_permutations() {
    let mut store = store_with(create_chain_workflow());

    assert!(!store.reorder_steps(&["a", "a", "c", "d"]));
    assert!(!store.reorder_steps(&["a", "b", "c"]));
    assert!(!store.reorder_steps(&["a", "b", "c", "x"]));
    assert!(!store.reorder_steps(&["a", "b", "c", "d", "a"]));

    assert_eq!(live(&store), create_chain_workflow());
    assert_eq!(store.state().history().len(), 1);
}

#[test]
fn test_reorder_to_current_order_commits() {
    let mut store = store_with(create_chain_workflow());
    assert!(store.reorder_steps(&["a", "b", "c", "d"]));
    assert_eq!(live(&store), create_chain_workflow());
    assert_eq!(store.state().history().len(), 2);
}

#[test]
fn test_reorder_to_current_order_repairs_drifted_numbers() {
    let mut drifted = create_chain_workflow();
    drifted.steps[0].step_number = 7;
    drifted.steps[2].step_number = 9;
    let mut store = store_with(drifted);

    assert!(store.reorder_steps(&["a", "b", "c", "d"]));
    let wf = live(&store);
    assert!(wf.is_contiguous());
    assert!(validate_workflow(&wf).is_empty());
    assert_eq!(
        source_of(&wf, "d", "m_d1").as_deref(),
        Some("${step_3.response.payload}")
    );
}

// --- Adding and updating steps ---

#[test]
fn test_add_step_appends_with_next_number() {
    let mut store = store_with(create_chain_workflow());
    let draft = StepDraft::with_defaults(StepType::Transform, "  Reshape  ").unwrap();
    let id = store.add_step(draft).unwrap().expect("step should be added");

    let wf = live(&store);
    let added = wf.steps.last().unwrap();
    assert_eq!(added.id, id);
    assert_eq!(added.step_number, 5);
    assert_eq!(added.name, "Reshape");
    assert_eq!(added.config.get("transformType"), Some(&json!("object_restructure")));
    assert!(wf.is_contiguous());
}

#[test]
fn test_add_step_id_avoids_collision_after_delete() {
    let mut store = store_with(sample_workflow().unwrap());
    store.delete_step("step_2");

    let draft = StepDraft::with_defaults(StepType::Filter, "Extra").unwrap();
    let id = store.add_step(draft).unwrap().unwrap();

    let wf = live(&store);
    assert_eq!(id, "step_5");
    assert_eq!(order(&wf), vec!["step_1", "step_3", "step_4", "step_5"]);
    assert_eq!(wf.steps[3].step_number, 4);
}

#[test]
fn test_add_step_generates_mapping_ids() {
    let mut store = store_with(create_chain_workflow());
    let draft = StepDraft::with_defaults(StepType::ApiCall, "Call")
        .unwrap()
        .with_mapping(MappingDraft::new("${step_4.response.id}", "request.id", DataType::Number))
        .with_mapping(MappingDraft::new("${step_1.response.id}", "request.owner", DataType::Number));
    store.add_step(draft).unwrap();

    let wf = live(&store);
    let mappings = &wf.steps[4].mappings;
    assert_eq!(mappings.len(), 2);
    assert_ne!(mappings[0].id, mappings[1].id);
    assert!(!mappings[0].id.is_empty());
}

#[test]
fn test_add_step_rejects_invalid_input() {
    let mut store = store_with(create_chain_workflow());

    let blank = StepDraft {
        step_type: StepType::Filter,
        name: "   ".to_string(),
        config: StepConfig::new(),
        mappings: vec![],
    };
    assert_eq!(store.add_step(blank), Err(ValidationError::MissingStepName));

    let bad_mapping = StepDraft::with_defaults(StepType::Filter, "Filter")
        .unwrap()
        .with_mapping(MappingDraft::new("step_1.response", "x", DataType::String));
    assert_eq!(store.add_step(bad_mapping), Err(ValidationError::SourcePrefix));

    assert_eq!(store.state().history().len(), 1);
    assert_eq!(store.state().error, None);
}

#[test]
fn test_update_step_merges_config() {
    let mut store = store_with(create_chain_workflow());
    let patch = StepPatch::default()
        .name("Fetch Account")
        .config_entry("method", json!("POST"))
        .config_entry("timeout", json!(30));

    assert_eq!(store.update_step("a", patch), Ok(true));
    let wf = live(&store);
    let a = wf.find_step("a").unwrap();
    assert_eq!(a.name, "Fetch Account");
    assert_eq!(a.config.get("method"), Some(&json!("POST")));
    assert_eq!(a.config.get("timeout"), Some(&json!(30)));
    assert_eq!(a.config.get("url"), Some(&json!("/api/endpoint")));
    assert_eq!(a.step_number, 1);
}

#[test]
fn test_update_step_noops() {
    let mut store = store_with(create_chain_workflow());
    assert_eq!(store.update_step("missing", StepPatch::default().name("x")), Ok(false));
    assert_eq!(store.update_step("a", StepPatch::default()), Ok(false));
    assert_eq!(
        store.update_step("a", StepPatch::default().name(" ")),
        Err(ValidationError::MissingStepName)
    );
    assert_eq!(store.state().history().len(), 1);
}

#[test]
fn test_update_step_rejects_duplicate_mapping_ids() {
    let mut store = store_with(create_chain_workflow());
    let patch = StepPatch::default().mappings(vec![
        mapping("dup", "${step_1.response.a}"),
        mapping("dup", "${step_1.response.b}"),
    ]);

    assert_eq!(
        store.update_step("c", patch),
        Err(ValidationError::DuplicateMappingId("dup".to_string()))
    );
    assert_eq!(store.state().history().len(), 1);

    let distinct = StepPatch::default().mappings(vec![
        mapping("one", "${step_1.response.a}"),
        mapping("two", "${step_1.response.b}"),
    ]);
    assert_eq!(store.update_step("c", distinct), Ok(true));
}

// --- Mappings ---

#[test]
fn test_add_update_delete_mapping() {
    let mut store = store_with(create_chain_workflow());
    let id = store
        .add_mapping(
            "d",
            MappingDraft::new("${step_1.response.user.name}", "request.name", DataType::String),
        )
        .unwrap()
        .expect("mapping should be added");

    let wf = live(&store);
    assert_eq!(wf.find_step("d").unwrap().mappings.len(), 3);
    assert!(wf.is_contiguous());

    let patch = MappingPatch::default()
        .target("request.fullName")
        .data_type(DataType::Object);
    assert_eq!(store.update_mapping("d", &id, patch), Ok(true));
    let wf = live(&store);
    let m = wf.find_step("d").unwrap().find_mapping(&id).unwrap();
    assert_eq!(m.target, "request.fullName");
    assert_eq!(m.data_type, DataType::Object);
    assert_eq!(m.source, "${step_1.response.user.name}");

    assert!(store.delete_mapping("d", &id));
    assert_eq!(live(&store).find_step("d").unwrap().mappings.len(), 2);
    assert_eq!(store.state().history().len(), 4);
}

#[test]
fn test_mapping_ids_are_unique_across_steps() {
    let mut store = store_with(create_chain_workflow());
    let draft = || MappingDraft::new("${step_1.response.x}", "y", DataType::String);
    let first = store.add_mapping("b", draft()).unwrap().unwrap();
    let second = store.add_mapping("c", draft()).unwrap().unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_mapping_validation_errors() {
    let mut store = store_with(create_chain_workflow());
    let cases = [
        ("", "x", ValidationError::MissingSource),
        ("step_1.response.x", "x", ValidationError::SourcePrefix),
        ("${step_1.response.x", "x", ValidationError::SourceSuffix),
        ("${step_1.data.x}", "x", ValidationError::SourceResponse),
        ("${step_1.response.x}", "  ", ValidationError::MissingTarget),
        ("${step_1.response.x}", "$target", ValidationError::TargetPrefix),
    ];
    for (source, target, expected) in cases {
        let result = store.add_mapping("b", MappingDraft::new(source, target, DataType::String));
        assert_eq!(result, Err(expected));
    }
    assert_eq!(store.state().history().len(), 1);
}

#[test]
fn test_update_mapping_validates_merged_result() {
    let mut store = store_with(create_chain_workflow());
    assert_eq!(
        store.update_mapping("b", "m_b1", MappingPatch::default().target("$bad")),
        Err(ValidationError::TargetPrefix)
    );
    assert_eq!(
        store.update_mapping("b", "missing", MappingPatch::default().target("ok")),
        Ok(false)
    );
    assert_eq!(
        store.update_mapping("x", "m_b1", MappingPatch::default().target("ok")),
        Ok(false)
    );
    assert_eq!(store.state().history().len(), 1);
}

#[test]
fn test_mapping_ops_on_unknown_ids_are_noops() {
    let mut store = store_with(create_chain_workflow());
    let draft = MappingDraft::new("${step_1.response.x}", "y", DataType::String);
    assert_eq!(store.add_mapping("nope", draft), Ok(None));
    assert!(!store.delete_mapping("b", "nope"));
    assert!(!store.delete_mapping("nope", "m_b1"));
    assert_eq!(store.state().history().len(), 1);
}

// --- No workflow loaded ---

#[test]
fn test_actions_without_workflow_are_noops() {
    let mut store = WorkflowStore::new();
    let draft = StepDraft::with_defaults(StepType::ApiCall, "x").unwrap();
    let mapping = MappingDraft::new("${step_1.response.x}", "y", DataType::String);

    assert_eq!(store.add_step(draft), Ok(None));
    assert_eq!(store.update_step("a", StepPatch::default().name("n")), Ok(false));
    assert!(!store.delete_step("a"));
    assert!(!store.reorder_steps(&["a"]));
    assert!(!store.move_step("a", MoveDirection::Down));
    assert_eq!(store.add_mapping("a", mapping), Ok(None));
    assert_eq!(store.update_mapping("a", "m", MappingPatch::default()), Ok(false));
    assert!(!store.delete_mapping("a", "m"));
    assert!(!store.undo());
    assert!(!store.redo());
    assert!(!store.save_workflow());

    assert!(store.state().workflow().is_none());
    assert!(store.state().history().is_empty());
}

// --- History through the store ---

#[test]
fn test_undo_redo_restore_exact_snapshots() {
    let original = create_chain_workflow();
    let mut store = store_with(original.clone());

    store.delete_step("b");
    let mutated = live(&store);

    assert!(store.undo());
    assert_eq!(live(&store), original);
    assert!(!store.state().can_undo());
    assert!(store.state().can_redo());

    assert!(store.redo());
    assert_eq!(live(&store), mutated);
    assert!(!store.state().can_redo());
}

#[test]
fn test_new_mutation_after_undo_discards_redo() {
    let mut store = store_with(create_chain_workflow());
    store.delete_step("d");
    store.undo();
    store.move_step("a", MoveDirection::Down);

    assert!(!store.state().can_redo());
    assert_eq!(store.state().history().len(), 2);
    assert_eq!(order(&live(&store)), vec!["b", "a", "c", "d"]);
}

#[test]
fn test_history_capacity_bounds_undo_depth() {
    let k = 3;
    let mut store = WorkflowStore::builder().with_history_capacity(k).build();
    store.load_workflow(create_chain_workflow());

    for i in 0..=k {
        let draft = StepDraft::with_defaults(StepType::Condition, &format!("c{}", i)).unwrap();
        store.add_step(draft).unwrap();
        assert!(store.state().history().len() <= k);
    }

    let mut undos = 0;
    while store.undo() {
        undos += 1;
    }
    assert_eq!(undos, k - 1);
}

#[test]
fn test_load_resets_history() {
    let mut store = store_with(create_chain_workflow());
    store.delete_step("a");
    store.delete_step("b");
    store.undo();

    store.load_workflow(sample_workflow().unwrap());
    let state = store.state();
    assert_eq!(state.history().len(), 1);
    assert_eq!(state.current_index(), Some(0));
    assert!(!state.can_undo());
    assert!(!state.can_redo());
}

#[test]
fn test_published_snapshots_are_not_mutated() {
    let mut store = store_with(create_chain_workflow());
    let before = store.state().snapshot().unwrap();
    store.reorder_steps(&["d", "c", "b", "a"]);
    store.delete_step("c");
    assert_eq!(*before, create_chain_workflow());
}

// --- UI state and subscribers ---

#[test]
fn test_selection_and_editor_toggle_do_not_touch_history() {
    let mut store = store_with(create_chain_workflow());
    store.select_step("b");
    assert_eq!(store.state().selected_step_id.as_deref(), Some("b"));
    store.deselect_step();
    assert_eq!(store.state().selected_step_id, None);

    store.toggle_step_editor();
    assert!(store.state().step_editor_open);
    store.toggle_step_editor();
    assert!(!store.state().step_editor_open);

    assert_eq!(store.state().history().len(), 1);
}

#[test]
fn test_subscribers_see_every_committed_change() {
    let mut store = WorkflowStore::new();
    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = store.subscribe(move |state| {
        sink.borrow_mut()
            .push(state.workflow().map_or(0, |w| w.steps.len()));
    });

    store.load_workflow(create_chain_workflow());
    store.delete_step("a");
    store.delete_step("missing");
    store.undo();

    assert_eq!(*seen.borrow(), vec![4, 3, 4]);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.redo();
    assert_eq!(seen.borrow().len(), 3);
}
