//! End-to-end scenarios through the state manager facade.

use overlaykit_core::{ElementData, ElementId, OverlayElement, Position};
use overlaykit_state::{
    validate_state, z_order, Action, Selection, SelectionModifiers, StateManager,
};

fn metric(id: &str) -> OverlayElement {
    OverlayElement::new(
        ElementId::new(id),
        Position::new(10.0, 10.0),
        ElementData::Metric {
            metric: "cpu_temp".to_string(),
            label: None,
            unit: Some("C".to_string()),
            precision: 1,
        },
    )
}

#[test]
fn insertion_order_is_z_order_and_bring_to_front_rotates() {
    let mut manager = StateManager::new();
    for id in ["E1", "E2", "E3"] {
        manager.dispatch(Action::add_element(metric(id)));
    }
    assert_eq!(
        manager.document().z_order,
        vec![
            ElementId::new("E1"),
            ElementId::new("E2"),
            ElementId::new("E3")
        ]
    );

    let fronted = z_order::bring_to_front(&manager.document().z_order, &ElementId::new("E1"));
    manager.dispatch(Action::z_order_change(manager.document(), fronted));
    assert_eq!(
        manager.document().z_order,
        vec![
            ElementId::new("E2"),
            ElementId::new("E3"),
            ElementId::new("E1")
        ]
    );
}

#[test]
fn select_then_toggle_empties_selection() {
    let selection = Selection::new().select_element(&ElementId::new("a"));
    assert_eq!(selection.selected_ids, vec![ElementId::new("a")]);
    assert_eq!(selection.last_selected_id, Some(ElementId::new("a")));

    let toggled = selection.toggle_selection(&ElementId::new("a"));
    assert!(toggled.selected_ids.is_empty());
    assert_eq!(toggled.last_selected_id, None);
}

#[test]
fn modifier_selection_flow_through_dispatch() {
    let mut manager = StateManager::new();
    for id in ["a", "b", "c", "d"] {
        manager.dispatch(Action::add_element(metric(id)));
    }

    // Plain click on "a".
    let next = manager.document().selection.handle_selection(
        &ElementId::new("a"),
        SelectionModifiers::NONE,
        &manager.document().z_order,
    );
    manager.dispatch(Action::select(manager.document(), next));

    // Shift-click on "c" selects the span a..c.
    let next = manager.document().selection.handle_selection(
        &ElementId::new("c"),
        SelectionModifiers::SHIFT,
        &manager.document().z_order,
    );
    manager.dispatch(Action::select(manager.document(), next));
    assert_eq!(
        manager.document().selection.selected_ids,
        vec![ElementId::new("a"), ElementId::new("b"), ElementId::new("c")]
    );

    // Undo restores the single selection, redo the span.
    manager.undo();
    assert_eq!(
        manager.document().selection.selected_ids,
        vec![ElementId::new("a")]
    );
    manager.redo();
    assert_eq!(manager.document().selection.len(), 3);
}

#[test]
fn removing_selected_element_updates_anchor() {
    let mut manager = StateManager::new();
    for id in ["a", "b"] {
        manager.dispatch(Action::add_element(metric(id)));
    }
    let selection = Selection::new()
        .add_to_selection(&ElementId::new("a"))
        .add_to_selection(&ElementId::new("b"));
    manager.dispatch(Action::select(manager.document(), selection));

    manager.remove_element(&ElementId::new("b")).unwrap();
    assert_eq!(
        manager.document().selection.selected_ids,
        vec![ElementId::new("a")]
    );
    assert_eq!(
        manager.document().selection.last_selected_id,
        Some(ElementId::new("a"))
    );
}

#[test]
fn import_with_orphan_z_order_repairs_without_panic() {
    let mut manager = StateManager::new();
    manager.import_elements(
        vec![metric("real")],
        Some(vec![ElementId::new("real"), ElementId::new("ghost")]),
    );

    assert_eq!(manager.document().z_order, vec![ElementId::new("real")]);
    assert!(validate_state(manager.document()).valid);
}

#[test]
fn export_emits_z_order_without_runtime_state() {
    let mut manager = StateManager::new();
    for id in ["a", "b", "c"] {
        manager.dispatch(Action::add_element(metric(id)));
    }
    let fronted = z_order::bring_to_front(&manager.document().z_order, &ElementId::new("a"));
    manager.dispatch(Action::z_order_change(manager.document(), fronted));

    let exported = manager.export_elements();
    let ids: Vec<&str> = exported.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn every_operation_keeps_the_document_valid() {
    let mut manager = StateManager::new();
    for id in ["a", "b", "c"] {
        manager.dispatch(Action::add_element(metric(id)));
        assert!(validate_state(manager.document()).valid);
    }

    manager.remove_element(&ElementId::new("b")).unwrap();
    assert!(validate_state(manager.document()).valid);

    manager.undo();
    assert!(validate_state(manager.document()).valid);

    manager.redo();
    assert!(validate_state(manager.document()).valid);

    let up = Action::move_element_z_up(manager.document(), &ElementId::new("a")).unwrap();
    manager.dispatch(up);
    assert!(validate_state(manager.document()).valid);
}
