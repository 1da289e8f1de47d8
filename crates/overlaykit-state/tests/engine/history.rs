//! Undo/redo round trips for every action kind, driven at document level.

use overlaykit_core::{
    ElementData, ElementId, EngineConfig, OverlayElement, Placement, Position,
};
use overlaykit_state::{apply_action, redo, replay_actions, undo, Action, Document};

fn clock(id: &str) -> OverlayElement {
    OverlayElement::new(
        ElementId::new(id),
        Position::new(0.0, 0.0),
        ElementData::Clock {
            use_24_hour: false,
            show_seconds: true,
            font_size: 20.0,
        },
    )
}

fn seeded(ids: &[&str]) -> Document {
    let mut doc = Document::new();
    for id in ids {
        doc = apply_action(&doc, Action::add_element(clock(id)));
    }
    doc
}

/// Apply one action, undo it, and require the touched fields to match the
/// original document.
fn assert_round_trip(doc: &Document, action: Action) {
    let applied = apply_action(doc, action);
    let reverted = undo(&applied);
    assert_eq!(reverted.elements, doc.elements);
    assert_eq!(reverted.selection, doc.selection);
    assert_eq!(reverted.z_order, doc.z_order);
}

#[test]
fn update_element_round_trips() {
    let doc = seeded(&["a"]);
    let mut after = doc.elements[&ElementId::new("a")].clone();
    after.angle = 270.0;
    after.position = Position::new(42.0, 7.0);
    let action = Action::update_element(&doc, &ElementId::new("a"), after).unwrap();
    assert_round_trip(&doc, action);
}

#[test]
fn update_element_data_round_trips() {
    let doc = seeded(&["a"]);
    let action = Action::update_element_data(
        &doc,
        &ElementId::new("a"),
        ElementData::Text {
            content: "converted".to_string(),
            font_size: 18.0,
            color: "#00ff00".to_string(),
        },
    )
    .unwrap();

    let applied = apply_action(&doc, action.clone());
    // The payload swap also retags the element kind.
    assert_eq!(
        applied.elements[&ElementId::new("a")].kind,
        overlaykit_core::ElementKind::Text
    );
    assert_round_trip(&doc, action);
}

#[test]
fn transform_round_trips() {
    let doc = seeded(&["a", "b"]);
    let action = Action::transform(
        &doc,
        &ElementId::new("b"),
        Placement::new(Position::new(-100.0, 250.0), 45.0),
    )
    .unwrap();
    assert_round_trip(&doc, action);
}

#[test]
fn z_order_change_round_trips() {
    let doc = seeded(&["a", "b", "c"]);
    let mut reversed = doc.z_order.clone();
    reversed.reverse();
    let action = Action::z_order_change(&doc, reversed);
    assert_round_trip(&doc, action);
}

#[test]
fn z_moves_round_trip() {
    let doc = seeded(&["a", "b", "c"]);
    let up = Action::move_element_z_up(&doc, &ElementId::new("b")).unwrap();
    assert_round_trip(&doc, up);
    let down = Action::move_element_z_down(&doc, &ElementId::new("b")).unwrap();
    assert_round_trip(&doc, down);
}

#[test]
fn select_round_trips() {
    let doc = seeded(&["a", "b"]);
    let action = Action::select(&doc, doc.selection.select_element(&ElementId::new("b")));
    assert_round_trip(&doc, action);
}

#[test]
fn remove_round_trips_including_selection() {
    let mut doc = seeded(&["a", "b", "c"]);
    let select = Action::select(&doc, doc.selection.select_element(&ElementId::new("b")));
    doc = apply_action(&doc, select);

    let action = Action::remove_element(&doc, &ElementId::new("b")).unwrap();
    assert_round_trip(&doc, action);
}

#[test]
fn history_bound_respects_configured_limit() {
    let mut config = EngineConfig::default();
    config.history.max_entries = 4;
    let mut doc = Document::with_config(&config);

    for i in 0..10 {
        doc = apply_action(&doc, Action::add_element(clock(&format!("e{i}"))));
    }
    assert_eq!(doc.history.past.len(), 4);

    // Four undos exhaust the bounded history.
    for _ in 0..4 {
        doc = undo(&doc);
    }
    assert!(!doc.history.can_undo());
    // The six unreachable adds remain applied.
    assert_eq!(doc.elements.len(), 6);
}

#[test]
fn interleaved_undo_redo_is_consistent() {
    let mut doc = seeded(&["a", "b", "c", "d"]);
    doc = undo(&doc);
    doc = undo(&doc);
    doc = redo(&doc);
    doc = undo(&doc);
    doc = redo(&doc);
    doc = redo(&doc);
    assert_eq!(doc.elements.len(), 4);
    assert_eq!(doc.history.past.len(), 4);
    assert!(!doc.history.can_redo());
}

#[test]
fn replay_reproduces_a_recorded_session() {
    let initial = Document::new();
    let mut live = initial.clone();
    let mut recorded = Vec::new();

    for id in ["a", "b", "c"] {
        let action = Action::add_element(clock(id));
        live = apply_action(&live, action.clone());
        recorded.push(action);
    }
    let transform = Action::transform(
        &live,
        &ElementId::new("b"),
        Placement::new(Position::new(9.0, 9.0), 180.0),
    )
    .unwrap();
    live = apply_action(&live, transform.clone());
    recorded.push(transform);

    let remove = Action::remove_element(&live, &ElementId::new("a")).unwrap();
    live = apply_action(&live, remove.clone());
    recorded.push(remove);

    let replayed = replay_actions(&initial, &recorded);
    assert_eq!(replayed.elements, live.elements);
    assert_eq!(replayed.selection, live.selection);
    assert_eq!(replayed.z_order, live.z_order);
}
