//! Transaction atomicity at the document level.

use overlaykit_core::{ElementData, ElementId, OverlayElement, Placement, Position};
use overlaykit_state::{
    add_to_transaction, apply_action, commit_transaction, rollback_transaction,
    start_transaction, undo, Action, Document,
};

fn divider(id: &str) -> OverlayElement {
    OverlayElement::new(
        ElementId::new(id),
        Position::new(0.0, 0.0),
        ElementData::Divider {
            length: 50.0,
            thickness: 1.0,
            vertical: true,
        },
    )
}

#[test]
fn three_dispatches_commit_as_one_entry() {
    let mut doc = start_transaction(&Document::new());
    for id in ["a", "b", "c"] {
        doc = add_to_transaction(&doc, Action::add_element(divider(id)));
    }
    let committed = commit_transaction(&doc);

    assert_eq!(committed.history.past.len(), 1);
    assert!(committed.history.future.is_empty());
}

#[test]
fn single_undo_reverts_all_transaction_effects() {
    let base = apply_action(&Document::new(), Action::add_element(divider("base")));

    let mut doc = start_transaction(&base);
    doc = add_to_transaction(&doc, Action::add_element(divider("x")));
    let transform = Action::transform(
        &doc,
        &ElementId::new("base"),
        Placement::new(Position::new(70.0, 70.0), 90.0),
    )
    .unwrap();
    doc = add_to_transaction(&doc, transform);
    let committed = commit_transaction(&doc);

    assert_eq!(committed.elements.len(), 2);
    assert_eq!(committed.elements[&ElementId::new("base")].angle, 90.0);

    let reverted = undo(&committed);
    assert_eq!(reverted.elements, base.elements);
    assert_eq!(reverted.z_order, base.z_order);
    assert_eq!(reverted.elements[&ElementId::new("base")].angle, 0.0);
}

#[test]
fn rollback_restores_bit_identical_state() {
    let base = apply_action(&Document::new(), Action::add_element(divider("base")));

    let mut doc = start_transaction(&base);
    doc = add_to_transaction(&doc, Action::add_element(divider("junk")));
    doc = add_to_transaction(
        &doc,
        Action::select(&doc, doc.selection.select_element(&ElementId::new("junk"))),
    );
    let rolled = rollback_transaction(&doc);

    assert_eq!(rolled.elements, base.elements);
    assert_eq!(rolled.selection, base.selection);
    assert_eq!(rolled.z_order, base.z_order);
    assert_eq!(rolled.history, base.history);
    assert_eq!(rolled.transactions, base.transactions);
}

#[test]
fn nested_start_keeps_original_rollback_point() {
    let base = apply_action(&Document::new(), Action::add_element(divider("base")));
    let mut doc = start_transaction(&base);
    doc = add_to_transaction(&doc, Action::add_element(divider("mid")));

    // Second start is refused; rollback still lands on the original state.
    doc = start_transaction(&doc);
    doc = add_to_transaction(&doc, Action::add_element(divider("late")));
    let rolled = rollback_transaction(&doc);

    assert_eq!(rolled.elements, base.elements);
}

#[test]
fn redo_after_transaction_undo_replays_whole_batch() {
    let mut doc = start_transaction(&Document::new());
    for id in ["a", "b"] {
        doc = add_to_transaction(&doc, Action::add_element(divider(id)));
    }
    let committed = commit_transaction(&doc);
    let undone = undo(&committed);
    assert!(undone.elements.is_empty());

    let redone = overlaykit_state::redo(&undone);
    assert_eq!(redone.elements.len(), 2);
    assert_eq!(redone.z_order, committed.z_order);
}

#[test]
fn empty_transaction_leaves_no_trace() {
    let base = apply_action(&Document::new(), Action::add_element(divider("base")));
    let doc = start_transaction(&base);
    let committed = commit_transaction(&doc);

    assert_eq!(committed.history.past.len(), base.history.past.len());
    assert_eq!(committed.elements, base.elements);
    assert!(!committed.transactions.active);
}
