//! Property tests: replay determinism, repair idempotence, and the
//! z-order/element agreement invariant.

use overlaykit_core::{ElementData, ElementId, OverlayElement, Placement, Position};
use overlaykit_state::{
    apply_action, ensure_state_consistency, replay_actions, undo, validate_state, Action,
    Document, Selection,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Compact description of an editing step; resolved against the live
/// document when the recorded action is constructed.
#[derive(Debug, Clone)]
enum Step {
    Add(u8),
    Remove(u8),
    Move(u8, i16, i16),
    Toggle(u8),
    BringToFront(u8),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..8).prop_map(Step::Add),
        (0u8..8).prop_map(Step::Remove),
        (0u8..8, -500i16..500, -500i16..500).prop_map(|(n, x, y)| Step::Move(n, x, y)),
        (0u8..8).prop_map(Step::Toggle),
        (0u8..8).prop_map(Step::BringToFront),
    ]
}

fn element(n: u8) -> OverlayElement {
    OverlayElement::new(
        ElementId::new(format!("el-{n}")),
        Position::new(f64::from(n), 0.0),
        ElementData::Text {
            content: format!("element {n}"),
            font_size: 12.0,
            color: "#abcdef".to_string(),
        },
    )
}

/// Turn steps into concrete recorded actions by running them against a live
/// document, skipping steps that are invalid at their point in the
/// sequence.
fn record(steps: &[Step]) -> (Document, Vec<Action>) {
    let initial = Document::new();
    let mut doc = initial.clone();
    let mut actions = Vec::new();

    for step in steps {
        let action = match step {
            Step::Add(n) => {
                let el = element(*n);
                if doc.elements.contains_key(&el.id) {
                    continue;
                }
                Some(Action::add_element(el))
            }
            Step::Remove(n) => {
                Action::remove_element(&doc, &ElementId::new(format!("el-{n}"))).ok()
            }
            Step::Move(n, x, y) => Action::transform(
                &doc,
                &ElementId::new(format!("el-{n}")),
                Placement::new(Position::new(f64::from(*x), f64::from(*y)), 0.0),
            )
            .ok(),
            Step::Toggle(n) => {
                let id = ElementId::new(format!("el-{n}"));
                doc.elements
                    .contains_key(&id)
                    .then(|| Action::select(&doc, doc.selection.toggle_selection(&id)))
            }
            Step::BringToFront(n) => {
                let id = ElementId::new(format!("el-{n}"));
                doc.elements.contains_key(&id).then(|| {
                    Action::z_order_change(
                        &doc,
                        overlaykit_state::z_order::bring_to_front(&doc.z_order, &id),
                    )
                })
            }
        };
        if let Some(action) = action {
            doc = apply_action(&doc, action.clone());
            actions.push(action);
        }
    }
    (initial, actions)
}

proptest! {
    #[test]
    fn replay_twice_is_bit_identical(steps in proptest::collection::vec(step(), 0..40)) {
        let (initial, actions) = record(&steps);
        let first = replay_actions(&initial, &actions);
        let second = replay_actions(&initial, &actions);
        prop_assert_eq!(&first.elements, &second.elements);
        prop_assert_eq!(&first.selection, &second.selection);
        prop_assert_eq!(&first.z_order, &second.z_order);
    }

    #[test]
    fn every_reachable_document_is_valid(steps in proptest::collection::vec(step(), 0..40)) {
        let (initial, actions) = record(&steps);
        let doc = replay_actions(&initial, &actions);

        let keys: BTreeSet<_> = doc.elements.keys().cloned().collect();
        let order: BTreeSet<_> = doc.z_order.iter().cloned().collect();
        prop_assert_eq!(keys, order);
        prop_assert_eq!(doc.z_order.len(), doc.elements.len());
        prop_assert!(validate_state(&doc).valid);
    }

    #[test]
    fn undo_stack_fully_unwinds(steps in proptest::collection::vec(step(), 0..25)) {
        let (_initial, actions) = record(&steps);
        // Dispatch through the history layer so every action is undoable.
        let mut doc = actions.iter().fold(Document::new(), |acc, action| {
            apply_action(&acc, action.clone())
        });

        while doc.history.can_undo() {
            doc = undo(&doc);
        }
        prop_assert!(doc.elements.is_empty());
        prop_assert!(doc.z_order.is_empty());
    }

    #[test]
    fn repair_is_idempotent_on_corrupted_documents(
        ids in proptest::collection::btree_set(0u8..12, 0..8),
        junk_order in proptest::collection::vec(0u8..16, 0..16),
        junk_selection in proptest::collection::vec(0u8..16, 0..8),
    ) {
        let mut doc = Document::new();
        for n in &ids {
            let el = element(*n);
            doc.elements.insert(el.id.clone(), el);
        }
        doc.z_order = junk_order
            .iter()
            .map(|n| ElementId::new(format!("el-{n}")))
            .collect();
        doc.selection = Selection {
            selected_ids: junk_selection
                .iter()
                .map(|n| ElementId::new(format!("el-{n}")))
                .collect(),
            last_selected_id: junk_selection
                .first()
                .map(|n| ElementId::new(format!("el-{n}"))),
        };

        let once = ensure_state_consistency(&doc);
        let twice = ensure_state_consistency(&once);
        prop_assert_eq!(&once, &twice);

        let keys: BTreeSet<_> = once.elements.keys().cloned().collect();
        let order: BTreeSet<_> = once.z_order.iter().cloned().collect();
        prop_assert_eq!(keys, order);
        prop_assert_eq!(once.z_order.len(), once.elements.len());
        for id in &once.selection.selected_ids {
            prop_assert!(once.elements.contains_key(id));
        }
    }
}
