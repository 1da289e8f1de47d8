//! Conflict-resolving merge between document instances.
//!
//! The policy is deliberate and asymmetric: when two states differ
//! structurally, the incoming one wins outright and timestamps are not
//! consulted. Last-write-wins applies only to the metadata timestamp when
//! the content is already identical. This can overwrite newer unsynced
//! local edits with an older, merely-different remote state; that tradeoff
//! is part of the protocol contract, not an accident.

use overlaykit_state::{Document, ElementMap, Selection};
use std::collections::BTreeSet;

/// Per-element structural comparison: geometry (position, angle) plus a
/// JSON comparison of the payload. The advisory `z_index` does not
/// participate; layering is judged by the z-order list alone.
pub fn elements_structurally_equal(a: &ElementMap, b: &ElementMap) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|(id, el_a)| {
        let Some(el_b) = b.get(id) else {
            return false;
        };
        el_a.position == el_b.position
            && el_a.angle == el_b.angle
            && serde_json::to_value(&el_a.data).ok() == serde_json::to_value(&el_b.data).ok()
    })
}

/// Selection comparison as sets: membership and anchor, order ignored.
pub fn selection_equal(a: &Selection, b: &Selection) -> bool {
    let set_a: BTreeSet<_> = a.selected_ids.iter().collect();
    let set_b: BTreeSet<_> = b.selected_ids.iter().collect();
    set_a == set_b && a.last_selected_id == b.last_selected_id
}

/// Full structural comparison: elements, selection, and the
/// order-sensitive z-order.
pub fn documents_structurally_equal(a: &Document, b: &Document) -> bool {
    elements_structurally_equal(&a.elements, &b.elements)
        && selection_equal(&a.selection, &b.selection)
        && a.z_order == b.z_order
}

/// Merge an incoming state into the current one.
///
/// 1. Same instance: current passes through untouched.
/// 2. All three structural fields identical: only `meta.updated_at` is
///    reconciled by timestamp.
/// 3. Structurally different: the incoming state replaces current,
///    regardless of timestamps.
/// 4. Structurally identical (but not field-identical): last-timestamp-wins
///    for `meta.updated_at` only.
pub fn merge_states(
    current: &Document,
    incoming: &Document,
    incoming_timestamp_ms: i64,
) -> Document {
    if std::ptr::eq(current, incoming) {
        return current.clone();
    }

    if current.elements == incoming.elements
        && current.selection == incoming.selection
        && current.z_order == incoming.z_order
    {
        return reconcile_timestamp(current, incoming_timestamp_ms);
    }

    if !documents_structurally_equal(current, incoming) {
        tracing::debug!("merge: structural difference, incoming state replaces current");
        return incoming.clone();
    }

    reconcile_timestamp(current, incoming_timestamp_ms)
}

/// Keep the current content; move `meta.updated_at` forward if the incoming
/// timestamp is newer.
fn reconcile_timestamp(current: &Document, incoming_timestamp_ms: i64) -> Document {
    let mut next = current.clone();
    if incoming_timestamp_ms > next.meta.updated_at.timestamp_millis() {
        if let Some(ts) = chrono::DateTime::from_timestamp_millis(incoming_timestamp_ms) {
            next.meta.updated_at = ts;
        }
    }
    next
}
