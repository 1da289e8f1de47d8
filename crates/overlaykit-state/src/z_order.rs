//! Z-order operations.
//!
//! The z-order is a plain array of element ids; the last entry renders
//! frontmost. It is the single source of truth for layering; the advisory
//! `z_index` on elements never is. All operations are pure and return a new
//! array; movers are no-ops at the boundary.

use overlaykit_core::ElementId;
use std::collections::BTreeSet;

/// Move an id to the end of the order (frontmost). No-op if absent.
pub fn bring_to_front(z_order: &[ElementId], id: &ElementId) -> Vec<ElementId> {
    let Some(index) = z_order.iter().position(|z| z == id) else {
        return z_order.to_vec();
    };
    let mut next = z_order.to_vec();
    let id = next.remove(index);
    next.push(id);
    next
}

/// Move an id to the start of the order (backmost). No-op if absent.
pub fn send_to_back(z_order: &[ElementId], id: &ElementId) -> Vec<ElementId> {
    let Some(index) = z_order.iter().position(|z| z == id) else {
        return z_order.to_vec();
    };
    let mut next = z_order.to_vec();
    let id = next.remove(index);
    next.insert(0, id);
    next
}

/// Swap an id with its front-side neighbour. No-op at the front or if absent.
pub fn move_forward(z_order: &[ElementId], id: &ElementId) -> Vec<ElementId> {
    let Some(index) = z_order.iter().position(|z| z == id) else {
        return z_order.to_vec();
    };
    if index + 1 >= z_order.len() {
        return z_order.to_vec();
    }
    let mut next = z_order.to_vec();
    next.swap(index, index + 1);
    next
}

/// Swap an id with its back-side neighbour. No-op at the back or if absent.
pub fn move_backward(z_order: &[ElementId], id: &ElementId) -> Vec<ElementId> {
    let Some(index) = z_order.iter().position(|z| z == id) else {
        return z_order.to_vec();
    };
    if index == 0 {
        return z_order.to_vec();
    }
    let mut next = z_order.to_vec();
    next.swap(index, index - 1);
    next
}

/// Move an id to an absolute index, clamped to the array bounds. No-op if
/// the id is absent.
pub fn reorder(z_order: &[ElementId], id: &ElementId, new_index: usize) -> Vec<ElementId> {
    let Some(index) = z_order.iter().position(|z| z == id) else {
        return z_order.to_vec();
    };
    let mut next = z_order.to_vec();
    let id = next.remove(index);
    let clamped = new_index.min(next.len());
    next.insert(clamped, id);
    next
}

/// Move a group of ids to the front, preserving their relative order.
/// Ids not present in the order are ignored.
pub fn bring_to_front_multi(z_order: &[ElementId], ids: &[ElementId]) -> Vec<ElementId> {
    let moved: BTreeSet<&ElementId> = ids.iter().collect();
    let mut rest: Vec<ElementId> = Vec::with_capacity(z_order.len());
    let mut front: Vec<ElementId> = Vec::new();
    for id in z_order {
        if moved.contains(id) {
            front.push(id.clone());
        } else {
            rest.push(id.clone());
        }
    }
    rest.extend(front);
    rest
}

/// Move a group of ids to the back, preserving their relative order.
/// Ids not present in the order are ignored.
pub fn send_to_back_multi(z_order: &[ElementId], ids: &[ElementId]) -> Vec<ElementId> {
    let moved: BTreeSet<&ElementId> = ids.iter().collect();
    let mut back: Vec<ElementId> = Vec::new();
    let mut rest: Vec<ElementId> = Vec::with_capacity(z_order.len());
    for id in z_order {
        if moved.contains(id) {
            back.push(id.clone());
        } else {
            rest.push(id.clone());
        }
    }
    back.extend(rest);
    back
}

/// Drop ids that are not in the valid set. Used for orphan pruning after
/// deletions or imports.
pub fn filter_valid(z_order: &[ElementId], valid: &BTreeSet<ElementId>) -> Vec<ElementId> {
    z_order
        .iter()
        .filter(|id| valid.contains(*id))
        .cloned()
        .collect()
}
