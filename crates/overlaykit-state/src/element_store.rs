//! Pure transforms over the element collection.
//!
//! Every function takes the current collection by reference and returns a
//! new one; the input is never mutated. Structural anomalies (id collisions,
//! missing targets) are soft failures: logged as warnings, the operation
//! becomes a no-op and the collection stays valid.
//!
//! The collection is a `BTreeMap` so iteration order is deterministic,
//! which the replay guarantee depends on.

use overlaykit_core::{ElementId, OverlayElement};
use std::collections::BTreeMap;

/// The element collection: id-keyed, unique keys.
pub type ElementMap = BTreeMap<ElementId, OverlayElement>;

/// Insert an element. No-op with a warning if the id is already taken.
pub fn add(elements: &ElementMap, element: OverlayElement) -> ElementMap {
    if elements.contains_key(&element.id) {
        tracing::warn!(id = %element.id, "add ignored: element id already exists");
        return elements.clone();
    }
    let mut next = elements.clone();
    next.insert(element.id.clone(), element);
    next
}

/// Apply `f` to the element with the given id. No-op with a warning if the
/// element is missing.
pub fn update(
    elements: &ElementMap,
    id: &ElementId,
    f: impl FnOnce(&OverlayElement) -> OverlayElement,
) -> ElementMap {
    let Some(current) = elements.get(id) else {
        tracing::warn!(id = %id, "update ignored: element not found");
        return elements.clone();
    };
    let mut updated = f(current);
    // The id is the map key; a transform must not detach the element from it.
    updated.id = id.clone();
    let mut next = elements.clone();
    next.insert(id.clone(), updated);
    next
}

/// Remove an element. No-op with a warning if the element is missing.
pub fn remove(elements: &ElementMap, id: &ElementId) -> ElementMap {
    if !elements.contains_key(id) {
        tracing::warn!(id = %id, "remove ignored: element not found");
        return elements.clone();
    }
    let mut next = elements.clone();
    next.remove(id);
    next
}

/// Build a collection from an element array. On duplicate ids the first
/// occurrence wins; later ones are dropped with a warning.
pub fn from_array(items: Vec<OverlayElement>) -> ElementMap {
    let mut next = ElementMap::new();
    for element in items {
        if next.contains_key(&element.id) {
            tracing::warn!(id = %element.id, "duplicate element id dropped on bulk load");
            continue;
        }
        next.insert(element.id.clone(), element);
    }
    next
}

/// Replace the whole collection with a new element array.
///
/// Same duplicate policy as [`from_array`]; the previous collection is
/// discarded entirely.
pub fn replace_many(_elements: &ElementMap, items: Vec<OverlayElement>) -> ElementMap {
    from_array(items)
}
