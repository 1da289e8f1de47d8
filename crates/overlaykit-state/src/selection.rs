//! Selection state and operations.
//!
//! The selection is an ordered set: membership is unique, but insertion
//! order is preserved because the anchor fallback after a removal is
//! defined by it. All operations are pure; they return a new `Selection`.
//!
//! # Selection Model
//!
//! - `selected_ids` holds every selected element, oldest selection first
//! - `last_selected_id` is the anchor: the most recently *targeted* id,
//!   used as the range start for shift-selection
//! - Removing the anchor falls back to the last remaining id in insertion
//!   order, which is not necessarily the most recently selected one if ids
//!   were re-added

use overlaykit_core::ElementId;
use serde::{Deserialize, Serialize};

/// Keyboard modifiers relevant to selection handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl SelectionModifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
    };
    pub const CTRL_SHIFT: Self = Self {
        ctrl: true,
        shift: true,
    };
}

/// The set of selected element ids plus the anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_ids: Vec<ElementId>,
    pub last_selected_id: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected_ids.len()
    }

    /// Replace the selection with a single element.
    pub fn select_element(&self, id: &ElementId) -> Selection {
        Selection {
            selected_ids: vec![id.clone()],
            last_selected_id: Some(id.clone()),
        }
    }

    /// Add an element to the selection. Re-adding an already selected id
    /// only moves the anchor.
    pub fn add_to_selection(&self, id: &ElementId) -> Selection {
        let mut selected_ids = self.selected_ids.clone();
        if !self.contains(id) {
            selected_ids.push(id.clone());
        }
        Selection {
            selected_ids,
            last_selected_id: Some(id.clone()),
        }
    }

    /// Remove an element from the selection. If the anchor was removed it
    /// falls back to the last remaining id in insertion order.
    pub fn remove_from_selection(&self, id: &ElementId) -> Selection {
        let selected_ids: Vec<ElementId> = self
            .selected_ids
            .iter()
            .filter(|s| *s != id)
            .cloned()
            .collect();
        let last_selected_id = if self.last_selected_id.as_ref() == Some(id) {
            selected_ids.last().cloned()
        } else {
            self.last_selected_id.clone()
        };
        Selection {
            selected_ids,
            last_selected_id,
        }
    }

    /// Toggle membership of an element.
    pub fn toggle_selection(&self, id: &ElementId) -> Selection {
        if self.contains(id) {
            self.remove_from_selection(id)
        } else {
            self.add_to_selection(id)
        }
    }

    /// Select the inclusive span between `anchor` and `target`, resolved
    /// through z-order indices, adding it to the current selection.
    ///
    /// If either end is absent from the z-order this degrades to a plain
    /// single-element selection of the target.
    pub fn select_range(
        &self,
        anchor: &ElementId,
        target: &ElementId,
        z_order: &[ElementId],
    ) -> Selection {
        let Some(span) = range_span(anchor, target, z_order) else {
            return self.select_element(target);
        };
        let mut next = self.clone();
        for id in span {
            if !next.contains(&id) {
                next.selected_ids.push(id);
            }
        }
        next.last_selected_id = Some(target.clone());
        next
    }

    /// Single dispatcher for pointer selection:
    ///
    /// - no modifier: replace the selection with the target
    /// - ctrl: toggle the target
    /// - shift: range-add from the anchor to the target
    /// - ctrl+shift: range-toggle: if the whole span is already selected,
    ///   deselect it, otherwise select it
    pub fn handle_selection(
        &self,
        id: &ElementId,
        modifiers: SelectionModifiers,
        z_order: &[ElementId],
    ) -> Selection {
        match (modifiers.ctrl, modifiers.shift) {
            (false, false) => self.select_element(id),
            (true, false) => self.toggle_selection(id),
            (false, true) => match &self.last_selected_id {
                Some(anchor) => self.select_range(&anchor.clone(), id, z_order),
                None => self.select_element(id),
            },
            (true, true) => match &self.last_selected_id {
                Some(anchor) => self.toggle_range(&anchor.clone(), id, z_order),
                None => self.toggle_selection(id),
            },
        }
    }

    /// Range-toggle: deselect the whole span when every id in it is already
    /// selected, otherwise select the span.
    fn toggle_range(
        &self,
        anchor: &ElementId,
        target: &ElementId,
        z_order: &[ElementId],
    ) -> Selection {
        let Some(span) = range_span(anchor, target, z_order) else {
            return self.toggle_selection(target);
        };
        let all_selected = span.iter().all(|id| self.contains(id));
        if all_selected {
            let mut next = self.clone();
            for id in &span {
                next = next.remove_from_selection(id);
            }
            next
        } else {
            self.select_range(anchor, target, z_order)
        }
    }

    /// Drop ids that are not in `valid`, applying the anchor fallback when
    /// the anchor itself is dropped.
    pub fn retain_valid(&self, valid: impl Fn(&ElementId) -> bool) -> Selection {
        let selected_ids: Vec<ElementId> = self
            .selected_ids
            .iter()
            .filter(|id| valid(id))
            .cloned()
            .collect();
        let last_selected_id = match &self.last_selected_id {
            Some(last) if valid(last) => Some(last.clone()),
            Some(_) => selected_ids.last().cloned(),
            None => None,
        };
        Selection {
            selected_ids,
            last_selected_id,
        }
    }
}

/// The inclusive slice of the z-order between two ids, in z-order direction.
/// `None` when either end is missing.
fn range_span(a: &ElementId, b: &ElementId, z_order: &[ElementId]) -> Option<Vec<ElementId>> {
    let ia = z_order.iter().position(|id| id == a)?;
    let ib = z_order.iter().position(|id| id == b)?;
    let (lo, hi) = if ia <= ib { (ia, ib) } else { (ib, ia) };
    Some(z_order[lo..=hi].to_vec())
}
