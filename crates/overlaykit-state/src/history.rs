//! Undo/redo history over actions.
//!
//! The history keeps the applied actions themselves, not state snapshots:
//! undo runs an action's `undo`, redo runs its `execute` again. `past` is
//! the undoable stack (most recent last); `future` holds undone actions in
//! redo order (next redo first). `present` is transient bookkeeping (the
//! last action applied since the previous undo/redo) and is deliberately
//! nulled by undo instead of pointing at the new top of the stack.

use crate::action::Action;
use crate::document::Document;
use serde::{Deserialize, Serialize};

/// Default maximum number of history entries per document.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// Undo/redo stacks plus the bookkeeping slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Applied actions, oldest first, most recent last.
    pub past: Vec<Action>,
    /// Last action applied since the previous undo/redo, if any.
    pub present: Option<Action>,
    /// Undone actions, next redo first.
    pub future: Vec<Action>,
    pub max_history_size: usize,
}

impl HistoryState {
    pub fn new() -> Self {
        Self {
            past: Vec::new(),
            present: None,
            future: Vec::new(),
            max_history_size: DEFAULT_MAX_HISTORY,
        }
    }

    pub fn with_max_size(max_history_size: usize) -> Self {
        Self {
            max_history_size,
            ..Self::new()
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute an action and record it: one new `past` entry per dispatch,
/// `present` set to the action, any pending redo discarded, and the oldest
/// entries trimmed beyond the size limit.
pub fn apply_action(doc: &Document, action: Action) -> Document {
    let mut next = action.execute(doc);
    next.history.past.push(action.clone());
    next.history.present = Some(action);
    next.history.future.clear();
    let max = next.history.max_history_size;
    while next.history.past.len() > max {
        next.history.past.remove(0);
    }
    next.touch();
    next
}

/// Revert the most recent `past` action. With an empty `past` this is a
/// warning no-op.
pub fn undo(doc: &Document) -> Document {
    let mut next = doc.clone();
    let Some(action) = next.history.past.pop() else {
        tracing::warn!("undo ignored: nothing to undo");
        return next;
    };
    let mut undone = action.undo(&next);
    undone.history.future.insert(0, action);
    undone.history.present = None;
    undone.touch();
    undone
}

/// Re-apply the next `future` action. With an empty `future` this is a
/// warning no-op.
pub fn redo(doc: &Document) -> Document {
    if doc.history.future.is_empty() {
        tracing::warn!("redo ignored: nothing to redo");
        return doc.clone();
    }
    let mut next = doc.clone();
    let action = next.history.future.remove(0);
    let mut redone = action.execute(&next);
    redone.history.past.push(action.clone());
    redone.history.present = Some(action);
    redone.touch();
    redone
}

/// Fold a list of actions over a known initial document. This is the
/// deterministic-replay guarantee: the same list from the same initial
/// document always produces the same elements, selection, and z-order.
pub fn replay_actions(initial: &Document, actions: &[Action]) -> Document {
    actions
        .iter()
        .fold(initial.clone(), |acc, action| action.execute(&acc))
}
