//! Transactions: batching dispatches into one atomic history entry.
//!
//! A transaction executes each added action immediately, so callers see
//! live feedback, but defers history recording. Commit replays the batch
//! as a single batch action from the captured start state: by replay
//! determinism this lands on the same document the live execution produced,
//! with exactly one new history entry. Rollback restores the captured start
//! state outright. Nesting is rejected.

use crate::action::Action;
use crate::document::Document;
use crate::element_store::ElementMap;
use crate::history::{self, HistoryState};
use crate::selection::Selection;
use overlaykit_core::ElementId;
use serde::{Deserialize, Serialize};

/// Deep snapshot of the rollback point: everything a transaction can touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub elements: ElementMap,
    pub selection: Selection,
    pub z_order: Vec<ElementId>,
    pub history: HistoryState,
}

impl TransactionSnapshot {
    fn capture(doc: &Document) -> Self {
        Self {
            elements: doc.elements.clone(),
            selection: doc.selection.clone(),
            z_order: doc.z_order.clone(),
            history: doc.history.clone(),
        }
    }
}

/// In-flight transaction state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionState {
    pub active: bool,
    pub batch: Option<Vec<Action>>,
    pub start_state: Option<Box<TransactionSnapshot>>,
}

impl TransactionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn cleared() -> Self {
        Self::default()
    }
}

/// Begin a transaction, capturing the rollback point. Starting while one is
/// already active is a warning no-op; transactions do not nest.
pub fn start_transaction(doc: &Document) -> Document {
    if doc.transactions.active {
        tracing::warn!("start_transaction ignored: transaction already active");
        return doc.clone();
    }
    let mut next = doc.clone();
    next.transactions = TransactionState {
        active: true,
        batch: Some(Vec::new()),
        start_state: Some(Box::new(TransactionSnapshot::capture(doc))),
    };
    next
}

/// Add an action to the active transaction: execute it immediately and
/// append it to the batch without touching history. Without an active
/// transaction this behaves exactly like a plain dispatch.
pub fn add_to_transaction(doc: &Document, action: Action) -> Document {
    if !doc.transactions.active {
        return history::apply_action(doc, action);
    }
    let mut next = action.execute(doc);
    next.transactions
        .batch
        .get_or_insert_with(Vec::new)
        .push(action);
    next.touch();
    next
}

/// Commit the active transaction as one history entry. An empty batch just
/// clears the transaction state; committing without an active transaction
/// is a warning no-op.
pub fn commit_transaction(doc: &Document) -> Document {
    if !doc.transactions.active {
        tracing::warn!("commit_transaction ignored: no active transaction");
        return doc.clone();
    }
    let batch = doc.transactions.batch.clone().unwrap_or_default();
    let start_state = doc.transactions.start_state.clone();

    if batch.is_empty() {
        let mut next = doc.clone();
        next.transactions = TransactionState::cleared();
        return next;
    }

    // Replay the batch from the captured start state: the result matches the
    // live document, and the whole transaction records as one undo step.
    let mut base = doc.clone();
    if let Some(start) = start_state {
        base.elements = start.elements;
        base.selection = start.selection;
        base.z_order = start.z_order;
        base.history = start.history;
    }
    base.transactions = TransactionState::cleared();

    let count = batch.len();
    let committed = history::apply_action(&base, Action::batch(batch));
    tracing::debug!(actions = count, "transaction committed");
    committed
}

/// Discard the active transaction and restore the captured start state.
/// Without an active transaction this is a warning no-op.
pub fn rollback_transaction(doc: &Document) -> Document {
    if !doc.transactions.active {
        tracing::warn!("rollback_transaction ignored: no active transaction");
        return doc.clone();
    }
    let mut next = doc.clone();
    if let Some(start) = next.transactions.start_state.take() {
        next.elements = start.elements;
        next.selection = start.selection;
        next.z_order = start.z_order;
        next.history = start.history;
    }
    next.transactions = TransactionState::cleared();
    next.touch();
    tracing::debug!("transaction rolled back");
    next
}
