//! State manager: the orchestrating facade over one document.
//!
//! Owns exactly one document, routes every mutation through the action,
//! history, and transaction layers, and reports each change to subscribers
//! through a caller-owned notifier. Managers for multiple preset scopes
//! live in an explicit registry the caller owns and disposes; there is no
//! process-wide singleton cache.

use crate::action::{Action, ActionKind};
use crate::document::Document;
use crate::history;
use crate::transaction;
use crate::validate;
use overlaykit_core::{
    ChangeNotifier, ElementId, EngineConfig, OverlayElement, StateError, SubscriptionId,
};
use std::collections::HashMap;

/// What just happened to the document. Sent to every subscriber after the
/// new document is in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// An action was dispatched (directly or into a transaction).
    Dispatched { kind: ActionKind },
    Undone,
    Redone,
    TransactionStarted,
    TransactionCommitted { action_count: usize },
    TransactionRolledBack,
    /// The whole document was replaced (sync merge, reset).
    StateReplaced,
    /// Elements were imported through the collaborator contract.
    Imported { element_count: usize },
}

/// Facade over one overlay document.
pub struct StateManager {
    document: Document,
    notifier: ChangeNotifier<DocumentEvent>,
}

impl StateManager {
    /// Create a manager owning an empty document.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Create a manager with configured limits.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            document: Document::with_config(config),
            notifier: ChangeNotifier::new(),
        }
    }

    /// Adopt an existing document (repaired first).
    pub fn from_document(document: Document) -> Self {
        Self {
            document: validate::ensure_state_consistency(&document),
            notifier: ChangeNotifier::new(),
        }
    }

    /// The current document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Register a change handler.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&DocumentEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    /// Remove a change handler. Returns true if it existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Dispatch an action. Inside an active transaction the action joins
    /// the batch (still applied immediately); outside one it records as a
    /// single history entry.
    pub fn dispatch(&mut self, action: Action) {
        let kind = action.kind();
        self.document = transaction::add_to_transaction(&self.document, action);
        self.notifier.notify(&DocumentEvent::Dispatched { kind });
    }

    /// Undo the most recent history entry, if any.
    pub fn undo(&mut self) {
        self.document = history::undo(&self.document);
        self.notifier.notify(&DocumentEvent::Undone);
    }

    /// Redo the most recently undone entry, if any.
    pub fn redo(&mut self) {
        self.document = history::redo(&self.document);
        self.notifier.notify(&DocumentEvent::Redone);
    }

    pub fn can_undo(&self) -> bool {
        self.document.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.history.can_redo()
    }

    /// Begin a transaction. No-op if one is already active.
    pub fn start_transaction(&mut self) {
        self.document = transaction::start_transaction(&self.document);
        self.notifier.notify(&DocumentEvent::TransactionStarted);
    }

    /// Commit the active transaction as one history entry.
    pub fn commit_transaction(&mut self) {
        let action_count = self
            .document
            .transactions
            .batch
            .as_ref()
            .map_or(0, Vec::len);
        self.document = transaction::commit_transaction(&self.document);
        self.notifier
            .notify(&DocumentEvent::TransactionCommitted { action_count });
    }

    /// Discard the active transaction and restore the start state.
    pub fn rollback_transaction(&mut self) {
        self.document = transaction::rollback_transaction(&self.document);
        self.notifier.notify(&DocumentEvent::TransactionRolledBack);
    }

    /// Replace the document wholesale, repairing it first. Used by sync
    /// merges and resets.
    pub fn replace_state(&mut self, document: Document) {
        let mut repaired = validate::ensure_state_consistency(&document);
        repaired.touch();
        self.document = repaired;
        self.notifier.notify(&DocumentEvent::StateReplaced);
    }

    /// Import a version-normalized element array, resetting selection,
    /// history, and transactions.
    pub fn import_elements(
        &mut self,
        items: Vec<OverlayElement>,
        canonical_z_order: Option<Vec<ElementId>>,
    ) {
        let preset_id = self.document.meta.preset_id.clone();
        let imported = Document::import_elements(items, canonical_z_order, preset_id);
        let element_count = imported.elements.len();
        self.document = imported;
        self.notifier
            .notify(&DocumentEvent::Imported { element_count });
    }

    /// Export elements in z-order for the preset writer.
    pub fn export_elements(&self) -> Vec<OverlayElement> {
        self.document.export_elements()
    }

    /// Construct and dispatch a removal in one step.
    ///
    /// # Errors
    /// Fails if the element is absent from the store or z-order.
    pub fn remove_element(&mut self, id: &ElementId) -> Result<(), StateError> {
        let action = Action::remove_element(&self.document, id)?;
        self.dispatch(action);
        Ok(())
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateManager")
            .field("elements", &self.document.elements.len())
            .field("subscribers", &self.notifier.subscriber_count())
            .finish()
    }
}

/// Explicit registry of managers keyed by preset scope.
///
/// The caller owns the registry and decides when a scope's manager is
/// disposed; nothing here grows behind the caller's back.
#[derive(Debug, Default)]
pub struct StateManagerRegistry {
    managers: HashMap<String, StateManager>,
    config: EngineConfig,
}

impl StateManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            managers: HashMap::new(),
            config,
        }
    }

    /// The manager for a scope, created on first use.
    pub fn get_or_create(&mut self, scope: &str) -> &mut StateManager {
        let config = self.config.clone();
        self.managers
            .entry(scope.to_string())
            .or_insert_with(|| StateManager::with_config(&config))
    }

    /// The manager for a scope, if it exists.
    pub fn get(&self, scope: &str) -> Option<&StateManager> {
        self.managers.get(scope)
    }

    /// Drop a scope's manager. Returns true if it existed.
    pub fn dispose(&mut self, scope: &str) -> bool {
        let removed = self.managers.remove(scope).is_some();
        if removed {
            tracing::debug!(scope, "state manager disposed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Registered scope ids.
    pub fn scopes(&self) -> Vec<&str> {
        self.managers.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlaykit_core::{ElementData, Position};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn text(id: &str) -> OverlayElement {
        OverlayElement::new(
            ElementId::new(id),
            Position::new(0.0, 0.0),
            ElementData::Text {
                content: id.to_string(),
                font_size: 12.0,
                color: "#fff".to_string(),
            },
        )
    }

    #[test]
    fn dispatch_records_history_and_notifies() {
        let mut manager = StateManager::new();
        let events = Arc::new(AtomicUsize::new(0));
        let counter = events.clone();
        manager.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.dispatch(Action::add_element(text("a")));
        assert_eq!(manager.document().elements.len(), 1);
        assert!(manager.can_undo());
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut manager = StateManager::new();
        manager.dispatch(Action::add_element(text("a")));
        manager.undo();
        assert!(manager.document().elements.is_empty());
        assert!(manager.can_redo());
        manager.redo();
        assert_eq!(manager.document().elements.len(), 1);
    }

    #[test]
    fn transactional_dispatches_collapse_to_one_entry() {
        let mut manager = StateManager::new();
        manager.start_transaction();
        for id in ["a", "b", "c"] {
            manager.dispatch(Action::add_element(text(id)));
        }
        manager.commit_transaction();

        assert_eq!(manager.document().history.past.len(), 1);
        assert_eq!(manager.document().elements.len(), 3);

        manager.undo();
        assert!(manager.document().elements.is_empty());
    }

    #[test]
    fn rollback_discards_live_changes() {
        let mut manager = StateManager::new();
        manager.dispatch(Action::add_element(text("keep")));
        manager.start_transaction();
        manager.dispatch(Action::add_element(text("discard")));
        manager.rollback_transaction();

        assert_eq!(manager.document().elements.len(), 1);
        assert!(manager
            .document()
            .elements
            .contains_key(&ElementId::new("keep")));
    }

    #[test]
    fn replace_state_repairs_before_swapping() {
        let mut manager = StateManager::new();
        let mut broken = Document::import_elements(vec![text("a")], None, None);
        broken.z_order.push(ElementId::new("ghost"));

        manager.replace_state(broken);
        assert_eq!(manager.document().z_order, vec![ElementId::new("a")]);
    }

    #[test]
    fn import_resets_runtime_state() {
        let mut manager = StateManager::new();
        manager.dispatch(Action::add_element(text("old")));
        manager.dispatch(Action::select(
            manager.document(),
            manager
                .document()
                .selection
                .select_element(&ElementId::new("old")),
        ));

        manager.import_elements(vec![text("n1"), text("n2")], None);
        assert_eq!(manager.document().elements.len(), 2);
        assert!(manager.document().selection.is_empty());
        assert!(manager.document().history.past.is_empty());
        assert!(!manager.document().transactions.active);
    }

    #[test]
    fn remove_missing_element_surfaces_hard_error() {
        let mut manager = StateManager::new();
        assert!(manager.remove_element(&ElementId::new("nope")).is_err());
    }

    #[test]
    fn unsubscribed_handlers_stop_firing() {
        let mut manager = StateManager::new();
        let events = Arc::new(AtomicUsize::new(0));
        let counter = events.clone();
        let sub = manager.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        manager.dispatch(Action::add_element(text("a")));
        assert!(manager.unsubscribe(sub));
        manager.dispatch(Action::add_element(text("b")));
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_is_caller_owned_and_disposable() {
        let mut registry = StateManagerRegistry::new();
        registry
            .get_or_create("preset-1")
            .dispatch(Action::add_element(text("a")));
        registry.get_or_create("preset-2");
        assert_eq!(registry.len(), 2);

        // Same scope returns the same manager.
        assert_eq!(
            registry.get("preset-1").unwrap().document().elements.len(),
            1
        );

        assert!(registry.dispose("preset-1"));
        assert!(!registry.dispose("preset-1"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_applies_config_to_new_managers() {
        let mut config = EngineConfig::default();
        config.history.max_entries = 5;
        let mut registry = StateManagerRegistry::with_config(config);
        let manager = registry.get_or_create("scope");
        assert_eq!(manager.document().history.max_history_size, 5);
    }
}
