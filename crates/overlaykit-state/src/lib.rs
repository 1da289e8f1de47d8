//! # OverlayKit State
//!
//! The document engine behind the overlay editor: an immutable, replay-safe
//! state tree with action-based undo/redo, atomic transactions, structural
//! consistency repair, and an orchestrating manager facade.
//!
//! ## Core Components
//!
//! - **Element store**: pure transforms over the id-keyed element collection
//! - **Selection**: ordered-set selection with modifier-aware dispatch
//! - **Z-order**: the authoritative layering array, last entry frontmost
//! - **Actions**: reversible, serializable units of mutation with captured
//!   before/after payloads
//! - **History**: undo/redo stacks of actions with a bounded past
//! - **Transactions**: live-applied batches committed as one history entry
//! - **Validation**: non-destructive checking plus idempotent structural
//!   repair
//! - **StateManager**: the facade owning one document per preset scope
//!
//! ## Architecture
//!
//! ```text
//! StateManager (facade, change notification)
//!   ├── Transactions (batching, rollback)
//!   │     └── History (undo/redo, bounded past)
//!   │           └── Actions (execute/undo over the document)
//!   │                 ├── Element store
//!   │                 ├── Selection
//!   │                 └── Z-order
//!   └── Validation (checking + structural repair)
//! ```

pub mod action;
pub mod document;
pub mod element_store;
pub mod history;
pub mod manager;
pub mod selection;
pub mod transaction;
pub mod validate;
pub mod z_order;

pub use action::{Action, ActionAnalysis, ActionData, ActionKind};
pub use document::Document;
pub use element_store::ElementMap;
pub use history::{apply_action, redo, replay_actions, undo, HistoryState, DEFAULT_MAX_HISTORY};
pub use manager::{DocumentEvent, StateManager, StateManagerRegistry};
pub use selection::{Selection, SelectionModifiers};
pub use transaction::{
    add_to_transaction, commit_transaction, rollback_transaction, start_transaction,
    TransactionSnapshot, TransactionState,
};
pub use validate::{
    ensure_state_consistency, validate_state, ValidationError, ValidationErrorCode,
    ValidationReport,
};
