//! # OverlayKit Core
//!
//! Shared vocabulary for the OverlayKit engine: the overlay element model,
//! document metadata, error taxonomy, engine configuration, and the change
//! notification registry used by the state manager.

pub mod config;
pub mod element;
pub mod error;
pub mod notifier;

pub use config::{EngineConfig, HistorySettings, SyncSettings, DEFAULT_MAX_HISTORY};
pub use element::{
    DocMeta, ElementData, ElementId, ElementKind, OverlayElement, Placement, Position,
    DOCUMENT_VERSION, POSITION_MAX, POSITION_MIN,
};
pub use error::{ConfigError, Error, Result, StateError, SyncError};
pub use notifier::{ChangeNotifier, SubscriptionId};
