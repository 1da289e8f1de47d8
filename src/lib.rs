//! # OverlayKit
//!
//! A runtime state engine for on-screen overlay editors: metrics, text,
//! clocks, dates, and dividers placed on a device display.
//!
//! ## Architecture
//!
//! OverlayKit is organized as a workspace with multiple crates:
//!
//! 1. **overlaykit-core** - Element model, errors, configuration, change
//!    notification
//! 2. **overlaykit-state** - Document engine: actions, history,
//!    transactions, validation, state manager
//! 3. **overlaykit-sync** - Snapshots, portability checking, sync protocol,
//!    conflict-resolving merge
//! 4. **overlaykit** - Facade crate that re-exports the engine surface
//!
//! ## Features
//!
//! - **Replay-safe document model**: every mutation is a reversible action
//!   over an immutable state tree
//! - **Undo/redo**: bounded action history with deterministic replay
//! - **Transactions**: live-applied batches committed as a single undo step
//! - **Structural repair**: idempotent consistency pass over element,
//!   selection, and z-order state
//! - **Cross-tab sync**: transport-agnostic message protocol with
//!   incoming-wins conflict resolution and echo suppression

pub use overlaykit_core as core;
pub use overlaykit_state as state;
pub use overlaykit_sync as sync;

pub use overlaykit_core::{
    ChangeNotifier, ConfigError, DocMeta, ElementData, ElementId, ElementKind, EngineConfig,
    Error, OverlayElement, Placement, Position, Result, StateError, SubscriptionId, SyncError,
};

pub use overlaykit_state::{
    Action, ActionAnalysis, ActionData, ActionKind, Document, DocumentEvent, HistoryState,
    Selection, SelectionModifiers, StateManager, StateManagerRegistry, TransactionState,
    ValidationError, ValidationErrorCode, ValidationReport,
};

pub use overlaykit_sync::{
    Codec, JsonCodec, LocalHub, NoOpTransport, Snapshot, SyncMessage, SyncMessageKind,
    SyncSession, SyncTransport, PROTOCOL_VERSION,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    Ok(())
}
