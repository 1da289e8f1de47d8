//! Error handling for OverlayKit
//!
//! Provides error types for all layers of the engine:
//! - State errors (document/action related)
//! - Sync errors (serialization/transport/protocol)
//! - Config errors (configuration loading and persistence)
//!
//! All error types use `thiserror` for ergonomic error handling. The split
//! mirrors the engine's failure model: soft anomalies are logged and
//! absorbed by the state layer, so everything surfaced here is a hard
//! failure the caller must handle.

use thiserror::Error;

/// State engine error type
///
/// Represents hard failures in document manipulation: requests for
/// operations that have no valid undo semantics.
#[derive(Error, Debug, Clone)]
pub enum StateError {
    /// The referenced element does not exist in the document
    #[error("Element not found: {id}")]
    ElementNotFound {
        /// The missing element id.
        id: String,
    },

    /// The referenced element is not present in the z-order
    #[error("Element {id} missing from z-order")]
    NotInZOrder {
        /// The element id absent from the z-order.
        id: String,
    },

    /// A transaction operation was issued in the wrong state
    #[error("Invalid transaction state: {reason}")]
    InvalidTransaction {
        /// Why the transaction state is invalid.
        reason: String,
    },

    /// Generic state error
    #[error("State error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Sync error type
///
/// Represents failures at the serialization and transport boundary.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A document failed the portability round-trip check
    #[error("State failed portability check ({codec}): {reason}")]
    NonPortableState {
        /// Name of the codec that rejected the state.
        codec: String,
        /// Why the round trip failed.
        reason: String,
    },

    /// An inbound message could not be decoded
    #[error("Malformed sync message: {reason}")]
    MalformedMessage {
        /// Why the message could not be decoded.
        reason: String,
    },

    /// Encoding a value for the wire failed
    #[error("Encoding failed: {reason}")]
    EncodeFailed {
        /// Why encoding failed.
        reason: String,
    },

    /// The underlying transport refused the operation
    #[error("Transport error: {reason}")]
    Transport {
        /// The transport-level failure description.
        reason: String,
    },
}

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read or written
    #[error("Config I/O error: {reason}")]
    Io {
        /// The I/O failure description.
        reason: String,
    },

    /// Configuration file contents were not valid
    #[error("Invalid config: {reason}")]
    Invalid {
        /// Why the configuration is invalid.
        reason: String,
    },
}

/// Main error type for OverlayKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// State engine error
    #[error(transparent)]
    State(#[from] StateError),

    /// Sync error
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a state error
    pub fn is_state_error(&self) -> bool {
        matches!(self, Error::State(_))
    }

    /// Check if this is a sync error
    pub fn is_sync_error(&self) -> bool {
        matches!(self, Error::Sync(_))
    }

    /// Check if this is a portability failure
    pub fn is_portability_error(&self) -> bool {
        matches!(self, Error::Sync(SyncError::NonPortableState { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
