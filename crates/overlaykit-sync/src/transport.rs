//! Transport abstraction for sync messages.
//!
//! The merge and conflict logic never touches a concrete delivery
//! mechanism; it sees opaque payload bytes through this trait. Delivery is
//! at-most-once and unordered: a transport may drop messages and no
//! acknowledgment exists.

use overlaykit_core::SyncError;
use tokio::sync::broadcast;

/// A bidirectional, best-effort message channel between instances.
pub trait SyncTransport: Send {
    /// Send a payload to every peer. Absence of peers is not an error.
    fn send(&mut self, payload: &[u8]) -> Result<(), SyncError>;

    /// Take the next pending payload, if any. Never blocks.
    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, SyncError>;
}

/// Shared hub connecting in-process transports, standing in for a browser
/// broadcast channel. Every endpoint receives every payload, including its
/// own; self-filtering happens at the protocol layer by tab id.
#[derive(Debug, Clone)]
pub struct LocalHub {
    sender: broadcast::Sender<Vec<u8>>,
}

impl LocalHub {
    /// Create a hub with the given buffered message capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a new endpoint attached to this hub.
    pub fn endpoint(&self) -> LocalTransport {
        LocalTransport {
            sender: self.sender.clone(),
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new(64)
    }
}

/// One instance's attachment to a [`LocalHub`].
pub struct LocalTransport {
    sender: broadcast::Sender<Vec<u8>>,
    receiver: broadcast::Receiver<Vec<u8>>,
}

impl SyncTransport for LocalTransport {
    fn send(&mut self, payload: &[u8]) -> Result<(), SyncError> {
        if self.sender.send(payload.to_vec()).is_err() {
            // No live receivers; at-most-once delivery permits the drop.
            tracing::debug!("sync payload dropped: no receivers");
        }
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, SyncError> {
        loop {
            match self.receiver.try_recv() {
                Ok(payload) => return Ok(Some(payload)),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "sync receiver lagged, messages dropped");
                    continue;
                }
                Err(broadcast::error::TryRecvError::Closed) => return Ok(None),
            }
        }
    }
}

impl std::fmt::Debug for LocalTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTransport").finish()
    }
}

/// A transport that goes nowhere. Useful for single-instance setups and
/// tests that exercise the engine without sync.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTransport;

impl SyncTransport for NoOpTransport {
    fn send(&mut self, _payload: &[u8]) -> Result<(), SyncError> {
        Ok(())
    }

    fn try_recv(&mut self) -> Result<Option<Vec<u8>>, SyncError> {
        Ok(None)
    }
}
