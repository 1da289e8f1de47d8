//! Sync session: one instance's participation in cross-tab sync.
//!
//! The session owns the tab identity, the transport, and the reentrancy
//! guard. Applying an incoming state opens a short suppression window
//! during which local rebroadcasts are swallowed, so two tabs replacing
//! each other's state cannot bounce updates back and forth forever.
//!
//! The engine stays synchronous: the host event loop calls [`SyncSession::pump`]
//! whenever the transport may have pending messages, and each call performs
//! plain merge-and-replace work before returning.

use crate::codec::{Codec, JsonCodec};
use crate::merge::merge_states;
use crate::protocol::{SyncMessage, SyncMessageKind, PROTOCOL_VERSION};
use crate::snapshot::Snapshot;
use crate::transport::SyncTransport;
use overlaykit_core::{EngineConfig, SyncError};
use overlaykit_state::StateManager;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// One instance's sync endpoint.
pub struct SyncSession<C: Codec = JsonCodec> {
    tab_id: String,
    version: u32,
    transport: Box<dyn SyncTransport>,
    codec: C,
    suppression_window: Duration,
    suppress_until: Option<Instant>,
}

impl SyncSession<JsonCodec> {
    /// Create a session with a random tab id and the JSON codec.
    pub fn new(transport: Box<dyn SyncTransport>) -> Self {
        Self::with_codec(transport, JsonCodec)
    }
}

impl<C: Codec> SyncSession<C> {
    /// Create a session targeting a specific codec.
    pub fn with_codec(transport: Box<dyn SyncTransport>, codec: C) -> Self {
        Self {
            tab_id: Uuid::new_v4().to_string(),
            version: PROTOCOL_VERSION,
            transport,
            codec,
            suppression_window: Duration::from_millis(
                overlaykit_core::config::DEFAULT_ECHO_SUPPRESSION_MS,
            ),
            suppress_until: None,
        }
    }

    /// Create a session using configured protocol version and suppression
    /// window.
    pub fn with_config(config: &EngineConfig, transport: Box<dyn SyncTransport>, codec: C) -> Self {
        Self {
            tab_id: Uuid::new_v4().to_string(),
            version: config.sync.protocol_version,
            transport,
            codec,
            suppression_window: Duration::from_millis(config.sync.echo_suppression_ms),
            suppress_until: None,
        }
    }

    /// This instance's opaque identity on the wire.
    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    fn suppressed(&self) -> bool {
        self.suppress_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn begin_suppression(&mut self) {
        self.suppress_until = Some(Instant::now() + self.suppression_window);
    }

    /// Push the current document to peers as a state update.
    ///
    /// Returns `false` when the send was swallowed by the echo guard.
    ///
    /// # Errors
    /// Fails hard when the document cannot pass the portability check:
    /// a non-portable state must never ship.
    pub fn broadcast_update(&mut self, manager: &StateManager) -> Result<bool, SyncError> {
        if self.suppressed() {
            tracing::debug!("broadcast suppressed: echo guard active");
            return Ok(false);
        }
        let snapshot = Snapshot::capture_verified(manager.document(), &self.codec)?;
        let message = SyncMessage::state_update(&self.tab_id, snapshot);
        self.transport.send(&message.encode(&self.codec)?)?;
        Ok(true)
    }

    /// Ask peers for their current state.
    pub fn request_sync(&mut self) -> Result<(), SyncError> {
        let message = SyncMessage::sync_request(&self.tab_id);
        self.transport.send(&message.encode(&self.codec)?)?;
        Ok(())
    }

    /// Drain pending messages and apply them to the manager.
    ///
    /// Returns the number of messages acted upon. Malformed payloads,
    /// self-origin echoes, and version mismatches are dropped silently
    /// (logged); incoming states are merged and replace the document when
    /// the merge says so.
    ///
    /// # Errors
    /// Fails hard only when answering a sync request requires shipping a
    /// non-portable local state.
    pub fn pump(&mut self, manager: &mut StateManager) -> Result<usize, SyncError> {
        let mut handled = 0;
        while let Some(payload) = self.transport.try_recv()? {
            let message = match SyncMessage::decode(&self.codec, &payload) {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("dropping malformed sync message: {e}");
                    continue;
                }
            };
            if !message.should_accept(&self.tab_id, self.version) {
                continue;
            }

            match message.kind {
                SyncMessageKind::StateUpdate | SyncMessageKind::StateSyncResponse => {
                    let Some(state) = &message.state else {
                        tracing::warn!(kind = %message.kind, "dropping state message without state");
                        continue;
                    };
                    let incoming = state.restore();
                    let merged = merge_states(manager.document(), &incoming, message.timestamp);
                    if &merged != manager.document() {
                        manager.replace_state(merged);
                        self.begin_suppression();
                    }
                    handled += 1;
                }
                SyncMessageKind::StateSyncRequest => {
                    let snapshot = Snapshot::capture_verified(manager.document(), &self.codec)?;
                    let response = SyncMessage::sync_response(&self.tab_id, snapshot);
                    self.transport.send(&response.encode(&self.codec)?)?;
                    handled += 1;
                }
            }
        }
        Ok(handled)
    }
}

impl<C: Codec> std::fmt::Debug for SyncSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSession")
            .field("tab_id", &self.tab_id)
            .field("version", &self.version)
            .finish()
    }
}
