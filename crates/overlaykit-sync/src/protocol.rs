//! Sync message protocol.
//!
//! Tabs exchange a small envelope: protocol version, message kind, send
//! timestamp, originating tab id, and optionally a snapshot. Delivery is
//! at-most-once and unordered; the receiver drops anything it cannot trust
//! (its own echoes, other protocol versions, malformed payloads) with no
//! migration or redelivery.

use crate::codec::Codec;
use crate::snapshot::Snapshot;
use overlaykit_core::SyncError;
use serde::{Deserialize, Serialize};

/// Protocol version spoken by this build. A mismatch drops the message.
pub const PROTOCOL_VERSION: u32 = 1;

/// Message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMessageKind {
    /// Push of a changed state.
    StateUpdate,
    /// Ask peers for their current state.
    StateSyncRequest,
    /// Answer to a sync request.
    StateSyncResponse,
}

impl SyncMessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateUpdate => "state-update",
            Self::StateSyncRequest => "state-sync-request",
            Self::StateSyncResponse => "state-sync-response",
        }
    }
}

impl std::fmt::Display for SyncMessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncMessage {
    pub version: u32,
    #[serde(rename = "type")]
    pub kind: SyncMessageKind,
    /// Send time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub tab_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub state: Option<Snapshot>,
}

impl SyncMessage {
    fn envelope(kind: SyncMessageKind, tab_id: &str, state: Option<Snapshot>) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            kind,
            timestamp: chrono::Utc::now().timestamp_millis(),
            tab_id: tab_id.to_string(),
            state,
        }
    }

    /// Build a state push.
    pub fn state_update(tab_id: &str, state: Snapshot) -> Self {
        Self::envelope(SyncMessageKind::StateUpdate, tab_id, Some(state))
    }

    /// Build a state request.
    pub fn sync_request(tab_id: &str) -> Self {
        Self::envelope(SyncMessageKind::StateSyncRequest, tab_id, None)
    }

    /// Build a state response.
    pub fn sync_response(tab_id: &str, state: Snapshot) -> Self {
        Self::envelope(SyncMessageKind::StateSyncResponse, tab_id, Some(state))
    }

    /// Encode for the wire.
    pub fn encode<C: Codec>(&self, codec: &C) -> Result<Vec<u8>, SyncError> {
        codec.encode(self)
    }

    /// Decode from the wire.
    pub fn decode<C: Codec>(codec: &C, bytes: &[u8]) -> Result<Self, SyncError> {
        codec.decode(bytes)
    }

    /// Whether a receiver with the given identity should process this
    /// message. Self-origin and version-mismatched messages are dropped.
    pub fn should_accept(&self, own_tab_id: &str, expected_version: u32) -> bool {
        if self.tab_id == own_tab_id {
            tracing::debug!(tab_id = %self.tab_id, "ignoring own message");
            return false;
        }
        if self.version != expected_version {
            tracing::warn!(
                got = self.version,
                expected = expected_version,
                "dropping message with mismatched protocol version"
            );
            return false;
        }
        true
    }
}
