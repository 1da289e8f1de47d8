//! # OverlayKit Sync
//!
//! Cross-tab synchronization for the overlay state engine. Documents are
//! reduced to plain snapshots, verified against a codec-generic
//! portability check, and exchanged through an abstract transport. A
//! conflict-resolving merge decides what an incoming state does to the
//! local document, and a session object ties identity, transport, and echo
//! suppression together.

pub mod codec;
pub mod merge;
pub mod protocol;
pub mod session;
pub mod snapshot;
pub mod transport;

pub use codec::{check_portable, Codec, JsonCodec};
pub use merge::{
    documents_structurally_equal, elements_structurally_equal, merge_states, selection_equal,
};
pub use protocol::{SyncMessage, SyncMessageKind, PROTOCOL_VERSION};
pub use session::SyncSession;
pub use snapshot::{ActionRecord, HistorySnapshot, SelectionSnapshot, Snapshot, TransactionRecord};
pub use transport::{LocalHub, LocalTransport, NoOpTransport, SyncTransport};
