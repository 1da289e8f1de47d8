//! Snapshot format: the plain, self-contained form of a document.
//!
//! Snapshots carry everything a peer needs to reconstruct the document:
//! elements as an id-keyed record, selection and z-order as string lists,
//! history and transactions with actions reduced to `{id, type, timestamp,
//! data}` records, and metadata. Analysis metadata and in-flight
//! transaction rollback state never cross the boundary.

use crate::codec::{check_portable, Codec};
use overlaykit_core::{DocMeta, ElementId, OverlayElement, SyncError};
use overlaykit_state::{
    ensure_state_consistency, Action, ActionData, Document, HistoryState, Selection,
    TransactionState,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An action reduced to its wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: i64,
    pub data: serde_json::Value,
}

impl ActionRecord {
    /// Reduce an action to its record form, dropping analysis metadata.
    fn from_action(action: &Action) -> Result<Self, SyncError> {
        let tagged = serde_json::to_value(&action.data).map_err(|e| SyncError::EncodeFailed {
            reason: format!("action {} not serializable: {e}", action.id),
        })?;
        let kind = tagged
            .get("type")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let data = tagged.get("data").cloned().unwrap_or(serde_json::Value::Null);
        Ok(Self {
            id: action.id.clone(),
            kind,
            timestamp: action.timestamp,
            data,
        })
    }

    /// Rebuild a real action from the record.
    ///
    /// # Errors
    /// Fails when the record's kind or payload is not a known action shape.
    pub fn to_action(&self) -> Result<Action, SyncError> {
        let tagged = serde_json::json!({ "type": self.kind, "data": self.data });
        let data: ActionData =
            serde_json::from_value(tagged).map_err(|e| SyncError::MalformedMessage {
                reason: format!("unknown action record {}: {e}", self.kind),
            })?;
        Ok(Action {
            id: self.id.clone(),
            timestamp: self.timestamp,
            data,
            analysis: None,
        })
    }
}

/// Selection in wire form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    pub selected_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_selected_id: Option<String>,
}

/// History in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub past: Vec<ActionRecord>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub present: Option<ActionRecord>,
    pub future: Vec<ActionRecord>,
    pub max_history_size: usize,
}

/// Transaction summary in wire form. The rollback snapshot never ships;
/// it is meaningless outside the originating instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub batch: Option<Vec<ActionRecord>>,
}

/// The plain, self-contained form of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub elements: BTreeMap<String, OverlayElement>,
    pub selection: SelectionSnapshot,
    pub z_order: Vec<String>,
    pub history: HistorySnapshot,
    pub transactions: TransactionRecord,
    pub meta: DocMeta,
}

impl Snapshot {
    /// Reduce a document to its snapshot form.
    ///
    /// # Errors
    /// Fails when an action in the history cannot be serialized.
    pub fn capture(doc: &Document) -> Result<Self, SyncError> {
        let records = |actions: &[Action]| -> Result<Vec<ActionRecord>, SyncError> {
            actions.iter().map(ActionRecord::from_action).collect()
        };

        Ok(Self {
            elements: doc
                .elements
                .iter()
                .map(|(id, el)| (id.to_string(), el.clone()))
                .collect(),
            selection: SelectionSnapshot {
                selected_ids: doc
                    .selection
                    .selected_ids
                    .iter()
                    .map(ElementId::to_string)
                    .collect(),
                last_selected_id: doc.selection.last_selected_id.as_ref().map(ElementId::to_string),
            },
            z_order: doc.z_order.iter().map(ElementId::to_string).collect(),
            history: HistorySnapshot {
                past: records(&doc.history.past)?,
                present: doc
                    .history
                    .present
                    .as_ref()
                    .map(ActionRecord::from_action)
                    .transpose()?,
                future: records(&doc.history.future)?,
                max_history_size: doc.history.max_history_size,
            },
            transactions: TransactionRecord {
                active: doc.transactions.active,
                batch: doc
                    .transactions
                    .batch
                    .as_ref()
                    .map(|batch| records(batch))
                    .transpose()?,
            },
            meta: doc.meta.clone(),
        })
    }

    /// Capture and verify portability in one step. This is the only capture
    /// path the protocol layer uses: a document that cannot round-trip
    /// through the codec must never ship.
    pub fn capture_verified<C: Codec>(doc: &Document, codec: &C) -> Result<Self, SyncError> {
        let snapshot = Self::capture(doc)?;
        check_portable(codec, &snapshot)?;
        Ok(snapshot)
    }

    /// Rebuild a document from the snapshot.
    ///
    /// Unknown action records are dropped with a warning rather than
    /// failing the whole restore; the result is repaired before returning.
    /// Transaction state always resets: a remote tab's in-flight batch has
    /// no rollback point here.
    pub fn restore(&self) -> Document {
        let actions = |records: &[ActionRecord]| -> Vec<Action> {
            records
                .iter()
                .filter_map(|record| match record.to_action() {
                    Ok(action) => Some(action),
                    Err(e) => {
                        tracing::warn!("dropping unreadable action record: {e}");
                        None
                    }
                })
                .collect()
        };

        let elements = self
            .elements
            .iter()
            .map(|(key, el)| {
                let id = ElementId::new(key.clone());
                let mut el = el.clone();
                el.id = id.clone();
                (id, el)
            })
            .collect();

        let doc = Document {
            elements,
            selection: Selection {
                selected_ids: self
                    .selection
                    .selected_ids
                    .iter()
                    .map(|s| ElementId::new(s.clone()))
                    .collect(),
                last_selected_id: self
                    .selection
                    .last_selected_id
                    .as_ref()
                    .map(|s| ElementId::new(s.clone())),
            },
            z_order: self
                .z_order
                .iter()
                .map(|s| ElementId::new(s.clone()))
                .collect(),
            history: HistoryState {
                past: actions(&self.history.past),
                present: self
                    .history
                    .present
                    .as_ref()
                    .and_then(|record| record.to_action().ok()),
                future: actions(&self.history.future),
                max_history_size: self.history.max_history_size,
            },
            transactions: TransactionState::new(),
            meta: self.meta.clone(),
        };
        ensure_state_consistency(&doc)
    }
}
