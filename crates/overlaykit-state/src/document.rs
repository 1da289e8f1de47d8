//! The overlay document: the single state tree every engine operation
//! reads and produces.
//!
//! Documents are immutable values from the caller's perspective: every
//! operation takes a reference and returns a new document. The import and
//! export functions implement the collaborator contracts at the engine
//! boundary: version-normalized element arrays in, z-ordered element
//! arrays out.

use crate::element_store::{self, ElementMap};
use crate::history::HistoryState;
use crate::selection::Selection;
use crate::transaction::TransactionState;
use overlaykit_core::{DocMeta, ElementId, EngineConfig, OverlayElement};

/// The complete state of one overlay document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Placed elements, keyed by id.
    pub elements: ElementMap,
    /// Selected ids plus the anchor.
    pub selection: Selection,
    /// Render order, last entry frontmost. The authoritative layering.
    pub z_order: Vec<ElementId>,
    /// Undo/redo state.
    pub history: HistoryState,
    /// In-flight transaction state.
    pub transactions: TransactionState,
    /// Version and bookkeeping timestamps.
    pub meta: DocMeta,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self {
            elements: ElementMap::new(),
            selection: Selection::new(),
            z_order: Vec::new(),
            history: HistoryState::new(),
            transactions: TransactionState::new(),
            meta: DocMeta::new(),
        }
    }

    /// Create an empty document using configured limits.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut doc = Self::new();
        doc.history.max_history_size = config.history.max_entries;
        doc
    }

    /// Build a document from a version-normalized element array and an
    /// optional canonical z-order.
    ///
    /// Duplicate element ids keep the first occurrence. The z-order is
    /// repaired: ids not present in the collection are dropped, elements
    /// missing from the given order are appended with a warning. Selection,
    /// history, and transactions always reset on import.
    pub fn import_elements(
        items: Vec<OverlayElement>,
        canonical_z_order: Option<Vec<ElementId>>,
        preset_id: Option<String>,
    ) -> Self {
        let elements = element_store::from_array(items);

        let z_order = match canonical_z_order {
            Some(order) => {
                let mut z: Vec<ElementId> = Vec::with_capacity(elements.len());
                for id in order {
                    if elements.contains_key(&id) {
                        if !z.contains(&id) {
                            z.push(id);
                        }
                    } else {
                        tracing::warn!(id = %id, "import z-order references missing element, dropped");
                    }
                }
                for id in elements.keys() {
                    if !z.contains(id) {
                        tracing::warn!(id = %id, "element missing from import z-order, appended");
                        z.push(id.clone());
                    }
                }
                z
            }
            None => elements.keys().cloned().collect(),
        };

        let mut meta = DocMeta::new();
        meta.preset_id = preset_id;

        Self {
            elements,
            selection: Selection::new(),
            z_order,
            history: HistoryState::new(),
            transactions: TransactionState::new(),
            meta,
        }
    }

    /// Emit elements in z-order, with any untracked elements appended
    /// defensively at the end. Runtime-only state (selection, history,
    /// transactions) is not part of the export.
    pub fn export_elements(&self) -> Vec<OverlayElement> {
        let mut out: Vec<OverlayElement> = Vec::with_capacity(self.elements.len());
        for id in &self.z_order {
            if let Some(element) = self.elements.get(id) {
                out.push(element.clone());
            }
        }
        for (id, element) in &self.elements {
            if !self.z_order.contains(id) {
                tracing::warn!(id = %id, "element untracked by z-order, appended to export");
                out.push(element.clone());
            }
        }
        out
    }

    /// Advance the updated-at timestamp. Called by every state-affecting
    /// operation.
    pub fn touch(&mut self) {
        self.meta.touch();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
