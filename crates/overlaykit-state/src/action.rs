//! Reversible document actions.
//!
//! An action is an immutable value: an id, a timestamp, and a payload from
//! a closed tagged union. Every constructor captures both the before and
//! after data its `undo` needs, so `execute` and `undo` are pure functions
//! of the payload and the input document. Removal and z-move constructors
//! are fallible: asking for them against a missing element has no valid
//! undo semantics, so the request itself is rejected.
//!
//! Execution-time anomalies (the target vanished between construction and
//! execution, e.g. during a replay against a diverged document) are soft:
//! logged as warnings, the document passes through unchanged.

use crate::document::Document;
use crate::element_store;
use crate::selection::Selection;
use overlaykit_core::{ElementData, ElementId, OverlayElement, Placement, StateError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    AddElement,
    RemoveElement,
    UpdateElement,
    UpdateElementData,
    Transform,
    Select,
    ZOrderChange,
    MoveElementZUp,
    MoveElementZDown,
    Batch,
}

impl ActionKind {
    /// Stable wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddElement => "addElement",
            Self::RemoveElement => "removeElement",
            Self::UpdateElement => "updateElement",
            Self::UpdateElementData => "updateElementData",
            Self::Transform => "transform",
            Self::Select => "select",
            Self::ZOrderChange => "zOrderChange",
            Self::MoveElementZUp => "moveElementZUp",
            Self::MoveElementZDown => "moveElementZDown",
            Self::Batch => "batch",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional, non-authoritative analysis metadata attached to an action.
///
/// Downstream UI features (grouping labels, motion deltas, bounds hints)
/// read this; `execute` and `undo` never do. When a computation cannot
/// produce a value the field stays absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionAnalysis {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group: Option<String>,
    /// Movement delta (dx, dy) for transform-like actions.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub delta: Option<(f64, f64)>,
    /// Bounding hint `[min_x, min_y, max_x, max_y]`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bounds: Option<[f64; 4]>,
}

impl ActionAnalysis {
    /// Best-effort movement analysis for a placement change. Returns `None`
    /// when the delta is not representable (non-finite coordinates).
    pub fn for_placements(before: &Placement, after: &Placement) -> Option<Self> {
        let dx = after.position.x - before.position.x;
        let dy = after.position.y - before.position.y;
        if !dx.is_finite() || !dy.is_finite() {
            return None;
        }
        Some(Self {
            group: None,
            delta: Some((dx, dy)),
            bounds: None,
        })
    }
}

/// Action payload: one variant per action kind, capturing everything
/// `execute` and `undo` need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ActionData {
    AddElement {
        element: OverlayElement,
    },
    RemoveElement {
        element: OverlayElement,
        /// Original z-order index, so undo splices the element back exactly
        /// where it was.
        z_index: usize,
        /// Selection before removal, restored on undo.
        selection: Selection,
    },
    UpdateElement {
        id: ElementId,
        before: OverlayElement,
        after: OverlayElement,
    },
    UpdateElementData {
        id: ElementId,
        before: ElementData,
        after: ElementData,
    },
    Transform {
        id: ElementId,
        before: Placement,
        after: Placement,
    },
    Select {
        before: Selection,
        after: Selection,
    },
    ZOrderChange {
        before: Vec<ElementId>,
        after: Vec<ElementId>,
    },
    MoveElementZUp {
        id: ElementId,
        from: usize,
        to: usize,
    },
    MoveElementZDown {
        id: ElementId,
        from: usize,
        to: usize,
    },
    Batch {
        actions: Vec<Action>,
    },
}

/// An immutable, reversible unit of document mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(flatten)]
    pub data: ActionData,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub analysis: Option<ActionAnalysis>,
}

impl Action {
    fn wrap(data: ActionData) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            data,
            analysis: None,
        }
    }

    /// Attach analysis metadata.
    pub fn with_analysis(mut self, analysis: Option<ActionAnalysis>) -> Self {
        self.analysis = analysis;
        self
    }

    /// The kind of this action.
    pub fn kind(&self) -> ActionKind {
        match &self.data {
            ActionData::AddElement { .. } => ActionKind::AddElement,
            ActionData::RemoveElement { .. } => ActionKind::RemoveElement,
            ActionData::UpdateElement { .. } => ActionKind::UpdateElement,
            ActionData::UpdateElementData { .. } => ActionKind::UpdateElementData,
            ActionData::Transform { .. } => ActionKind::Transform,
            ActionData::Select { .. } => ActionKind::Select,
            ActionData::ZOrderChange { .. } => ActionKind::ZOrderChange,
            ActionData::MoveElementZUp { .. } => ActionKind::MoveElementZUp,
            ActionData::MoveElementZDown { .. } => ActionKind::MoveElementZDown,
            ActionData::Batch { .. } => ActionKind::Batch,
        }
    }

    // ---- constructors -----------------------------------------------------

    /// Insert a new element, frontmost.
    pub fn add_element(element: OverlayElement) -> Self {
        Self::wrap(ActionData::AddElement { element })
    }

    /// Remove an element, capturing it together with its z-order index and
    /// the current selection.
    ///
    /// # Errors
    /// Fails if the element is absent from the store or from the z-order:
    /// such a removal has no valid undo.
    pub fn remove_element(doc: &Document, id: &ElementId) -> Result<Self, StateError> {
        let element = doc
            .elements
            .get(id)
            .cloned()
            .ok_or_else(|| StateError::ElementNotFound { id: id.to_string() })?;
        let z_index = doc
            .z_order
            .iter()
            .position(|z| z == id)
            .ok_or_else(|| StateError::NotInZOrder { id: id.to_string() })?;
        Ok(Self::wrap(ActionData::RemoveElement {
            element,
            z_index,
            selection: doc.selection.clone(),
        }))
    }

    /// Replace an element wholesale. The replacement keeps the original id.
    ///
    /// # Errors
    /// Fails if the element does not exist.
    pub fn update_element(
        doc: &Document,
        id: &ElementId,
        mut after: OverlayElement,
    ) -> Result<Self, StateError> {
        let before = doc
            .elements
            .get(id)
            .cloned()
            .ok_or_else(|| StateError::ElementNotFound { id: id.to_string() })?;
        after.id = id.clone();
        after.kind = after.data.kind();
        Ok(Self::wrap(ActionData::UpdateElement {
            id: id.clone(),
            before,
            after,
        }))
    }

    /// Replace an element's type-specific payload.
    ///
    /// # Errors
    /// Fails if the element does not exist.
    pub fn update_element_data(
        doc: &Document,
        id: &ElementId,
        after: ElementData,
    ) -> Result<Self, StateError> {
        let before = doc
            .elements
            .get(id)
            .map(|el| el.data.clone())
            .ok_or_else(|| StateError::ElementNotFound { id: id.to_string() })?;
        Ok(Self::wrap(ActionData::UpdateElementData {
            id: id.clone(),
            before,
            after,
        }))
    }

    /// Move/rotate an element.
    ///
    /// # Errors
    /// Fails if the element does not exist.
    pub fn transform(
        doc: &Document,
        id: &ElementId,
        after: Placement,
    ) -> Result<Self, StateError> {
        let before = doc
            .elements
            .get(id)
            .map(OverlayElement::placement)
            .ok_or_else(|| StateError::ElementNotFound { id: id.to_string() })?;
        let analysis = ActionAnalysis::for_placements(&before, &after);
        Ok(Self::wrap(ActionData::Transform {
            id: id.clone(),
            before,
            after,
        })
        .with_analysis(analysis))
    }

    /// Change the selection.
    pub fn select(doc: &Document, after: Selection) -> Self {
        Self::wrap(ActionData::Select {
            before: doc.selection.clone(),
            after,
        })
    }

    /// Replace the z-order wholesale.
    pub fn z_order_change(doc: &Document, after: Vec<ElementId>) -> Self {
        Self::wrap(ActionData::ZOrderChange {
            before: doc.z_order.clone(),
            after,
        })
    }

    /// Move an element one step toward the front. At the front already this
    /// becomes a recorded no-op.
    ///
    /// # Errors
    /// Fails if the element is absent from the store or the z-order.
    pub fn move_element_z_up(doc: &Document, id: &ElementId) -> Result<Self, StateError> {
        if !doc.elements.contains_key(id) {
            return Err(StateError::ElementNotFound { id: id.to_string() });
        }
        let from = doc
            .z_order
            .iter()
            .position(|z| z == id)
            .ok_or_else(|| StateError::NotInZOrder { id: id.to_string() })?;
        let to = (from + 1).min(doc.z_order.len().saturating_sub(1));
        Ok(Self::wrap(ActionData::MoveElementZUp {
            id: id.clone(),
            from,
            to,
        }))
    }

    /// Move an element one step toward the back. At the back already this
    /// becomes a recorded no-op.
    ///
    /// # Errors
    /// Fails if the element is absent from the store or the z-order.
    pub fn move_element_z_down(doc: &Document, id: &ElementId) -> Result<Self, StateError> {
        if !doc.elements.contains_key(id) {
            return Err(StateError::ElementNotFound { id: id.to_string() });
        }
        let from = doc
            .z_order
            .iter()
            .position(|z| z == id)
            .ok_or_else(|| StateError::NotInZOrder { id: id.to_string() })?;
        let to = from.saturating_sub(1);
        Ok(Self::wrap(ActionData::MoveElementZDown {
            id: id.clone(),
            from,
            to,
        }))
    }

    /// Wrap an ordered list of actions into a single unit. Execution folds
    /// the children forward; undo folds their undos in reverse.
    pub fn batch(actions: Vec<Action>) -> Self {
        Self::wrap(ActionData::Batch { actions })
    }

    // ---- execution --------------------------------------------------------

    /// Apply this action to a document, producing the next document.
    pub fn execute(&self, doc: &Document) -> Document {
        match &self.data {
            ActionData::AddElement { element } => {
                if doc.elements.contains_key(&element.id) {
                    tracing::warn!(id = %element.id, "addElement skipped: id already present");
                    return doc.clone();
                }
                let mut next = doc.clone();
                next.elements = element_store::add(&doc.elements, element.clone());
                next.z_order.push(element.id.clone());
                next
            }
            ActionData::RemoveElement { element, .. } => {
                if !doc.elements.contains_key(&element.id) {
                    tracing::warn!(id = %element.id, "removeElement skipped: element not found");
                    return doc.clone();
                }
                let mut next = doc.clone();
                next.elements = element_store::remove(&doc.elements, &element.id);
                next.z_order.retain(|z| z != &element.id);
                next.selection = doc.selection.retain_valid(|id| id != &element.id);
                next
            }
            ActionData::UpdateElement { id, after, .. } => {
                Self::apply_element(doc, id, |_| after.clone())
            }
            ActionData::UpdateElementData { id, after, .. } => {
                Self::apply_element(doc, id, |el| {
                    let mut el = el.clone();
                    el.kind = after.kind();
                    el.data = after.clone();
                    el
                })
            }
            ActionData::Transform { id, after, .. } => Self::apply_placement(doc, id, after),
            ActionData::Select { after, .. } => {
                let mut next = doc.clone();
                next.selection = after.clone();
                next
            }
            ActionData::ZOrderChange { after, .. } => {
                let mut next = doc.clone();
                next.z_order = after.clone();
                next
            }
            ActionData::MoveElementZUp { id, from, to }
            | ActionData::MoveElementZDown { id, from, to } => {
                Self::swap_z(doc, id, *from, *to)
            }
            ActionData::Batch { actions } => actions
                .iter()
                .fold(doc.clone(), |acc, action| action.execute(&acc)),
        }
    }

    /// Revert this action, producing the previous document.
    pub fn undo(&self, doc: &Document) -> Document {
        match &self.data {
            ActionData::AddElement { element } => {
                if !doc.elements.contains_key(&element.id) {
                    tracing::warn!(id = %element.id, "undo addElement skipped: element not found");
                    return doc.clone();
                }
                let mut next = doc.clone();
                next.elements = element_store::remove(&doc.elements, &element.id);
                next.z_order.retain(|z| z != &element.id);
                next.selection = doc.selection.retain_valid(|id| id != &element.id);
                next
            }
            ActionData::RemoveElement {
                element,
                z_index,
                selection,
            } => {
                if doc.elements.contains_key(&element.id) {
                    tracing::warn!(id = %element.id, "undo removeElement skipped: id already present");
                    return doc.clone();
                }
                let mut next = doc.clone();
                next.elements = element_store::add(&doc.elements, element.clone());
                let at = (*z_index).min(next.z_order.len());
                next.z_order.insert(at, element.id.clone());
                next.selection = selection.clone();
                next
            }
            ActionData::UpdateElement { id, before, .. } => {
                Self::apply_element(doc, id, |_| before.clone())
            }
            ActionData::UpdateElementData { id, before, .. } => {
                Self::apply_element(doc, id, |el| {
                    let mut el = el.clone();
                    el.kind = before.kind();
                    el.data = before.clone();
                    el
                })
            }
            ActionData::Transform { id, before, .. } => Self::apply_placement(doc, id, before),
            ActionData::Select { before, .. } => {
                let mut next = doc.clone();
                next.selection = before.clone();
                next
            }
            ActionData::ZOrderChange { before, .. } => {
                let mut next = doc.clone();
                next.z_order = before.clone();
                next
            }
            ActionData::MoveElementZUp { id, from, to }
            | ActionData::MoveElementZDown { id, from, to } => {
                Self::swap_z(doc, id, *to, *from)
            }
            ActionData::Batch { actions } => actions
                .iter()
                .rev()
                .fold(doc.clone(), |acc, action| action.undo(&acc)),
        }
    }

    fn apply_element(
        doc: &Document,
        id: &ElementId,
        f: impl FnOnce(&OverlayElement) -> OverlayElement,
    ) -> Document {
        let mut next = doc.clone();
        next.elements = element_store::update(&doc.elements, id, f);
        next
    }

    fn apply_placement(doc: &Document, id: &ElementId, placement: &Placement) -> Document {
        Self::apply_element(doc, id, |el| {
            let mut el = el.clone();
            el.position = placement.position;
            el.angle = placement.angle;
            el
        })
    }

    /// Move the id from one captured index to the other. The captured
    /// indices are validated against the current order; on mismatch the
    /// document passes through unchanged.
    fn swap_z(doc: &Document, id: &ElementId, from: usize, to: usize) -> Document {
        if doc.z_order.get(from).is_none_or(|z| z != id) {
            tracing::warn!(id = %id, from, "z move skipped: order diverged from captured index");
            return doc.clone();
        }
        if to >= doc.z_order.len() {
            tracing::warn!(id = %id, to, "z move skipped: target index out of range");
            return doc.clone();
        }
        let mut next = doc.clone();
        let moved = next.z_order.remove(from);
        next.z_order.insert(to, moved);
        next
    }
}
