//! Document validation and structural repair.
//!
//! `validate_state` is a non-destructive checker producing a report against
//! a stable error-code taxonomy. `ensure_state_consistency` is the
//! destructive counterpart: an idempotent repair pass that restores the
//! cross-entity invariants (element/z-order agreement, selection validity,
//! transaction coherence) without touching per-field values. Out-of-range
//! coordinates are reported, never clamped.

use crate::document::Document;
use crate::selection::Selection;
use crate::transaction::TransactionState;
use overlaykit_core::{ElementId, POSITION_MAX, POSITION_MIN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable validation error codes. The string forms are a diagnostic
/// contract; do not rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationErrorCode {
    DuplicateElementId,
    ZOrderOrphan,
    ZOrderMissingElement,
    UnknownElementType,
    PositionOutOfRange,
    AngleOutOfRange,
    SizeOutOfRange,
    InvalidTransactionState,
    SelectionMissingElement,
    InvalidLastSelected,
}

impl ValidationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateElementId => "duplicate-element-id",
            Self::ZOrderOrphan => "zorder-orphan",
            Self::ZOrderMissingElement => "zorder-missing-element",
            Self::UnknownElementType => "unknown-element-type",
            Self::PositionOutOfRange => "position-out-of-range",
            Self::AngleOutOfRange => "angle-out-of-range",
            Self::SizeOutOfRange => "size-out-of-range",
            Self::InvalidTransactionState => "invalid-transaction-state",
            Self::SelectionMissingElement => "selection-missing-element",
            Self::InvalidLastSelected => "invalid-last-selected",
        }
    }
}

impl std::fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ValidationErrorCode,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub element_id: Option<ElementId>,
    pub message: String,
}

impl ValidationError {
    fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            element_id: None,
            message: message.into(),
        }
    }

    fn for_element(
        code: ValidationErrorCode,
        id: &ElementId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            element_id: Some(id.clone()),
            message: message.into(),
        }
    }
}

/// Validation outcome: valid iff no errors were found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Check a document against every structural and per-field rule without
/// modifying it.
pub fn validate_state(doc: &Document) -> ValidationReport {
    let mut errors = Vec::new();

    // Element/z-order agreement.
    let mut seen: BTreeSet<&ElementId> = BTreeSet::new();
    for id in &doc.z_order {
        if !seen.insert(id) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::DuplicateElementId,
                id,
                format!("id {id} appears more than once in z-order"),
            ));
        }
        if !doc.elements.contains_key(id) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::ZOrderOrphan,
                id,
                format!("z-order references missing element {id}"),
            ));
        }
    }
    for id in doc.elements.keys() {
        if !doc.z_order.contains(id) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::ZOrderMissingElement,
                id,
                format!("element {id} missing from z-order"),
            ));
        }
    }

    // Per-element field ranges. Reported only, never clamped.
    for (id, element) in &doc.elements {
        if element.kind != element.data.kind() {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::UnknownElementType,
                id,
                format!(
                    "element {id} kind {} does not match payload {}",
                    element.kind,
                    element.data.kind()
                ),
            ));
        }
        if !element.position.in_bounds() {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::PositionOutOfRange,
                id,
                format!(
                    "position ({}, {}) outside [{POSITION_MIN}, {POSITION_MAX}]",
                    element.position.x, element.position.y
                ),
            ));
        }
        if !(0.0..360.0).contains(&element.angle) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::AngleOutOfRange,
                id,
                format!("angle {} outside [0, 360)", element.angle),
            ));
        }
        if let Some((field, value)) = invalid_size(element) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::SizeOutOfRange,
                id,
                format!("{field} must be positive, got {value}"),
            ));
        }
    }

    // Transaction coherence.
    let txn = &doc.transactions;
    if txn.active != txn.batch.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorCode::InvalidTransactionState,
            "transaction active flag disagrees with batch presence",
        ));
    }
    if !txn.active && txn.start_state.is_some() {
        errors.push(ValidationError::new(
            ValidationErrorCode::InvalidTransactionState,
            "inactive transaction retains a start state",
        ));
    }

    // Selection validity.
    for id in &doc.selection.selected_ids {
        if !doc.elements.contains_key(id) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::SelectionMissingElement,
                id,
                format!("selection references missing element {id}"),
            ));
        }
    }
    if let Some(last) = &doc.selection.last_selected_id {
        if !doc.elements.contains_key(last) {
            errors.push(ValidationError::for_element(
                ValidationErrorCode::InvalidLastSelected,
                last,
                format!("last selected id {last} is not in the document"),
            ));
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Positive-size rule per element payload, if any field violates it.
fn invalid_size(element: &overlaykit_core::OverlayElement) -> Option<(&'static str, f64)> {
    use overlaykit_core::ElementData;
    match &element.data {
        ElementData::Text { font_size, .. }
        | ElementData::Clock { font_size, .. }
        | ElementData::Date { font_size, .. } => {
            (*font_size <= 0.0).then_some(("font_size", *font_size))
        }
        ElementData::Divider {
            length, thickness, ..
        } => {
            if *length <= 0.0 {
                Some(("length", *length))
            } else if *thickness <= 0.0 {
                Some(("thickness", *thickness))
            } else {
                None
            }
        }
        ElementData::Metric { .. } => None,
    }
}

/// Repair the cross-entity invariants. Idempotent, never fails: a second
/// pass over an already-repaired document changes nothing.
pub fn ensure_state_consistency(doc: &Document) -> Document {
    let mut next = doc.clone();

    // Z-order: drop orphans and duplicates (first occurrence wins), then
    // append elements the order is missing, in deterministic map order.
    let mut repaired: Vec<ElementId> = Vec::with_capacity(next.elements.len());
    for id in &next.z_order {
        if next.elements.contains_key(id) && !repaired.contains(id) {
            repaired.push(id.clone());
        } else {
            tracing::debug!(id = %id, "repair: dropped z-order entry");
        }
    }
    for id in next.elements.keys() {
        if !repaired.contains(id) {
            tracing::debug!(id = %id, "repair: appended element missing from z-order");
            repaired.push(id.clone());
        }
    }
    next.z_order = repaired;

    // Selection: drop ids pointing at nothing; the anchor falls back to the
    // last remaining selected id.
    let elements = next.elements.clone();
    let retained: Selection = next
        .selection
        .retain_valid(|id| elements.contains_key(id));
    if retained != next.selection {
        tracing::debug!("repair: pruned selection");
    }
    next.selection = retained;

    // Transactions: any incoherent combination resets to inactive.
    let txn = &next.transactions;
    let coherent = if txn.active {
        txn.batch.is_some() && txn.start_state.is_some()
    } else {
        txn.batch.is_none() && txn.start_state.is_none()
    };
    if !coherent {
        tracing::debug!("repair: cleared inconsistent transaction state");
        next.transactions = TransactionState::new();
    }

    next
}
