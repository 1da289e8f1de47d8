//! Overlay element model.
//!
//! Elements are the units placed on the device display: metric readouts,
//! free text, dividers, clocks, and dates. The payload is a closed tagged
//! union so every element kind carries exactly the data its renderer needs
//! and nothing else.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lower bound for element coordinates, in display units.
pub const POSITION_MIN: f64 = -10_000.0;

/// Upper bound for element coordinates, in display units.
pub const POSITION_MAX: f64 = 10_000.0;

/// Element identifier. Unique within a document, stable across tabs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Metric,
    Text,
    Divider,
    Clock,
    Date,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Text => write!(f, "text"),
            Self::Divider => write!(f, "divider"),
            Self::Clock => write!(f, "clock"),
            Self::Date => write!(f, "date"),
        }
    }
}

impl std::str::FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "text" => Ok(Self::Text),
            "divider" => Ok(Self::Divider),
            "clock" => Ok(Self::Clock),
            "date" => Ok(Self::Date),
            other => Err(format!("unknown element kind: {other}")),
        }
    }
}

/// Position on the display, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are inside the allowed range.
    pub fn in_bounds(&self) -> bool {
        (POSITION_MIN..=POSITION_MAX).contains(&self.x)
            && (POSITION_MIN..=POSITION_MAX).contains(&self.y)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Position plus rotation. The unit of movement for transform actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Position,
    /// Rotation in degrees, valid range `[0, 360)`.
    pub angle: f64,
}

impl Placement {
    pub fn new(position: Position, angle: f64) -> Self {
        Self { position, angle }
    }
}

/// Type-specific element payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementData {
    Metric {
        /// Key of the device metric to display (e.g. "cpu_temp").
        metric: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        unit: Option<String>,
        #[serde(default)]
        precision: u8,
    },
    Text {
        content: String,
        font_size: f64,
        color: String,
    },
    Divider {
        length: f64,
        thickness: f64,
        #[serde(default)]
        vertical: bool,
    },
    Clock {
        #[serde(default)]
        use_24_hour: bool,
        #[serde(default)]
        show_seconds: bool,
        font_size: f64,
    },
    Date {
        format: String,
        font_size: f64,
    },
}

impl ElementData {
    /// The element kind this payload belongs to.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Metric { .. } => ElementKind::Metric,
            Self::Text { .. } => ElementKind::Text,
            Self::Divider { .. } => ElementKind::Divider,
            Self::Clock { .. } => ElementKind::Clock,
            Self::Date { .. } => ElementKind::Date,
        }
    }
}

/// A placed overlay element.
///
/// `z_index` is advisory only: imports may carry one, but layering is always
/// decided by the document's z-order list, never by this field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayElement {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub position: Position,
    pub angle: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub z_index: Option<i32>,
    pub data: ElementData,
}

impl OverlayElement {
    /// Create an element at the given position. The kind is derived from the
    /// payload, keeping the two fields consistent by construction.
    pub fn new(id: ElementId, position: Position, data: ElementData) -> Self {
        Self {
            id,
            kind: data.kind(),
            position,
            angle: 0.0,
            z_index: None,
            data,
        }
    }

    /// Builder-style rotation setter.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    /// Builder-style advisory z-index setter.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Current placement (position + angle).
    pub fn placement(&self) -> Placement {
        Placement::new(self.position, self.angle)
    }
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMeta {
    /// Document model version.
    pub version: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Identity of the preset this document edits, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub preset_id: Option<String>,
}

/// Current document model version.
pub const DOCUMENT_VERSION: u32 = 1;

impl DocMeta {
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            version: DOCUMENT_VERSION,
            created_at: now,
            updated_at: now,
            preset_id: None,
        }
    }

    pub fn with_preset_id(mut self, preset_id: impl Into<String>) -> Self {
        self.preset_id = Some(preset_id.into());
        self
    }

    /// Advance `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

impl Default for DocMeta {
    fn default() -> Self {
        Self::new()
    }
}
