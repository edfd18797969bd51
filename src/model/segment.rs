use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Colours offered when creating or recolouring a segment.
pub const SEGMENT_PRESETS: &[Color32] = &[
    Color32::from_rgb(107, 114, 128), // gray
    Color32::from_rgb(239, 68, 68),   // red
    Color32::from_rgb(245, 158, 11),  // amber
    Color32::from_rgb(16, 185, 129),  // emerald
    Color32::from_rgb(59, 130, 246),  // blue
    Color32::from_rgb(139, 92, 246),  // violet
    Color32::from_rgb(236, 72, 153),  // pink
    Color32::from_rgb(6, 182, 212),   // cyan
];

/// An audience row in the grid. `order` is the row index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "super::color")]
    pub color: Color32,
    pub order: u32,
    /// The "everyone" row. It can be renamed but never deleted.
    #[serde(default)]
    pub is_default: bool,
}

impl Segment {
    pub fn new(name: impl Into<String>, color: Color32, order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            color,
            order,
            is_default: false,
        }
    }

    pub fn everyone() -> Self {
        Self {
            is_default: true,
            ..Self::new("Everyone", SEGMENT_PRESETS[0], 0)
        }
    }

    /// Preset colour for the n-th segment.
    pub fn preset_color(n: usize) -> Color32 {
        SEGMENT_PRESETS[n % SEGMENT_PRESETS.len()]
    }
}

/// Sort by `order` and renumber so that `order` equals the row index.
pub fn normalize_order(segments: &mut [Segment]) {
    segments.sort_by_key(|s| s.order);
    for (i, segment) in segments.iter_mut().enumerate() {
        segment.order = i as u32;
    }
}
