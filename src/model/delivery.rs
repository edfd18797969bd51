use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a scheduled delivery sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    #[default]
    Message,
    Video,
    Sale,
    Reminder,
    Branch,
}

impl DeliveryKind {
    pub fn all() -> &'static [DeliveryKind] {
        &[
            DeliveryKind::Message,
            DeliveryKind::Video,
            DeliveryKind::Sale,
            DeliveryKind::Reminder,
            DeliveryKind::Branch,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            DeliveryKind::Message => "Message",
            DeliveryKind::Video => "Video",
            DeliveryKind::Sale => "Sale",
            DeliveryKind::Reminder => "Reminder",
            DeliveryKind::Branch => "Branch",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            DeliveryKind::Message => Color32::from_rgb(59, 130, 246),
            DeliveryKind::Video => Color32::from_rgb(139, 92, 246),
            DeliveryKind::Sale => Color32::from_rgb(239, 68, 68),
            DeliveryKind::Reminder => Color32::from_rgb(245, 158, 11),
            DeliveryKind::Branch => Color32::from_rgb(16, 185, 129),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            DeliveryKind::Message => egui_phosphor::regular::CHAT_CIRCLE,
            DeliveryKind::Video => egui_phosphor::regular::VIDEO_CAMERA,
            DeliveryKind::Sale => egui_phosphor::regular::SHOPPING_CART,
            DeliveryKind::Reminder => egui_phosphor::regular::BELL,
            DeliveryKind::Branch => egui_phosphor::regular::GIT_BRANCH,
        }
    }
}

/// A scheduled delivery occupying a date range × segment range of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Never empty. The first entry is the primary segment.
    pub segment_ids: Vec<Uuid>,
    #[serde(default)]
    pub kind: DeliveryKind,
}

impl Delivery {
    pub fn new(title: impl Into<String>, date: NaiveDate, segment_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            start_date: date,
            end_date: date,
            segment_ids: vec![segment_id],
            kind: DeliveryKind::default(),
        }
    }

    pub fn primary_segment(&self) -> Option<Uuid> {
        self.segment_ids.first().copied()
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }
}
