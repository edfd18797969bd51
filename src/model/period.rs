use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Colours offered for period bands.
pub const PERIOD_PRESETS: &[Color32] = &[
    Color32::from_rgb(254, 226, 226), // sale
    Color32::from_rgb(254, 243, 199), // preparation
    Color32::from_rgb(219, 234, 254), // education
    Color32::from_rgb(209, 250, 229), // follow-up
    Color32::from_rgb(243, 232, 255),
    Color32::from_rgb(229, 231, 235),
];

/// A named, coloured date band drawn above the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "super::color")]
    pub color: Color32,
}

impl Period {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date: end_date.max(start_date),
            color: PERIOD_PRESETS[PERIOD_PRESETS.len() - 1],
        }
    }

    /// Inclusive length in days, at least 1.
    pub fn days(&self) -> i64 {
        ((self.end_date - self.start_date).num_days() + 1).max(1)
    }
}

/// Last day of a band of `days` days starting on `start`. Saturates at the
/// end of the calendar instead of overflowing.
pub fn band_end(start: NaiveDate, days: u32) -> NaiveDate {
    let extra = u64::from(days.max(1) - 1);
    start
        .checked_add_days(chrono::Days::new(extra))
        .unwrap_or(NaiveDate::MAX)
}

