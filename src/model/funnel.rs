use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Connection, Delivery, Period, Segment};

/// A funnel document: segments, scheduled deliveries, arrows and the
/// display window of the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Funnel {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// First day of the highlighted sale window.
    pub base_date: NaiveDate,
    /// Length of the highlighted window in days (1 = just `base_date`).
    pub base_date_days: u32,
    pub base_date_label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub segments: Vec<Segment>,
    pub deliveries: Vec<Delivery>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub periods: Vec<Period>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Funnel {
    fn default() -> Self {
        Self::starting_on(chrono::Local::now().date_naive())
    }
}

impl Funnel {
    /// A fresh funnel whose display window opens on `today`: the sale window
    /// starts two weeks out and the timeline runs one week past it.
    pub fn starting_on(today: NaiveDate) -> Self {
        let base_date = today + Duration::days(14);
        Self {
            id: Uuid::new_v4(),
            name: "Untitled Funnel".to_string(),
            description: String::new(),
            base_date,
            base_date_days: 3,
            base_date_label: "Sale period".to_string(),
            start_date: today,
            end_date: base_date + Duration::days(7),
            segments: vec![Segment::everyone()],
            deliveries: Vec::new(),
            connections: Vec::new(),
            periods: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// The read-only highlighted band derived from the base date.
    pub fn base_period(&self) -> Period {
        Period {
            id: Uuid::nil(),
            name: self.base_date_label.clone(),
            start_date: self.base_date,
            end_date: super::period::band_end(self.base_date, self.base_date_days),
            color: super::period::PERIOD_PRESETS[0],
        }
    }

    /// User periods followed by the base-date band.
    pub fn display_periods(&self) -> Vec<Period> {
        let mut periods = self.periods.clone();
        periods.push(self.base_period());
        periods
    }

    pub fn segment_name(&self, id: Uuid) -> Option<&str> {
        self.segments
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_funnel_has_default_segment_and_window() {
        let funnel = Funnel::starting_on(day(2024, 1, 1));
        assert_eq!(funnel.segments.len(), 1);
        assert!(funnel.segments[0].is_default);
        assert_eq!(funnel.base_date, day(2024, 1, 15));
        assert_eq!(funnel.end_date, day(2024, 1, 22));
    }

    #[test]
    fn base_period_spans_base_days() {
        let mut funnel = Funnel::starting_on(day(2024, 1, 1));
        funnel.base_date_days = 3;
        let band = funnel.base_period();
        assert_eq!(band.start_date, day(2024, 1, 15));
        assert_eq!(band.end_date, day(2024, 1, 17));
        assert_eq!(band.days(), 3);

        funnel.base_date_days = 0;
        assert_eq!(funnel.base_period().end_date, day(2024, 1, 15));
    }

    #[test]
    fn base_period_from_corrupt_day_count_does_not_overflow() {
        let mut funnel = Funnel::starting_on(day(2024, 1, 1));
        funnel.base_date_days = 200_000_000;
        assert_eq!(funnel.base_period().end_date, NaiveDate::MAX);
        assert_eq!(funnel.display_periods().len(), 1);
    }
}
