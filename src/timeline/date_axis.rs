//! Calendar days of the display window, one per grid column.

use chrono::NaiveDate;

/// The ordered, inclusive run of calendar days shown as grid columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateAxis {
    dates: Vec<NaiveDate>,
}

impl DateAxis {
    /// Enumerate every day from `start` to `end` inclusive. The axis is empty
    /// when `end` precedes `start`.
    pub fn build(start: NaiveDate, end: NaiveDate) -> Self {
        let dates = start
            .iter_days()
            .take_while(|d| *d <= end)
            .collect::<Vec<_>>();
        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.dates.len().checked_sub(1)
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn date(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    /// Exact column of `date`, if it is on the axis.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        let first = self.first()?;
        let offset = (date - first).num_days();
        usize::try_from(offset).ok().filter(|i| *i < self.len())
    }

    /// Column of `date`, pinned to the first or last column when it falls
    /// outside the axis.
    pub fn clamp_index(&self, date: NaiveDate) -> Option<usize> {
        let first = self.first()?;
        let last = self.last_index()?;
        let offset = (date - first).num_days().clamp(0, last as i64);
        Some(offset as usize)
    }

    /// Column range covered by `start..=end`, clipped to the axis. `None` when
    /// the range lies entirely off the axis.
    pub fn index_range(&self, start: NaiveDate, end: NaiveDate) -> Option<(usize, usize)> {
        let (first, last) = (self.first()?, self.last()?);
        if end < first || start > last || end < start {
            return None;
        }
        Some((self.clamp_index(start)?, self.clamp_index(end)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inclusive_enumeration() {
        let axis = DateAxis::build(day(2024, 1, 1), day(2024, 1, 5));
        assert_eq!(axis.len(), 5);
        assert_eq!(axis.first(), Some(day(2024, 1, 1)));
        assert_eq!(axis.last(), Some(day(2024, 1, 5)));
        assert_eq!(axis.last_index(), Some(4));
    }

    #[test]
    fn single_day_and_reversed_ranges() {
        assert_eq!(DateAxis::build(day(2024, 3, 1), day(2024, 3, 1)).len(), 1);
        let empty = DateAxis::build(day(2024, 3, 2), day(2024, 3, 1));
        assert!(empty.is_empty());
        assert_eq!(empty.last_index(), None);
        assert_eq!(empty.clamp_index(day(2024, 3, 1)), None);
    }

    #[test]
    fn crosses_month_and_leap_day() {
        let axis = DateAxis::build(day(2024, 2, 27), day(2024, 3, 2));
        assert_eq!(axis.len(), 5);
        assert_eq!(axis.date(2), Some(day(2024, 2, 29)));
    }

    #[test]
    fn index_lookup_and_clamping() {
        let axis = DateAxis::build(day(2024, 1, 1), day(2024, 1, 5));
        assert_eq!(axis.index_of(day(2024, 1, 3)), Some(2));
        assert_eq!(axis.index_of(day(2023, 12, 31)), None);
        assert_eq!(axis.index_of(day(2024, 1, 6)), None);
        assert_eq!(axis.clamp_index(day(2023, 12, 1)), Some(0));
        assert_eq!(axis.clamp_index(day(2024, 2, 1)), Some(4));
    }

    #[test]
    fn index_range_clips_partial_overlap() {
        let axis = DateAxis::build(day(2024, 1, 1), day(2024, 1, 5));
        assert_eq!(axis.index_range(day(2023, 12, 30), day(2024, 1, 2)), Some((0, 1)));
        assert_eq!(axis.index_range(day(2024, 1, 4), day(2024, 1, 9)), Some((3, 4)));
        assert_eq!(axis.index_range(day(2024, 1, 6), day(2024, 1, 9)), None);
    }
}
