use std::path::Path;

use anyhow::Context;

use crate::model::Funnel;

pub const HEADER: [&str; 5] = ["Title", "Kind", "Start Date", "End Date", "Segments"];

/// Export the delivery schedule to a semicolon-delimited CSV file.
///
/// Columns: Title ; Kind ; Start Date ; End Date ; Segments
/// Dates are formatted as YYYY-MM-DD, segment names are joined with ", ".
/// Rows are ordered by start date. Returns the number of deliveries written.
pub fn export_csv(funnel: &Funnel, path: &Path) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    let count = write_csv(funnel, file)?;
    log::info!("exported {count} deliveries to {}", path.display());
    Ok(count)
}

pub fn write_csv<W: std::io::Write>(funnel: &Funnel, out: W) -> anyhow::Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(out);

    wtr.write_record(HEADER).context("Failed to write header")?;

    let mut deliveries: Vec<_> = funnel.deliveries.iter().collect();
    deliveries.sort_by_key(|d| (d.start_date, d.end_date));

    for delivery in &deliveries {
        let segments = delivery
            .segment_ids
            .iter()
            .filter_map(|id| funnel.segment_name(*id))
            .collect::<Vec<_>>()
            .join(", ");
        let start = delivery.start_date.format("%Y-%m-%d").to_string();
        let end = delivery.end_date.format("%Y-%m-%d").to_string();
        wtr.write_record([
            delivery.title.as_str(),
            delivery.kind.label(),
            start.as_str(),
            end.as_str(),
            segments.as_str(),
        ])
        .with_context(|| format!("Failed to write delivery '{}'", delivery.title))?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    Ok(deliveries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Delivery, DeliveryKind, Segment};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_are_sorted_and_segments_named() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut funnel = Funnel::starting_on(start);
        let buyers = Segment::new("Buyers", Segment::preset_color(1), 1);
        let everyone = funnel.segments[0].id;
        let mut late = Delivery::new("Cart; reminder", start + chrono::Duration::days(3), buyers.id);
        late.kind = DeliveryKind::Reminder;
        let mut early = Delivery::new("Welcome", start, everyone);
        early.segment_ids.push(buyers.id);
        funnel.segments.push(buyers);
        funnel.deliveries = vec![late, early];

        let mut out = Vec::new();
        assert_eq!(write_csv(&funnel, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Title;Kind;Start Date;End Date;Segments",
                "Welcome;Message;2024-05-01;2024-05-01;Everyone, Buyers",
                "\"Cart; reminder\";Reminder;2024-05-04;2024-05-04;Buyers",
            ]
        );
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.csv");
        let funnel = Funnel::starting_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(export_csv(&funnel, &path).unwrap(), 0);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Title;Kind"));
    }
}
