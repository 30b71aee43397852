use tracing::{debug, warn};

use crate::models::{DayMatrix, DayRow, SparseDays};

/// Day spans wider than this are almost always a mistyped day marker
pub const LARGE_SPAN_DAYS: u64 = 10_000;

/// Perform Stage 1: expand sparse readings into a gap-free day matrix
///
/// Every day between the first and last observed day gets a row. Days never
/// observed, and participants with no reading on an observed day, are absent.
pub fn fill_missing_days(days: &SparseDays, participants: &[String]) -> DayMatrix {
    let Some((min_day, max_day)) = days.day_range() else {
        return DayMatrix::empty(participants.to_vec());
    };

    let span = u64::from(max_day - min_day) + 1;
    if span > LARGE_SPAN_DAYS {
        warn!(
            "Day range {}-{} spans {} days; check the transcript for a mistyped day marker",
            min_day, max_day, span
        );
    }

    let width = participants.len();
    let mut rows = Vec::with_capacity(span as usize);
    let mut filled = 0usize;

    for day in min_day..=max_day {
        let mut row = DayRow::absent(day, width);
        match days.get(day) {
            Some(readings) => {
                for (&participant, &seconds) in readings {
                    if let Some(cell) = row.readings.get_mut(participant) {
                        *cell = Some(seconds);
                    }
                }
            }
            None => filled += 1,
        }
        rows.push(row);
    }

    debug!(
        "Filled {} missing days between day {} and day {}",
        filled, min_day, max_day
    );

    DayMatrix::from_contiguous(participants.to_vec(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["Ann".to_string(), "Ben".to_string()]
    }

    #[test]
    fn test_empty_input() {
        let matrix = fill_missing_days(&SparseDays::new(), &names());
        assert!(matrix.is_empty());
        assert_eq!(matrix.participants(), &["Ann", "Ben"]);
    }

    #[test]
    fn test_fills_gap_with_absent_row() {
        let mut days = SparseDays::new();
        days.record(1, 0, 65);
        days.record(2, 0, 130);
        days.record(4, 0, 90);

        let matrix = fill_missing_days(&days, &names());
        let day_numbers: Vec<u32> = matrix.rows().iter().map(|r| r.day).collect();

        assert_eq!(day_numbers, vec![1, 2, 3, 4]);
        assert_eq!(matrix.rows()[2].readings, vec![None, None]);
        assert_eq!(matrix.reading(1, 0), Some(65));
        assert_eq!(matrix.reading(1, 1), None);
        assert_eq!(matrix.reading(4, 0), Some(90));
    }

    #[test]
    fn test_touched_day_without_readings() {
        let mut days = SparseDays::new();
        days.touch(10);
        days.record(11, 1, 42);

        let matrix = fill_missing_days(&days, &names());

        assert_eq!(matrix.day_count(), 2);
        assert_eq!(matrix.rows()[0].readings, vec![None, None]);
        assert_eq!(matrix.rows()[1].readings, vec![None, Some(42)]);
    }

    #[test]
    fn test_wide_span_stays_dense() {
        let mut days = SparseDays::new();
        days.record(1, 0, 60);
        days.record(LARGE_SPAN_DAYS as u32 + 5, 1, 45);

        let matrix = fill_missing_days(&days, &names());

        assert_eq!(matrix.day_count(), LARGE_SPAN_DAYS as usize + 5);
        assert_eq!(matrix.reading(1, 0), Some(60));
        assert_eq!(matrix.reading(LARGE_SPAN_DAYS as u32 + 5, 1), Some(45));
        assert!(matrix.rows().windows(2).all(|w| w[0].day + 1 == w[1].day));
    }

    #[test]
    fn test_single_day() {
        let mut days = SparseDays::new();
        days.record(7, 1, 30);

        let matrix = fill_missing_days(&days, &names());
        assert_eq!(matrix.first_day(), Some(7));
        assert_eq!(matrix.last_day(), Some(7));
    }
}
