use std::collections::BTreeMap;

use serde::Serialize;

use super::ParticipantIdx;
use crate::error::{Result, TallyError};

/// A participant's result for one day, in seconds; `None` means no submission
pub type TimeReading = Option<u32>;

/// Day-keyed readings as observed in the transcript, possibly with gaps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseDays {
    days: BTreeMap<u32, BTreeMap<ParticipantIdx, u32>>,
}

impl SparseDays {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a day as seen without recording a reading
    pub fn touch(&mut self, day: u32) {
        self.days.entry(day).or_default();
    }

    /// Record a reading, overwriting any earlier one for the same cell
    pub fn record(&mut self, day: u32, participant: ParticipantIdx, seconds: u32) {
        self.days.entry(day).or_default().insert(participant, seconds);
    }

    /// Readings recorded for a day, if the day was seen at all
    pub fn get(&self, day: u32) -> Option<&BTreeMap<ParticipantIdx, u32>> {
        self.days.get(&day)
    }

    /// Smallest and largest observed day
    pub fn day_range(&self) -> Option<(u32, u32)> {
        let first = self.days.keys().next()?;
        let last = self.days.keys().next_back()?;
        Some((*first, *last))
    }

    /// Number of distinct days seen
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of participant-day cells holding a reading
    pub fn reading_count(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }
}

/// One day of the dense matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRow {
    pub day: u32,
    /// One reading per participant, in column order
    pub readings: Vec<TimeReading>,
}

impl DayRow {
    /// A row where nobody submitted
    pub fn absent(day: u32, participant_count: usize) -> Self {
        Self {
            day,
            readings: vec![None; participant_count],
        }
    }
}

/// Dense, gap-free matrix of daily readings
///
/// Rows always cover a contiguous ascending run of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayMatrix {
    participants: Vec<String>,
    rows: Vec<DayRow>,
}

impl DayMatrix {
    /// A matrix with participant columns and no days
    pub fn empty(participants: Vec<String>) -> Self {
        Self {
            participants,
            rows: vec![],
        }
    }

    /// Build a matrix from rows, checking the dense layout
    pub fn from_rows(participants: Vec<String>, rows: Vec<DayRow>) -> Result<Self> {
        for row in &rows {
            if row.readings.len() != participants.len() {
                return Err(TallyError::MalformedMatrix(format!(
                    "day {} has {} readings, expected {}",
                    row.day,
                    row.readings.len(),
                    participants.len()
                )));
            }
        }

        for pair in rows.windows(2) {
            if pair[0].day.checked_add(1) != Some(pair[1].day) {
                return Err(TallyError::MalformedMatrix(format!(
                    "day {} is followed by day {}, expected consecutive days",
                    pair[0].day, pair[1].day
                )));
            }
        }

        Ok(Self { participants, rows })
    }

    /// Rows already known to be contiguous and `participants.len()` wide
    pub(crate) fn from_contiguous(participants: Vec<String>, rows: Vec<DayRow>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].day + 1 == w[1].day));
        Self { participants, rows }
    }

    /// Participant names in column order
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn rows(&self) -> &[DayRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of day rows
    pub fn day_count(&self) -> usize {
        self.rows.len()
    }

    pub fn first_day(&self) -> Option<u32> {
        self.rows.first().map(|r| r.day)
    }

    pub fn last_day(&self) -> Option<u32> {
        self.rows.last().map(|r| r.day)
    }

    /// (day, reading) pairs for one participant, in day order
    pub fn column(
        &self,
        participant: ParticipantIdx,
    ) -> impl Iterator<Item = (u32, TimeReading)> + '_ {
        self.rows
            .iter()
            .map(move |row| (row.day, row.readings.get(participant).copied().flatten()))
    }

    /// Look up one cell
    pub fn reading(&self, day: u32, participant: ParticipantIdx) -> TimeReading {
        let first = self.first_day()?;
        let offset = day.checked_sub(first)? as usize;
        self.rows.get(offset)?.readings.get(participant).copied().flatten()
    }
}
