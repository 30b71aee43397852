use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{ParticipantIdx, Roster, SparseDays};

lazy_static! {
    static ref SENDER_PATTERN: Regex = Regex::new(r"^(.*) sent the following message").unwrap();
    static ref DAY_PATTERN: Regex = Regex::new(r"Queens #([0-9]+)").unwrap();
    static ref INLINE_TIME_PATTERN: Regex =
        Regex::new(r"Queens #([0-9]+)(?: \|)?\s*([0-9]{1,2}):([0-9]{2})").unwrap();
    static ref BARE_TIME_PATTERN: Regex = Regex::new(r"^([0-9]{1,2}):([0-9]{2})").unwrap();
}

/// Parser state carried from one transcript line to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractorState {
    /// Participant whose messages are currently being read
    pub current_sender: Option<ParticipantIdx>,
    /// Day marker still waiting for a time on a later line
    pub pending_day: Option<u32>,
}

/// Which rule consumed a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// "<name> sent the following message"
    SenderAnnouncement,
    /// The line is exactly a known display name
    BareName,
    /// Day marker and time on the same line, attributed to the current sender
    DayWithTime,
    /// Day marker without a usable time
    DayOnly,
    /// Time on its own line, matched to the pending day
    BareTime,
    /// Time on its own line with no pending day or sender
    StrayTime,
    /// Nothing recognized
    Ignored,
}

/// Counters describing one extraction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub lines_scanned: usize,
    pub sender_lines: usize,
    pub name_lines: usize,
    pub inline_readings: usize,
    pub day_markers: usize,
    pub bare_readings: usize,
    pub stray_times: usize,
}

impl ExtractionSummary {
    fn count(&mut self, kind: LineKind) {
        self.lines_scanned += 1;
        match kind {
            LineKind::SenderAnnouncement => self.sender_lines += 1,
            LineKind::BareName => self.name_lines += 1,
            LineKind::DayWithTime => self.inline_readings += 1,
            LineKind::DayOnly => self.day_markers += 1,
            LineKind::BareTime => self.bare_readings += 1,
            LineKind::StrayTime => self.stray_times += 1,
            LineKind::Ignored => {}
        }
    }

    /// Readings recorded, including ones later overwritten
    pub fn readings_recorded(&self) -> usize {
        self.inline_readings + self.bare_readings
    }
}

/// Result of Stage 0 extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    /// Readings keyed by day, with gaps
    pub days: SparseDays,
    pub summary: ExtractionSummary,
}

/// Perform Stage 0: scan transcript lines into sparse day readings
///
/// Lines are handled in order and each is consumed by the first matching rule:
/// 1. Sender announcement sets the current sender
/// 2. A line equal to a known display name sets the current sender
/// 3. Day marker with an inline time records a reading for the current sender
/// 4. Any other day marker touches the day and leaves it pending
/// 5. A line starting with a time records it against the pending day
pub fn extract<I, S>(lines: I, roster: &Roster) -> ExtractionResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = ExtractorState::default();
    let mut result = ExtractionResult::default();

    for (index, line) in lines.into_iter().enumerate() {
        let kind = process_line(line.as_ref(), roster, &mut state, &mut result.days);
        if kind != LineKind::Ignored {
            debug!("line {}: {:?} -> {:?}", index + 1, kind, state);
        }
        result.summary.count(kind);
    }

    result
}

/// Apply the extraction rules to a single line
pub fn process_line(
    raw_line: &str,
    roster: &Roster,
    state: &mut ExtractorState,
    days: &mut SparseDays,
) -> LineKind {
    let line = raw_line.trim();

    if let Some(caps) = SENDER_PATTERN.captures(line) {
        if let Some(sender) = roster.resolve(caps[1].trim()) {
            state.current_sender = Some(sender);
        }
        return LineKind::SenderAnnouncement;
    }

    if let Some(sender) = roster.resolve(line) {
        state.current_sender = Some(sender);
        return LineKind::BareName;
    }

    // the first marker on the line names the day, even when the time follows a later one
    if let Some(caps) = DAY_PATTERN.captures(line) {
        let Ok(day) = caps[1].parse::<u32>() else {
            warn!("day marker out of range: {:?}", line);
            return LineKind::Ignored;
        };

        if let Some(time) = INLINE_TIME_PATTERN.captures(line) {
            match (state.current_sender, clock_seconds(&time[2], &time[3])) {
                (Some(sender), Some(seconds)) => {
                    days.record(day, sender, seconds);
                    state.pending_day = None;
                    return LineKind::DayWithTime;
                }
                (None, _) => warn!("time for day {} seen before any known sender", day),
                _ => {}
            }
        }

        days.touch(day);
        state.pending_day = Some(day);
        return LineKind::DayOnly;
    }

    if let Some(caps) = BARE_TIME_PATTERN.captures(line) {
        let seconds = clock_seconds(&caps[1], &caps[2]);
        return match (state.pending_day, state.current_sender, seconds) {
            (Some(day), Some(sender), Some(seconds)) => {
                days.record(day, sender, seconds);
                state.pending_day = None;
                LineKind::BareTime
            }
            _ => LineKind::StrayTime,
        };
    }

    LineKind::Ignored
}

/// Convert an `m:ss` clock value into total seconds
fn clock_seconds(minutes: &str, seconds: &str) -> Option<u32> {
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    Some(minutes * 60 + seconds)
}
