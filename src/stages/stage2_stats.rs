use tracing::debug;

use crate::models::{
    DayMatrix, ParticipantIdx, StatDetail, StatEntry, StatKind, StatisticsReport,
};

/// Number of consecutive days in a rolling average window
pub const ROLLING_WINDOW: usize = 5;

/// Perform Stage 2: compute the leaderboard statistics
///
/// Each statistic is computed independently. Ties always go to the participant
/// in the earlier column, so the roster order decides every tie-break. A
/// statistic with no qualifying participant is left out of the report.
pub fn compute_statistics(matrix: &DayMatrix) -> StatisticsReport {
    if matrix.is_empty() {
        return StatisticsReport::default();
    }

    let entries = [
        (StatKind::FastestTime, fastest_time(matrix)),
        (StatKind::FastestAverage, fastest_average(matrix)),
        (
            StatKind::FastestAverageOfFive,
            fastest_rolling_average(matrix, ROLLING_WINDOW),
        ),
        (StatKind::LongestStreak, longest_streak(matrix)),
    ];

    StatisticsReport::from_entries(
        entries
            .into_iter()
            .filter_map(|(kind, entry)| entry.map(|e| (kind, e))),
    )
}

/// Single fastest reading across all participants and days
pub fn fastest_time(matrix: &DayMatrix) -> Option<StatEntry> {
    let mut best: Option<(ParticipantIdx, u32, u32)> = None;

    for participant in 0..matrix.participants().len() {
        for (day, reading) in matrix.column(participant) {
            let Some(time) = reading else { continue };
            if best.is_none_or(|(_, best_time, _)| time < best_time) {
                best = Some((participant, time, day));
            }
        }
    }

    let (participant, time, day) = best?;
    Some(entry(matrix, participant, StatDetail::Time { time, day }))
}

/// Mean of one participant's submitted readings
pub fn participant_average(matrix: &DayMatrix, participant: ParticipantIdx) -> Option<f64> {
    let times: Vec<u32> = matrix.column(participant).filter_map(|(_, r)| r).collect();
    if times.is_empty() {
        return None;
    }
    let total: u64 = times.iter().map(|&t| t as u64).sum();
    Some(total as f64 / times.len() as f64)
}

/// Lowest overall mean; participants without readings cannot win
pub fn fastest_average(matrix: &DayMatrix) -> Option<StatEntry> {
    let mut best: Option<(ParticipantIdx, f64)> = None;

    for participant in 0..matrix.participants().len() {
        let Some(average) = participant_average(matrix, participant) else {
            continue;
        };
        debug!(
            "{} overall average: {:.2}s",
            matrix.participants()[participant],
            average
        );
        if best.is_none_or(|(_, best_avg)| average < best_avg) {
            best = Some((participant, average));
        }
    }

    let (participant, average) = best?;
    Some(entry(matrix, participant, StatDetail::Average { average }))
}

/// Best mean over `window` consecutive matrix rows for one participant
///
/// Windows span calendar days, so a single absent day invalidates every window
/// containing it. Returns the mean and the last day of the earliest best window.
pub fn best_window_average(
    matrix: &DayMatrix,
    participant: ParticipantIdx,
    window: usize,
) -> Option<(f64, u32)> {
    if window == 0 {
        return None;
    }

    let mut best: Option<(f64, u32)> = None;

    for rows in matrix.rows().windows(window) {
        let readings: Option<Vec<u32>> = rows
            .iter()
            .map(|row| row.readings.get(participant).copied().flatten())
            .collect();
        let Some(readings) = readings else { continue };

        let total: u64 = readings.iter().map(|&t| t as u64).sum();
        let average = total as f64 / window as f64;
        let end_day = rows[window - 1].day;

        if best.is_none_or(|(best_avg, _)| average < best_avg) {
            best = Some((average, end_day));
        }
    }

    best
}

/// Lowest rolling mean over `window` consecutive days across all participants
pub fn fastest_rolling_average(matrix: &DayMatrix, window: usize) -> Option<StatEntry> {
    let mut best: Option<(ParticipantIdx, f64, u32)> = None;

    for participant in 0..matrix.participants().len() {
        let Some((average, day)) = best_window_average(matrix, participant, window) else {
            continue;
        };
        if best.is_none_or(|(_, best_avg, _)| average < best_avg) {
            best = Some((participant, average, day));
        }
    }

    let (participant, average, day) = best?;
    Some(entry(
        matrix,
        participant,
        StatDetail::RollingAverage { average, day },
    ))
}

/// Longest run of consecutive submitted days for one participant
///
/// Returns the run length and the day the earliest such run ended.
pub fn participant_streak(matrix: &DayMatrix, participant: ParticipantIdx) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    let mut current = 0usize;

    for (day, reading) in matrix.column(participant) {
        if reading.is_none() {
            current = 0;
            continue;
        }
        current += 1;
        if best.is_none_or(|(best_len, _)| current > best_len) {
            best = Some((current, day));
        }
    }

    best
}

/// Longest unbroken run of submissions across all participants
pub fn longest_streak(matrix: &DayMatrix) -> Option<StatEntry> {
    let mut best: Option<(ParticipantIdx, usize, u32)> = None;

    for participant in 0..matrix.participants().len() {
        let Some((length, end_day)) = participant_streak(matrix, participant) else {
            continue;
        };
        if best.is_none_or(|(_, best_len, _)| length > best_len) {
            best = Some((participant, length, end_day));
        }
    }

    let (participant, streak, end_day) = best?;
    let day = end_day + 1 - streak as u32;
    Some(entry(matrix, participant, StatDetail::Streak { streak, day }))
}

/// Per-participant overview of the matrix
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantSummary {
    pub name: String,
    /// Days with a submission
    pub submissions: usize,
    pub best_time: Option<u32>,
    pub average: Option<f64>,
    pub longest_streak: usize,
}

/// Summarize every participant in column order
pub fn participant_summaries(matrix: &DayMatrix) -> Vec<ParticipantSummary> {
    matrix
        .participants()
        .iter()
        .enumerate()
        .map(|(participant, name)| ParticipantSummary {
            name: name.clone(),
            submissions: matrix.column(participant).filter(|(_, r)| r.is_some()).count(),
            best_time: matrix.column(participant).filter_map(|(_, r)| r).min(),
            average: participant_average(matrix, participant),
            longest_streak: participant_streak(matrix, participant)
                .map(|(length, _)| length)
                .unwrap_or(0),
        })
        .collect()
}

fn entry(matrix: &DayMatrix, participant: ParticipantIdx, detail: StatDetail) -> StatEntry {
    StatEntry {
        participant: matrix.participants()[participant].clone(),
        detail,
    }
}
