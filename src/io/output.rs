use std::io::Write;
use std::path::Path;

use crate::error::{Result, TallyError};
use crate::io::input::{ABSENT_SENTINEL, DAY_COLUMN};
use crate::models::{DayMatrix, StatDetail, StatisticsReport};
use crate::stages::ParticipantSummary;

/// Write a day matrix as CSV to a file
pub fn write_matrix_csv(matrix: &DayMatrix, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| TallyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_matrix(matrix, file)
}

/// Write a day matrix as CSV
///
/// Absent readings are written as `-1`.
pub fn write_matrix<W: Write>(matrix: &DayMatrix, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![DAY_COLUMN.to_string()];
    header.extend(matrix.participants().iter().cloned());
    wtr.write_record(&header)?;

    for row in matrix.rows() {
        let mut record = vec![row.day.to_string()];
        record.extend(row.readings.iter().map(|reading| match reading {
            Some(seconds) => seconds.to_string(),
            None => ABSENT_SENTINEL.to_string(),
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a statistics report as pretty JSON
pub fn write_report_json(report: &StatisticsReport, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|source| TallyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

/// Human-readable leaderboard
pub struct ReportText<'a> {
    report: &'a StatisticsReport,
}

impl<'a> ReportText<'a> {
    pub fn new(report: &'a StatisticsReport) -> Self {
        Self { report }
    }

    /// Format the report as one heading and one detail line per statistic
    pub fn format(&self) -> String {
        let mut output = String::new();

        for (kind, entry) in self.report.iter() {
            output.push_str(&format!("{}:\n", kind));
            output.push_str(&format!(
                "  {} - {}\n",
                entry.participant,
                format_detail(&entry.detail)
            ));
        }

        output
    }
}

fn format_detail(detail: &StatDetail) -> String {
    match detail {
        StatDetail::Time { time, day } => format!("{}s, Day: {}", time, day),
        StatDetail::Average { average } => format!("{:.2}s", average),
        StatDetail::RollingAverage { average, day } => format!("{:.2}s, Day: {}", average, day),
        StatDetail::Streak { streak, day } => format!(
            "{} day{}, Start Day: {}",
            streak,
            if *streak == 1 { "" } else { "s" },
            day
        ),
    }
}

/// Format per-participant summaries as an aligned table
pub fn format_summaries(summaries: &[ParticipantSummary]) -> String {
    let width = summaries
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("Player".len());

    let mut output = format!(
        "{:<width$}  {:>5}  {:>6}  {:>8}  {:>6}\n",
        "Player", "Days", "Best", "Average", "Streak"
    );

    for summary in summaries {
        let best = summary
            .best_time
            .map(format_clock)
            .unwrap_or_else(|| "-".to_string());
        let average = summary
            .average
            .map(|a| format!("{:.1}s", a))
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!(
            "{:<width$}  {:>5}  {:>6}  {:>8}  {:>6}\n",
            summary.name, summary.submissions, best, average, summary.longest_streak
        ));
    }

    output
}

/// Format seconds as M:SS
fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_matrix;
    use crate::models::{DayRow, StatEntry, StatKind};

    fn sample_matrix() -> DayMatrix {
        DayMatrix::from_rows(
            vec!["Ann".to_string(), "Ben".to_string()],
            vec![
                DayRow {
                    day: 1,
                    readings: vec![Some(65), None],
                },
                DayRow {
                    day: 2,
                    readings: vec![None, None],
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_matrix_uses_sentinel() {
        let mut buf = Vec::new();
        write_matrix(&sample_matrix(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Day,Ann,Ben\n1,65,-1\n2,-1,-1\n");
    }

    #[test]
    fn test_written_matrix_reads_back() {
        let mut buf = Vec::new();
        write_matrix(&sample_matrix(), &mut buf).unwrap();

        assert_eq!(read_matrix(buf.as_slice()).unwrap(), sample_matrix());
    }

    #[test]
    fn test_report_text() {
        let report = StatisticsReport::from_entries([
            (
                StatKind::FastestTime,
                StatEntry {
                    participant: "Ann".to_string(),
                    detail: StatDetail::Time { time: 65, day: 1 },
                },
            ),
            (
                StatKind::FastestAverage,
                StatEntry {
                    participant: "Ben".to_string(),
                    detail: StatDetail::Average { average: 80.0 },
                },
            ),
            (
                StatKind::LongestStreak,
                StatEntry {
                    participant: "Ann".to_string(),
                    detail: StatDetail::Streak { streak: 1, day: 4 },
                },
            ),
        ]);

        let text = ReportText::new(&report).format();
        assert_eq!(
            text,
            "Fastest time:\n  Ann - 65s, Day: 1\n\
             Fastest overall average:\n  Ben - 80.00s\n\
             Longest streak:\n  Ann - 1 day, Start Day: 4\n"
        );
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(754), "12:34");
    }
}
