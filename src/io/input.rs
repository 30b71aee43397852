use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::error::{Result, TallyError};
use crate::models::{DayMatrix, DayRow, Roster, TimeReading};
use crate::stages::{extract, ExtractionResult};

/// CSV header of the day column
pub const DAY_COLUMN: &str = "Day";

/// Sentinel written for a day without a submission
pub const ABSENT_SENTINEL: i64 = -1;

/// Read a transcript file into lines
pub fn read_transcript(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => TallyError::SourceNotFound(path.to_path_buf()),
        _ => TallyError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Read and extract a transcript file
pub fn parse_transcript_file(path: &Path, roster: &Roster) -> Result<ExtractionResult> {
    let lines = read_transcript(path)?;
    Ok(extract(&lines, roster))
}

/// Load a day matrix from a CSV file
pub fn read_matrix_csv(path: &Path) -> Result<DayMatrix> {
    let file = std::fs::File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => TallyError::SourceNotFound(path.to_path_buf()),
        _ => TallyError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    read_matrix(file)
}

/// Parse a day matrix from CSV text
///
/// Expects a `Day` column followed by one column per participant. Cells hold
/// whole seconds, or `-1` for a day without a submission.
pub fn read_matrix<R: Read>(reader: R) -> Result<DayMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.get(0) != Some(DAY_COLUMN) {
        return Err(TallyError::MalformedMatrix(format!(
            "first column must be {:?}, found {:?}",
            DAY_COLUMN,
            headers.get(0).unwrap_or("")
        )));
    }
    let participants: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let lineno = idx + 2;
        let record = record?;
        if record.len() != participants.len() + 1 {
            return Err(TallyError::MalformedMatrix(format!(
                "line {} has {} fields, expected {}",
                lineno,
                record.len(),
                participants.len() + 1
            )));
        }

        let day = record[0].parse::<u32>().map_err(|_| {
            TallyError::MalformedMatrix(format!("line {}: invalid day {:?}", lineno, &record[0]))
        })?;
        let readings = record
            .iter()
            .skip(1)
            .map(|cell| parse_cell(cell, lineno))
            .collect::<Result<Vec<TimeReading>>>()?;

        rows.push(DayRow { day, readings });
    }

    DayMatrix::from_rows(participants, rows)
}

fn parse_cell(cell: &str, lineno: usize) -> Result<TimeReading> {
    match cell.parse::<i64>() {
        Ok(ABSENT_SENTINEL) => Ok(None),
        Ok(seconds) => u32::try_from(seconds).map(Some).map_err(|_| {
            TallyError::MalformedMatrix(format!("line {}: invalid time {}", lineno, seconds))
        }),
        Err(_) => Err(TallyError::MalformedMatrix(format!(
            "line {}: invalid time {:?}",
            lineno, cell
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RosterConfig;

    #[test]
    fn test_read_matrix() {
        let csv = "Day,Ann,Ben\n1,65,-1\n2,-1,-1\n3,130,45\n";
        let matrix = read_matrix(csv.as_bytes()).unwrap();

        assert_eq!(matrix.participants(), &["Ann", "Ben"]);
        assert_eq!(matrix.day_count(), 3);
        assert_eq!(matrix.reading(1, 0), Some(65));
        assert_eq!(matrix.reading(1, 1), None);
        assert_eq!(matrix.rows()[1].readings, vec![None, None]);
        assert_eq!(matrix.reading(3, 1), Some(45));
    }

    #[test]
    fn test_read_matrix_header_only() {
        let matrix = read_matrix("Day,Ann\n".as_bytes()).unwrap();
        assert!(matrix.is_empty());
        assert_eq!(matrix.participants(), &["Ann"]);
    }

    #[test]
    fn test_read_matrix_rejects_gap() {
        let csv = "Day,Ann\n1,65\n3,70\n";
        assert!(matches!(
            read_matrix(csv.as_bytes()),
            Err(TallyError::MalformedMatrix(_))
        ));
    }

    #[test]
    fn test_read_matrix_rejects_negative_time() {
        let csv = "Day,Ann\n1,-5\n";
        assert!(matches!(
            read_matrix(csv.as_bytes()),
            Err(TallyError::MalformedMatrix(_))
        ));
    }

    #[test]
    fn test_read_matrix_rejects_missing_day_column() {
        let csv = "Date,Ann\n1,65\n";
        assert!(matches!(
            read_matrix(csv.as_bytes()),
            Err(TallyError::MalformedMatrix(_))
        ));
    }

    #[test]
    fn test_missing_transcript_is_reported() {
        let roster = RosterConfig::default().build().unwrap();
        let result = parse_transcript_file(Path::new("/nonexistent/full-chat.txt"), &roster);

        assert!(matches!(result, Err(TallyError::SourceNotFound(_))));
    }
}
