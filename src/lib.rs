pub mod error;
pub mod io;
pub mod models;
pub mod stages;

pub use error::{Result, TallyError};
pub use io::{
    parse_transcript_file, read_matrix, read_matrix_csv, read_transcript, write_matrix,
    write_matrix_csv, write_report_json, ReportText,
};
pub use models::{
    DayMatrix, DayRow, PlayerEntry, Roster, RosterConfig, SparseDays, StatDetail, StatEntry,
    StatKind, StatisticsReport, TimeReading,
};
pub use stages::{
    compute_statistics, extract, fill_missing_days, participant_summaries, ExtractionResult,
    ExtractionSummary,
};
