use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use queens_tally::io::format_summaries;
use queens_tally::{
    compute_statistics, fill_missing_days, parse_transcript_file, participant_summaries,
    read_matrix_csv, write_matrix_csv, write_report_json, DayMatrix, ReportText, Roster,
    RosterConfig,
};

#[derive(Parser)]
#[command(name = "queens-tally")]
#[command(author, version, about = "Queens puzzle leaderboard from a chat transcript", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract daily times from a chat transcript into a CSV matrix
    Parse {
        /// Chat transcript (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file for the day matrix
        #[arg(short, long)]
        output: PathBuf,

        /// Roster JSON mapping display names to short names
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Compute leaderboard statistics from a CSV matrix
    Stats {
        /// Day matrix CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a transcript and compute statistics in one run
    Process {
        /// Chat transcript (plain text)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file for the day matrix
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Roster JSON mapping display names to short names
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            roster,
            verbose,
        } => {
            setup_logging(verbose);
            let roster = load_roster(roster.as_deref())?;
            parse_transcript(&input, &output, &roster)?;
            Ok(())
        }
        Commands::Stats {
            input,
            json,
            verbose,
        } => {
            setup_logging(verbose);
            info!("Loading matrix from {:?}", input);
            let matrix = read_matrix_csv(&input).context("Failed to read day matrix")?;
            report_statistics(&matrix, json.as_deref())
        }
        Commands::Process {
            input,
            output,
            json,
            roster,
            verbose,
        } => {
            setup_logging(verbose);
            let roster = load_roster(roster.as_deref())?;
            let matrix = parse_transcript(&input, &output, &roster)?;
            report_statistics(&matrix, json.as_deref())
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_roster(path: Option<&Path>) -> Result<Roster> {
    let config = match path {
        Some(path) => {
            info!("Loading roster from {:?}", path);
            RosterConfig::from_file(path).context("Failed to load roster")?
        }
        None => RosterConfig::default(),
    };
    let roster = config.build().context("Invalid roster")?;
    info!("Roster: {}", roster.participants().join(", "));
    Ok(roster)
}

fn parse_transcript(input: &Path, output: &Path, roster: &Roster) -> Result<DayMatrix> {
    info!("Stage 0: Extracting times from {:?}", input);
    let extraction =
        parse_transcript_file(input, roster).context("Failed to parse input transcript")?;

    let summary = &extraction.summary;
    info!(
        "Scanned {} lines: {} sender lines, {} readings, {} days seen",
        summary.lines_scanned,
        summary.sender_lines + summary.name_lines,
        summary.readings_recorded(),
        extraction.days.len()
    );

    info!("Stage 1: Filling missing days...");
    let matrix = fill_missing_days(&extraction.days, roster.participants());
    match (matrix.first_day(), matrix.last_day()) {
        (Some(first), Some(last)) => info!(
            "Matrix covers days {}-{} ({} rows)",
            first,
            last,
            matrix.day_count()
        ),
        _ => info!("No days found in transcript"),
    }

    write_matrix_csv(&matrix, output).context("Failed to write day matrix")?;
    info!("Data written to {:?}", output);

    Ok(matrix)
}

fn report_statistics(matrix: &DayMatrix, json: Option<&Path>) -> Result<()> {
    info!("Stage 2: Computing statistics...");
    let report = compute_statistics(matrix);
    info!("{} statistics computed", report.len());

    if let Some(path) = json {
        write_report_json(&report, path).context("Failed to write report")?;
        info!("Report written to {:?}", path);
    }

    println!("Leaderboard");
    println!("===========");
    print!("{}", ReportText::new(&report).format());
    println!();

    println!("Player Statistics");
    println!("-----------------");
    print!("{}", format_summaries(&participant_summaries(matrix)));

    Ok(())
}
