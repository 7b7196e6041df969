//! CLI entry point for the academic aggregator.
//!
//! Provides subcommands for building progress reports, computing CGPA and
//! attendance, listing the roster, and recording new grades and attendance.

use academic_aggregator::analyzers::aggregate::{
    GradePolicy, compute_cgpa_with, compute_overall_attendance, compute_subject_percentage,
};
use academic_aggregator::analyzers::analyzer::build_progress_report;
use academic_aggregator::analyzers::types::ReportRow;
use academic_aggregator::analyzers::utility::round_to_tenth;
use academic_aggregator::config::Settings;
use academic_aggregator::output::{append_record, print_pretty, render_summary, to_json};
use academic_aggregator::parser::{AttendanceRow, GradeRow};
use academic_aggregator::records::AttendanceStatus;
use academic_aggregator::sources::{
    AttendanceSource, CsvSource, GradeSource, InMemorySource, StudentDirectory,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "academic_aggregator")]
#[command(
    about = "Grade point and attendance aggregation for student progress reports",
    long_about = None
)]
struct Cli {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Score unknown letter grades as 0 instead of failing
    #[arg(long, global = true, default_value_t = false)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory holding students.csv, grades.csv and attendance.csv
    #[arg(short = 'd', long)]
    data_dir: Option<PathBuf>,

    /// Use the built-in demo roster instead of a data directory
    #[arg(long, default_value_t = false, conflicts_with = "data_dir")]
    demo: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full progress report for a student
    Report {
        #[arg(short, long)]
        student_id: String,

        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long, value_enum, default_value_t = Format::Pretty)]
        format: Format,

        /// CSV file to append a summary row to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a student's CGPA
    Cgpa {
        #[arg(short, long)]
        student_id: String,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print a student's overall attendance percentage
    Attendance {
        #[arg(short, long)]
        student_id: String,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the percentage for a single mark
    Percentage {
        marks_obtained: f64,
        total_marks: f64,
    },
    /// List students in the roster
    ListStudents {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Record a grade in the data directory
    AddGrade {
        #[arg(short, long)]
        student_id: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        marks: f64,

        #[arg(long, default_value_t = 100.0)]
        total: f64,

        #[arg(long)]
        letter: String,

        #[arg(long)]
        semester: u8,

        #[arg(short = 'd', long)]
        data_dir: Option<PathBuf>,
    },
    /// Record an attendance entry in the data directory
    AddAttendance {
        #[arg(short, long)]
        student_id: String,

        /// Class date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        subject: String,

        /// present, absent or late
        #[arg(long)]
        status: AttendanceStatus,

        #[arg(short = 'd', long)]
        data_dir: Option<PathBuf>,
    },
}

/// Everything a progress report needs, behind one object.
trait Records: StudentDirectory + GradeSource + AttendanceSource {}

impl<T: StudentDirectory + GradeSource + AttendanceSource> Records for T {}

fn open_source(args: &SourceArgs, settings: &Settings) -> Result<Box<dyn Records>> {
    if args.demo {
        info!("Using demo roster");
        return Ok(Box::new(InMemorySource::demo()?));
    }

    let dir = args.data_dir.clone().unwrap_or_else(|| settings.data_dir.clone());
    if !dir.exists() {
        warn!(dir = %dir.display(), "Data directory does not exist; no records will be found");
    }
    Ok(Box::new(CsvSource::new(dir)))
}

/// Resolves settings from the config file, then the environment, then CLI flags.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut settings = settings.with_env()?;
    if cli.lenient {
        settings.grade_policy = GradePolicy::Lenient;
    }
    Ok(settings)
}

/// Logging setup: colored stderr + JSON rolling log file
fn init_logging(log_file_path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = log_file_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("academic_aggregator.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    let _file_guard = init_logging(&settings.log_file_path)?;

    match cli.command {
        Commands::Report {
            student_id,
            source,
            format,
            output,
        } => {
            let records = open_source(&source, &settings)?;
            let report =
                build_progress_report(&student_id, &*records, &*records, &*records, &settings)?;
            print_pretty(&report);

            match format {
                Format::Pretty => print!("{}", render_summary(&report)),
                Format::Json => println!("{}", to_json(&report)?),
            }

            if let Some(path) = output {
                append_record(&path, &ReportRow::from(&report))?;
                info!(path = %path.display(), "Report row appended");
            }
        }
        Commands::Cgpa { student_id, source } => {
            let records = open_source(&source, &settings)?;
            records.require_student(&student_id)?;
            let grades = records.grades_for(&student_id)?;
            if grades.is_empty() {
                warn!(student_id = %student_id, "No grades recorded; CGPA defaults to 0");
            }
            let cgpa = compute_cgpa_with(&grades, settings.grade_policy)?;
            println!("{cgpa:.2}");
        }
        Commands::Attendance { student_id, source } => {
            let records = open_source(&source, &settings)?;
            records.require_student(&student_id)?;
            let attendance = records.attendance_for(&student_id)?;
            if attendance.is_empty() {
                warn!(student_id = %student_id, "No attendance recorded; percentage defaults to 0");
            }
            println!("{}%", compute_overall_attendance(&attendance));
        }
        Commands::Percentage {
            marks_obtained,
            total_marks,
        } => {
            let pct = compute_subject_percentage(marks_obtained, total_marks)?;
            println!("{:.1}%", round_to_tenth(pct));
        }
        Commands::ListStudents { source } => {
            let records = open_source(&source, &settings)?;
            let students = records.list_students()?;
            info!(total = students.len(), "Roster loaded");

            for s in &students {
                println!(
                    "{}\t{}\t{}\t{}\tsemester {}",
                    s.student_id, s.name, s.email, s.course, s.semester
                );
            }
        }
        Commands::AddGrade {
            student_id,
            subject,
            marks,
            total,
            letter,
            semester,
            data_dir,
        } => {
            let source = CsvSource::new(data_dir.unwrap_or_else(|| settings.data_dir.clone()));
            source.require_student(&student_id)?;

            source.append_grade(&GradeRow {
                student_id: student_id.clone(),
                subject,
                marks_obtained: marks,
                total_marks: total,
                letter_grade: letter,
                semester,
            })?;
            info!(student_id = %student_id, dir = %source.dir().display(), "Grade recorded");
        }
        Commands::AddAttendance {
            student_id,
            date,
            subject,
            status,
            data_dir,
        } => {
            let source = CsvSource::new(data_dir.unwrap_or_else(|| settings.data_dir.clone()));
            source.require_student(&student_id)?;

            source.append_attendance(&AttendanceRow {
                student_id: student_id.clone(),
                date,
                subject,
                status,
            })?;
            info!(student_id = %student_id, %date, %status, "Attendance recorded");
        }
    }

    Ok(())
}
