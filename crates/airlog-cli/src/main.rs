use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use airlog_core::{DirSegmentSource, Measurement, Report, encode_frames, gap_spans};
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use glob::glob;
use time::{Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("AIRLOG_BUILD_COMMIT"),
    ", ",
    env!("AIRLOG_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  airlog log decode log/pm/2024-05-01 -o report.json\n  airlog log day --dir log/pm --date 2024-05-01 --stdout\n  airlog log encode readings.csv -o log/pm/2024-05-01";

#[derive(Parser, Debug)]
#[command(name = "airlog")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline decoder for particulate sensor log segments.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on binary log segments (offline-first).
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
enum LogCommands {
    /// Decode a segment file and generate a versioned JSON report.
    #[command(after_help = EXAMPLES)]
    Decode {
        /// Path to a log segment file
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Decode the segment of one calendar day from a log directory.
    Day {
        /// Directory holding per-day segment files
        #[arg(long, env = "AIRLOG_LOG_DIR")]
        dir: PathBuf,

        /// Day to decode (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        date: Date,

        /// UTC offset the logger names its day files in (e.g. +02:00)
        #[arg(
            long,
            env = "AIRLOG_UTC_OFFSET",
            default_value = "+00:00",
            allow_hyphen_values = true,
            value_parser = parse_offset_arg
        )]
        utc_offset: UtcOffset,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Build a log segment from `timestamp,pm1,pm2_5,pm10` CSV lines.
    Encode {
        /// CSV file with one reading per line
        input: PathBuf,

        /// Output segment path
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// List gaps in the time series after decoding
    #[arg(long)]
    list_gaps: bool,
}

impl OutputArgs {
    fn report_target(&self) -> Result<Option<PathBuf>, CliError> {
        if self.stdout {
            return Ok(None);
        }
        self.report.clone().map(Some).ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })
    }
}

impl Commands {
    fn quiet(&self) -> bool {
        match self {
            Commands::Log { command } => match command {
                LogCommands::Decode { output, .. } | LogCommands::Day { output, .. } => {
                    output.quiet
                }
                LogCommands::Encode { quiet, .. } => *quiet,
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.command.quiet());

    let result = match cli.command {
        Commands::Log { command } => match command {
            LogCommands::Decode { input, output } => cmd_log_decode(input, output),
            LogCommands::Day {
                dir,
                date,
                utc_offset,
                output,
            } => cmd_log_day(dir, date, utc_offset, output),
            LogCommands::Encode {
                input,
                output,
                quiet,
            } => cmd_log_encode(input, output, quiet),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_log_decode(input: PathBuf, output: OutputArgs) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;

    let report_path = output.report_target()?;
    if let Some(report_path) = report_path.as_ref() {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    tracing::info!(input = %resolved_input.display(), "decoding log segment");
    let rep = airlog_core::analyze_log_file(&resolved_input)
        .context("log segment decoding failed")?;
    emit_report(&rep, &output, report_path.as_deref())
}

fn cmd_log_day(
    dir: PathBuf,
    date: Date,
    utc_offset: UtcOffset,
    output: OutputArgs,
) -> Result<(), CliError> {
    if !dir.is_dir() {
        return Err(CliError::new(
            format!("log directory not found: {}", dir.display()),
            Some("pass --dir or set AIRLOG_LOG_DIR".to_string()),
        ));
    }

    let report_path = output.report_target()?;
    let source = DirSegmentSource::new(&dir);
    let segment_path = source.segment_path(date);
    if let (Some(report_path), Ok(input_abs)) =
        (report_path.as_ref(), fs::canonicalize(&segment_path))
    {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    tracing::info!(segment = %segment_path.display(), "decoding day segment");
    let rep = airlog_core::analyze_segment(
        &source,
        &segment_path.display().to_string(),
        date,
        utc_offset,
    );
    emit_report(&rep, &output, report_path.as_deref())
}

fn cmd_log_encode(input: PathBuf, output: PathBuf, quiet: bool) -> Result<(), CliError> {
    if !input.is_file() {
        return Err(CliError::new(
            format!("readings file not found: {}", input.display()),
            Some("expected a CSV file with timestamp,pm1,pm2_5,pm10 lines".to_string()),
        ));
    }
    let text = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read readings: {}", input.display()))?;
    let readings = parse_readings(&text)?;

    create_parent_dir(&output)?;
    fs::write(&output, encode_frames(&readings))
        .with_context(|| format!("Failed to write segment: {}", output.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} frames written -> {}",
            readings.len(),
            output.display()
        );
    }
    Ok(())
}

fn emit_report(
    rep: &Report,
    output: &OutputArgs,
    report_path: Option<&Path>,
) -> Result<(), CliError> {
    let json = serialize_report(rep, output.pretty && !output.compact)?;

    let Some(report_path) = report_path else {
        print!("{}", json);
        if output.list_gaps && !output.quiet {
            print_gaps(rep);
        }
        return Ok(());
    };

    create_parent_dir(report_path)?;
    fs::write(report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if output.list_gaps && !output.quiet {
        print_gaps(rep);
    }
    if !output.quiet {
        eprintln!("OK: report written -> {}", report_path.display());
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn print_gaps(rep: &Report) {
    let spans = gap_spans(&rep.samples);
    if spans.is_empty() {
        eprintln!("no gaps");
        return;
    }
    for span in spans {
        eprintln!(
            "gap: {} -> {} ({}s)",
            format_ts(span.from),
            format_ts(span.to),
            span.duration_secs()
        );
    }
}

fn format_ts(ts: u32) -> String {
    OffsetDateTime::from_unix_timestamp(i64::from(ts))
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.to_string())
}

fn parse_date_arg(value: &str) -> Result<Date, String> {
    airlog_core::parse_segment_date(value)
        .map_err(|err| format!("expected a YYYY-MM-DD date ({err})"))
}

fn parse_offset_arg(value: &str) -> Result<UtcOffset, String> {
    airlog_core::parse_utc_offset(value)
        .map_err(|err| format!("expected a signed offset such as +02:00 ({err})"))
}

fn parse_readings(text: &str) -> Result<Vec<Measurement>, CliError> {
    let mut readings = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("timestamp") {
            continue;
        }
        let reading = parse_reading(line).map_err(|err| {
            CliError::new(
                format!("invalid reading on line {}: {:#}", index + 1, err),
                Some("expected `timestamp,pm1,pm2_5,pm10` as unsigned integers".to_string()),
            )
        })?;
        readings.push(reading);
    }
    Ok(readings)
}

fn parse_reading(line: &str) -> Result<Measurement> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [timestamp, pm1, pm2_5, pm10] = fields.as_slice() else {
        bail!("expected 4 fields, got {}", fields.len());
    };
    Ok(Measurement {
        timestamp: timestamp
            .parse()
            .with_context(|| format!("bad timestamp '{timestamp}'"))?,
        pm1: parse_concentration(pm1)?,
        pm2_5: parse_concentration(pm2_5)?,
        pm10: parse_concentration(pm10)?,
    })
}

fn parse_concentration(value: &str) -> Result<u16> {
    value
        .parse()
        .with_context(|| format!("bad concentration '{value}'"))
}

fn create_parent_dir(path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let report_dir = report_path
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .transpose()
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()));

    // An output directory that does not exist yet cannot contain the input.
    let Ok(Some(report_dir)) = report_dir else {
        return Ok(());
    };
    let file_name = report_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a log segment file, e.g. log/pm/2024-05-01".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use `airlog log day --dir` to decode from a log directory".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single segment file, or use `airlog log day`".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
