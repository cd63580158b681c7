// LogLens - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Line pattern resolution (built-in or user-defined)
// 4. Ingest, filter, and output of the log file
// 5. Optional analysis / AI summary requests against the analysis service

use clap::{Parser, ValueEnum};
use loglens::app::session::{AnalysisState, Session, SummaryState};
use loglens::core::export::{export_csv, export_json};
use loglens::core::filter::LogFilter;
use loglens::core::model::LogEntry;
use loglens::core::pattern::LinePattern;
use loglens::core::report::render_report;
use loglens::platform::analysis::AnalysisClient;
use loglens::platform::config::{load_config, AppConfig, PlatformPaths};
use loglens::platform::fs::{load_pattern_file, read_log_file};
use loglens::util::constants;
use loglens::util::error::{ConfigError, ExportError, LogLensError};
use loglens::util::logging;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// LogLens - parse, filter and analyse a plain-text log file.
///
/// Lines that do not match the active line pattern are skipped. Filters are
/// AND-combined; analysis always covers the whole file, not just the
/// filtered view.
#[derive(Parser, Debug)]
#[command(name = "loglens", version, about)]
struct Cli {
    /// Log file to ingest.
    file: PathBuf,

    /// Only show entries at this level (repeatable). Unknown names are ignored.
    #[arg(short = 'l', long = "level")]
    levels: Vec<String>,

    /// Case-insensitive substring to search for in messages.
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// Earliest timestamp to show (inclusive), e.g. "2024-01-15" or "2024-01-15 10:00:00".
    #[arg(long)]
    since: Option<String>,

    /// Latest timestamp to show (inclusive).
    #[arg(long)]
    until: Option<String>,

    /// Built-in line pattern id.
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// TOML file defining a custom line pattern (overrides --pattern).
    #[arg(long = "pattern-file")]
    pattern_file: Option<PathBuf>,

    /// Output format for the entries.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write entries to this file instead of stdout.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Request aggregate analysis from the analysis service.
    #[arg(short = 'a', long)]
    analyze: bool,

    /// Request a free-text AI summary from the analysis service.
    #[arg(short = 's', long)]
    summary: bool,

    /// Analysis service base URL (overrides config).
    #[arg(long)]
    server: Option<String>,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Config comes first: it decides the log level and log file.
    let (config, config_warnings) = match load_startup_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "LogLens starting"
    );

    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(error = %e, "LogLens failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load `--config` if given (it must exist), otherwise the platform default.
fn load_startup_config(
    explicit: Option<&Path>,
) -> Result<(AppConfig, Vec<String>), LogLensError> {
    match explicit {
        Some(path) if !path.exists() => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "config file not found"),
        }
        .into()),
        Some(path) => Ok(load_config(path)),
        None => Ok(load_config(&PlatformPaths::resolve().config_file())),
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> Result<(), LogLensError> {
    let mut session = Session::new(resolve_pattern(cli, config)?);
    tracing::debug!(
        pattern = session.pattern().id(),
        name = session.pattern().name(),
        "Line pattern selected"
    );

    let raw = read_log_file(&cli.file, constants::MAX_INPUT_FILE_SIZE)?;

    let token = session.load_text(&raw);
    session.set_filter(build_filter(cli));
    if !session.filter().is_empty() {
        tracing::debug!(filter = ?session.filter(), "Filter active");
    }

    let stats = session.stats();
    let visible = session.visible_entries();
    eprintln!(
        "{} lines ingested, {} shown ({} lines skipped)",
        stats.entries,
        visible.len(),
        stats.lines_skipped
    );
    write_entries(&visible, cli.format, cli.output.as_deref())?;

    let want_analysis = cli.analyze || config.analysis_enabled;
    if !want_analysis && !cli.summary {
        return Ok(());
    }

    let base_url = cli.server.as_deref().unwrap_or(&config.analysis_url);
    let client = AnalysisClient::new(
        base_url,
        Duration::from_secs(config.analysis_timeout_secs),
    )?;

    // Report text shares stdout with the entries only when that stays readable.
    let mut overlay: Box<dyn Write> = if cli.output.is_some() || cli.format == OutputFormat::Text {
        Box::new(io::stdout().lock())
    } else {
        Box::new(io::stderr().lock())
    };
    let overlay_err = |source| ExportError::Io {
        path: PathBuf::from("<report>"),
        source,
    };

    if want_analysis {
        match token {
            Some(token) => {
                let result = client.analyze(session.entries()).await;
                session.apply_analysis(token, result);
            }
            None => eprintln!("No entries parsed; analysis skipped."),
        }
        match session.analysis() {
            AnalysisState::Ready(result) => {
                writeln!(overlay, "\n{}", render_report(result)).map_err(overlay_err)?;
            }
            AnalysisState::Failed(message) => {
                eprintln!("Analysis unavailable: {message}");
            }
            AnalysisState::Idle | AnalysisState::Pending => {}
        }
    }

    if cli.summary {
        if let Some(token) = session.request_summary() {
            let result = client.summarize(session.entries()).await;
            session.apply_summary(token, result);
        }
        match session.summary() {
            SummaryState::Ready(text) => {
                writeln!(overlay, "\nAI summary\n{text}").map_err(overlay_err)?;
            }
            SummaryState::Failed(message) => eprintln!("Summary unavailable: {message}"),
            SummaryState::Idle | SummaryState::Pending => {}
        }
    }

    overlay.flush().map_err(overlay_err)?;
    Ok(())
}

/// Pattern precedence: --pattern-file > --pattern > config pattern_file > config pattern.
fn resolve_pattern(cli: &Cli, config: &AppConfig) -> Result<LinePattern, LogLensError> {
    if let Some(path) = &cli.pattern_file {
        return load_pattern_file(path);
    }
    if let Some(id) = &cli.pattern {
        return Ok(LinePattern::builtin(id)?);
    }
    if let Some(path) = &config.pattern_file {
        return load_pattern_file(path);
    }
    Ok(LinePattern::builtin(&config.pattern_id)?)
}

fn build_filter(cli: &Cli) -> LogFilter {
    let mut filter = LogFilter::default().with_level_names(&cli.levels);
    if let Some(keyword) = &cli.keyword {
        filter = filter.with_keyword(keyword.as_str());
    }
    if let Some(since) = &cli.since {
        filter = filter.with_start_text(since);
    }
    if let Some(until) = &cli.until {
        filter = filter.with_end_text(until);
    }
    filter
}

fn write_entries(
    entries: &[&LogEntry],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), LogLensError> {
    let label = output.unwrap_or(Path::new("<stdout>"));
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = std::fs::File::create(path).map_err(|source| LogLensError::Io {
                path: path.to_path_buf(),
                operation: "create",
                source,
            })?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let written = match format {
        OutputFormat::Csv => export_csv(entries, &mut writer, label)?,
        OutputFormat::Json => export_json(entries, &mut writer, label)?,
        OutputFormat::Text => {
            let io_err = |source| ExportError::Io {
                path: label.to_path_buf(),
                source,
            };
            for entry in entries {
                writeln!(
                    writer,
                    "{} {:<5} {}",
                    entry.timestamp_text(),
                    entry.level().as_str(),
                    entry.message()
                )
                .map_err(io_err)?;
            }
            entries.len()
        }
    };

    writer.flush().map_err(|source| ExportError::Io {
        path: label.to_path_buf(),
        source,
    })?;
    tracing::debug!(entries = written, output = %label.display(), "Entries written");
    Ok(())
}
