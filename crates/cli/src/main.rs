//! # sheetstream-cli
//!
//! Streams the rows of a workbook to stdout as JSON lines. With a checkpoint
//! file the reader offset survives between runs, so an interrupted export
//! picks up at the last record it wrote.

use anyhow::{Context, Result};
use clap::Parser;
use sheetstream_reader::{
    DataParser, HeaderMode, ParserError, ReaderSettings, WorkbookParser, START_OFFSET,
};
use sheetstream_workbook::Workbook;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// sheetstream - resumable spreadsheet row reader
#[derive(Parser)]
#[command(name = "sheetstream")]
#[command(author, version, about = "Stream spreadsheet rows as JSON lines", long_about = None)]
struct Cli {
    /// Workbook to read (xlsx, xlsm, xlsb, xls, ods)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// First-row handling: no-header, with-header or ignore-header
    #[arg(long = "header", value_name = "MODE")]
    header: Option<HeaderMode>,

    /// Offset to start from; takes precedence over the checkpoint file
    #[arg(short = 'o', long = "offset")]
    offset: Option<String>,

    /// File the offset is read from and written back to
    #[arg(short = 'c', long = "checkpoint", value_name = "PATH")]
    checkpoint: Option<PathBuf>,

    /// YAML file with reader settings
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after writing this many records
    #[arg(short = 'n', long = "max-records", value_name = "N")]
    max_records: Option<usize>,

    /// Log rows that fail to convert and keep reading
    #[arg(long = "skip-errors")]
    skip_errors: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    emitted: usize,
    skipped: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    }

    let settings = resolve_settings(cli.config.as_deref(), cli.header)?;
    let offset = resolve_offset(cli.offset.as_deref(), cli.checkpoint.as_deref())?;

    let workbook = Workbook::open(&cli.file)
        .with_context(|| format!("Failed to open workbook: {}", cli.file.display()))?;
    let mut parser = WorkbookParser::new(settings, workbook, &offset)
        .with_context(|| format!("Cannot start reading at offset '{offset}'"))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let outcome = stream_records(&mut parser, &mut out, cli.max_records, cli.skip_errors);
    out.flush().context("Failed to flush output")?;

    // Persist the position even when the run stopped on an error
    if let Some(path) = &cli.checkpoint {
        write_checkpoint(path, &parser.offset())?;
    }
    let final_offset = parser.offset();
    parser.close()?;

    let summary = outcome?;
    tracing::info!(
        emitted = summary.emitted,
        skipped = summary.skipped,
        offset = %final_offset,
        "finished"
    );
    Ok(())
}

/// Load settings from the config file, then apply the command-line header mode.
fn resolve_settings(config: Option<&Path>, header: Option<HeaderMode>) -> Result<ReaderSettings> {
    let mut settings = match config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_yaml::from_str::<ReaderSettings>(&source)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        }
        None => ReaderSettings::default(),
    };
    if let Some(header) = header {
        settings.header = header;
    }
    Ok(settings)
}

/// Pick the starting offset: explicit flag, then checkpoint file, then the start.
fn resolve_offset(explicit: Option<&str>, checkpoint: Option<&Path>) -> Result<String> {
    if let Some(offset) = explicit {
        return Ok(offset.to_string());
    }
    let Some(path) = checkpoint else {
        return Ok(START_OFFSET.to_string());
    };

    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let offset = contents.trim();
            if offset.is_empty() {
                Ok(START_OFFSET.to_string())
            } else {
                tracing::info!(offset, checkpoint = %path.display(), "resuming from checkpoint");
                Ok(offset.to_string())
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(START_OFFSET.to_string()),
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read checkpoint: {}", path.display()))
        }
    }
}

fn write_checkpoint(path: &Path, offset: &str) -> Result<()> {
    std::fs::write(path, format!("{offset}\n"))
        .with_context(|| format!("Failed to write checkpoint: {}", path.display()))?;
    tracing::debug!(offset, checkpoint = %path.display(), "checkpoint saved");
    Ok(())
}

/// Drive the pull loop, writing one JSON object per record.
fn stream_records<P: DataParser, W: Write>(
    parser: &mut P,
    out: &mut W,
    max_records: Option<usize>,
    skip_errors: bool,
) -> Result<Summary> {
    let mut summary = Summary::default();

    while !max_records.is_some_and(|max| summary.emitted >= max) {
        match parser.parse() {
            Ok(Some(record)) => {
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
                summary.emitted += 1;
            }
            Ok(None) => break,
            Err(err @ ParserError::Cell { .. }) if skip_errors => {
                tracing::warn!(code = err.code(), offset = %parser.offset(), "skipping row: {err}");
                summary.skipped += 1;
            }
            Err(err) => {
                let context = format!("[{}] reading stopped at offset {}", err.code(), parser.offset());
                return Err(anyhow::Error::new(err).context(context));
            }
        }
    }

    Ok(summary)
}
