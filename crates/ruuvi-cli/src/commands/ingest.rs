//! Ingest command - feed scanner output into the cache.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ruuvi_store::{CacheStore, Ingestor};
use ruuvi_types::{DeviceIdentity, ScannerLine};
use time::OffsetDateTime;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::config::Config;

/// Arguments for the ingest command.
#[derive(Debug, Clone, Default)]
pub struct IngestArgs {
    pub input: Option<PathBuf>,
    pub emit: bool,
}

/// Counts for one ingest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Non-blank lines read.
    pub lines: usize,
    /// Lines that decoded to a reading.
    pub readings: usize,
    /// Readings that were new or changed the device fingerprint.
    pub changed: usize,
    /// Readings that could not be cached.
    pub failed: usize,
    /// Lines that could not be decoded.
    pub skipped: usize,
}

/// Execute the ingest command. Runs until end of input or Ctrl-C.
///
/// Returns `None` when interrupted. A pending stdin read sits on a blocking
/// thread that cannot be cancelled, so the caller should exit the process
/// right away instead of waiting for the runtime to shut down.
pub async fn cmd_ingest(
    args: IngestArgs,
    store: CacheStore,
    config: &Config,
) -> Result<Option<IngestSummary>> {
    info!("Ingesting scanner output into {}", store.path().display());
    let ingestor = Ingestor::new(store);

    let mut stdout = io::stdout();
    let emit: Option<&mut dyn Write> = if args.emit { Some(&mut stdout) } else { None };

    let run = async {
        match &args.input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                ingest_lines(BufReader::new(file), &ingestor, config, emit).await
            }
            None => ingest_lines(BufReader::new(tokio::io::stdin()), &ingestor, config, emit).await,
        }
    };

    tokio::select! {
        result = run => {
            let summary = result?;
            info!(
                lines = summary.lines,
                readings = summary.readings,
                changed = summary.changed,
                failed = summary.failed,
                skipped = summary.skipped,
                "Ingest finished"
            );
            Ok(Some(summary))
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, stopping ingest");
            Ok(None)
        }
    }
}

/// Ingest every line from `reader`.
///
/// Status and error lines from the scanner are logged. Undecodable lines and
/// readings that fail to cache are logged and counted, never fatal. When
/// `emit` is set, each cached record is written to it as one JSON line.
pub async fn ingest_lines<R>(
    reader: R,
    ingestor: &Ingestor,
    config: &Config,
    mut emit: Option<&mut dyn Write>,
) -> Result<IngestSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut summary = IngestSummary::default();

    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read scanner output")?
    {
        if line.trim().is_empty() {
            continue;
        }
        summary.lines += 1;

        let mut reading = match ScannerLine::parse(&line) {
            Ok(ScannerLine::Reading(reading)) => reading,
            Ok(ScannerLine::Status(status)) => {
                info!(status = %status, "Scanner status");
                continue;
            }
            Ok(ScannerLine::Error { message, exception }) => {
                warn!(
                    exception = exception.as_deref().unwrap_or("-"),
                    "Scanner reported an error: {}", message
                );
                continue;
            }
            Err(e) => {
                summary.skipped += 1;
                warn!(error = %e, "Skipping scanner line");
                debug!("Skipped line: {}", line);
                continue;
            }
        };
        summary.readings += 1;

        let identity = DeviceIdentity::from_address(&reading.address);
        if let Some(alias) = config.alias_for(&identity) {
            reading.name = Some(alias.to_string());
        }

        let Some(outcome) = ingestor.ingest(&reading, OffsetDateTime::now_utc()) else {
            summary.failed += 1;
            continue;
        };
        if outcome.changed {
            summary.changed += 1;
        }

        if let Some(out) = emit.as_deref_mut() {
            writeln!(out, "{}", serde_json::to_string(&outcome.entry.data)?)?;
            out.flush()?;
        }
    }

    Ok(summary)
}
