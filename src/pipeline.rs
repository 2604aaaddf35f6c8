//! Single-pass driver from a flight CSV to the route dataset.

use anyhow::{Context, Result, bail};
use chrono::{Local, TimeZone};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::output::write_dataset;
use crate::parser::parse_row;
use crate::routes::RouteAggregator;
use crate::stats::ProcessingStats;

/// Data rows are reported 1-based, counting the header line.
const ROW_NUMBER_OFFSET: usize = 2;

/// Reads `input`, groups its flights by route and writes the dataset into
/// `output_dir`.
///
/// Rows that fail to parse are logged and counted in the returned stats;
/// everything else that goes wrong aborts the run.
#[tracing::instrument(skip_all, fields(input = %input.display(), output_dir = %output_dir.display()))]
pub fn run(input: &Path, output_dir: &Path) -> Result<ProcessingStats> {
    let reader = open_input(input)?;
    let (routes, stats) =
        process_reader(reader).with_context(|| format!("failed to read {}", input.display()))?;
    write_dataset(output_dir, &routes)?;

    info!(
        processed = stats.processed(),
        parsed = stats.parsed,
        failed_to_parse = stats.failed_to_parse,
        missing_delay_coerced = stats.missing_delay_coerced,
        "Run complete"
    );
    Ok(stats)
}

/// Opens the input file, gunzipping it when the name ends in `.gz`.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!(path = %path.display(), "Reading gzip-compressed input");
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(file))
    }
}

/// Scans a CSV stream with a header row into per-route columns, reading
/// departure times as wall-clock time in the host's local zone.
///
/// # Errors
///
/// I/O errors, invalid UTF-8 and non-ASCII content are fatal. Rows that are
/// merely malformed are skipped and counted as failures.
pub fn process_reader<R: Read>(reader: R) -> Result<(RouteAggregator, ProcessingStats)> {
    process_reader_in(reader, &Local)
}

/// [`process_reader`] with departure times read in `tz`.
pub fn process_reader_in<R: Read, Tz: TimeZone>(
    reader: R,
    tz: &Tz,
) -> Result<(RouteAggregator, ProcessingStats)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("failed to read CSV header")?.clone();
    if !headers.as_slice().is_ascii() {
        bail!("CSV header contains non-ASCII characters");
    }
    debug!(columns = headers.len(), "Read CSV header");

    let mut routes = RouteAggregator::new();
    let mut failed_to_parse = 0;

    for (index, result) in rdr.records().enumerate() {
        let row = index + ROW_NUMBER_OFFSET;

        // A flexible reader only fails on I/O or invalid UTF-8.
        let record = result.with_context(|| format!("failed to read row #{row}"))?;

        if !record.as_slice().is_ascii() {
            bail!("row #{row} contains non-ASCII characters");
        }

        match parse_row(&record, &headers, tz) {
            Ok(flight) => routes.add(&flight),
            Err(e) => {
                failed_to_parse += 1;
                warn!(row, record = ?record, error = %e, "Error parsing row, skipping");
            }
        }
    }

    let stats = ProcessingStats {
        parsed: routes.flights(),
        failed_to_parse,
        missing_delay_coerced: routes.missing_delay(),
    };
    Ok((routes, stats))
}
