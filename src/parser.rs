//! Row parser for flight records.
//!
//! Turns one CSV record into a [`ParsedFlight`], or a [`ParseError`] describing
//! why the row has to be skipped.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use csv::StringRecord;
use serde::Deserialize;
use thiserror::Error;

/// `FL_DATE` (`YYYY-MM-DD`) immediately followed by `CRS_DEP_TIME` (`HHMM`).
const DEPARTURE_FORMAT: &str = "%Y-%m-%d%H%M";

/// The subset of input columns the pipeline reads. Other columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "ORIGIN")]
    pub origin: String,
    #[serde(rename = "DEST")]
    pub dest: String,
    #[serde(rename = "FL_DATE")]
    pub flight_date: String,
    #[serde(rename = "CRS_DEP_TIME")]
    pub scheduled_departure: String,
    #[serde(rename = "ARR_DELAY")]
    pub arrival_delay: String,
    #[serde(rename = "CRS_ELAPSED_TIME")]
    pub scheduled_elapsed: String,
}

/// A flight record with its fields converted to their logical types.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFlight {
    pub src: String,
    pub dst: String,
    /// Scheduled departure, resolved in the zone the row was parsed in.
    pub departed_on: DateTime<FixedOffset>,
    /// `None` when the input field was empty.
    pub delay_in_minutes: Option<f64>,
    /// Always non-zero.
    pub duration_in_minutes: f64,
}

/// Reasons a single row is rejected. None of these abort the run.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("row does not match the expected columns: {0}")]
    Record(#[from] csv::Error),

    #[error("invalid departure time '{value}': {source}")]
    DepartureTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("field {field} is not a number: '{value}'")]
    Number { field: &'static str, value: String },

    #[error("departure time '{value}' does not exist in the local time zone")]
    NonexistentLocalTime { value: String },

    #[error("field CRS_ELAPSED_TIME is zero")]
    ZeroDuration,
}

/// Maps a CSV record onto the named columns in `headers` and parses it.
pub fn parse_row<Tz: TimeZone>(
    record: &StringRecord,
    headers: &StringRecord,
    tz: &Tz,
) -> Result<ParsedFlight, ParseError> {
    let raw: RawRecord = record.deserialize(Some(headers))?;
    parse_record(&raw, tz)
}

/// Converts the raw text fields of a record into a [`ParsedFlight`].
///
/// The departure is wall-clock time in `tz`. A time repeated by a DST change
/// resolves to its earlier instant.
///
/// # Errors
///
/// Fails when the departure date/time does not match `YYYY-MM-DDHHMM` or is
/// skipped by a DST change in `tz`, when the delay or duration is not a
/// finite number, or when the duration is zero.
pub fn parse_record<Tz: TimeZone>(raw: &RawRecord, tz: &Tz) -> Result<ParsedFlight, ParseError> {
    let departure = format!("{}{}", raw.flight_date, raw.scheduled_departure);
    let naive = NaiveDateTime::parse_from_str(&departure, DEPARTURE_FORMAT).map_err(|source| {
        ParseError::DepartureTime {
            value: departure.clone(),
            source,
        }
    })?;
    let departed_on = naive
        .and_local_timezone(tz.clone())
        .earliest()
        .ok_or_else(|| ParseError::NonexistentLocalTime {
            value: departure.clone(),
        })?
        .fixed_offset();

    let delay_in_minutes = if raw.arrival_delay.is_empty() {
        None
    } else {
        Some(parse_decimal("ARR_DELAY", &raw.arrival_delay)?)
    };

    let duration_in_minutes = parse_decimal("CRS_ELAPSED_TIME", &raw.scheduled_elapsed)?;
    if duration_in_minutes == 0.0 {
        return Err(ParseError::ZeroDuration);
    }

    Ok(ParsedFlight {
        src: raw.origin.clone(),
        dst: raw.dest.clone(),
        departed_on,
        delay_in_minutes,
        duration_in_minutes,
    })
}

/// Parses a locale-independent decimal, rejecting `NaN` and infinities.
fn parse_decimal(field: &'static str, value: &str) -> Result<f64, ParseError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ParseError::Number {
            field,
            value: value.to_string(),
        }),
    }
}
