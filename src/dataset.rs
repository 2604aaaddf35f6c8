//! Read access to a written route dataset.
//!
//! [`Dataset`] answers the questions a consumer of the output asks: which
//! origins exist, where can I fly from a given origin, and what did the
//! flights on one route look like.

use anyhow::{Context, Result, anyhow, ensure};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::output::CONNECTIONS_FILE;
use crate::routes::{ColumnKey, Metric, Number, RouteKey};

/// One flight on a route, reassembled from the three metric columns.
///
/// Departures are shown in the host's local zone, the zone they were
/// written from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    pub departed_on: DateTime<Local>,
    pub delay_in_minutes: f64,
    pub delay_ratio: f64,
}

/// A dataset directory with its connection map loaded.
#[derive(Debug)]
pub struct Dataset {
    dir: PathBuf,
    connections: HashMap<String, Vec<String>>,
}

impl Dataset {
    /// Loads `connections.json` from `dir`. Column files are read on demand.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let connections = read_json(&dir.join(CONNECTIONS_FILE))?;
        Ok(Self { dir, connections })
    }

    /// All origins, sorted.
    pub fn origins(&self) -> Vec<&str> {
        let mut origins: Vec<&str> = self.connections.keys().map(String::as_str).collect();
        origins.sort_unstable();
        origins
    }

    /// Destinations reachable from `origin`, sorted. Unknown origins have none.
    pub fn destinations_of(&self, origin: &str) -> Vec<&str> {
        let mut destinations: Vec<&str> = self
            .connections
            .get(origin)
            .map(|d| d.iter().map(String::as_str).collect())
            .unwrap_or_default();
        destinations.sort_unstable();
        destinations
    }

    /// Reads the columns of one route and zips them into data points.
    ///
    /// # Errors
    ///
    /// Fails if a column file is missing or unreadable, if the columns have
    /// different lengths, or if a departure timestamp is out of range.
    pub fn flight_data(&self, origin: &str, destination: &str) -> Result<Vec<DataPoint>> {
        let route = RouteKey::new(origin, destination);
        let departed_on = self.read_column(&route, Metric::DepartedOn)?;
        let delay_in_minutes = self.read_column(&route, Metric::DelayInMinutes)?;
        let delay_ratio = self.read_column(&route, Metric::DelayRatio)?;

        ensure!(
            departed_on.len() == delay_in_minutes.len() && departed_on.len() == delay_ratio.len(),
            "columns of route {origin}->{destination} have different lengths ({}, {}, {})",
            departed_on.len(),
            delay_in_minutes.len(),
            delay_ratio.len()
        );

        departed_on
            .iter()
            .zip(&delay_in_minutes)
            .zip(&delay_ratio)
            .map(|((departed_on, delay), ratio)| -> Result<DataPoint> {
                Ok(DataPoint {
                    departed_on: to_datetime(*departed_on)?,
                    delay_in_minutes: delay.as_f64(),
                    delay_ratio: ratio.as_f64(),
                })
            })
            .collect()
    }

    fn read_column(&self, route: &RouteKey, metric: Metric) -> Result<Vec<Number>> {
        let key = ColumnKey::new(route.clone(), metric);
        read_json(&self.dir.join(key.file_name()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Unix seconds, possibly fractional, to a local timestamp.
fn to_datetime(seconds: Number) -> Result<DateTime<Local>> {
    let parsed = match seconds {
        Number::Integer(secs) => DateTime::from_timestamp(secs, 0),
        Number::Decimal(secs) => DateTime::from_timestamp_millis((secs * 1000.0).round() as i64),
    };
    parsed
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| anyhow!("timestamp {} is out of range", seconds.as_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn sample_dataset() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), CONNECTIONS_FILE, r#"{"TWF":["LAX"],"LAX":["SFO","DEN"]}"#);
        write(tmp.path(), "p-TWF-LAX-departedOn.json", "[1577865600,1577869200.5]");
        write(tmp.path(), "p-TWF-LAX-delayInMinutes.json", "[128,-7]");
        write(tmp.path(), "p-TWF-LAX-delayRatio.json", "[1.35,-0.07]");
        tmp
    }

    #[test]
    fn test_origins_sorted() {
        let tmp = sample_dataset();
        let dataset = Dataset::open(tmp.path()).unwrap();

        assert_eq!(dataset.origins(), vec!["LAX", "TWF"]);
    }

    #[test]
    fn test_destinations_sorted() {
        let tmp = sample_dataset();
        let dataset = Dataset::open(tmp.path()).unwrap();

        assert_eq!(dataset.destinations_of("LAX"), vec!["DEN", "SFO"]);
        assert!(dataset.destinations_of("JFK").is_empty());
    }

    #[test]
    fn test_flight_data_zips_columns() {
        let tmp = sample_dataset();
        let dataset = Dataset::open(tmp.path()).unwrap();

        let flights = dataset.flight_data("TWF", "LAX").unwrap();
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0].departed_on.timestamp(), 1577865600);
        assert_eq!(flights[0].delay_in_minutes, 128.0);
        assert_eq!(flights[0].delay_ratio, 1.35);
        assert_eq!(flights[1].departed_on.timestamp_millis(), 1577869200500);
        assert_eq!(flights[1].delay_in_minutes, -7.0);
    }

    #[test]
    fn test_flight_data_length_mismatch() {
        let tmp = sample_dataset();
        write(tmp.path(), "p-TWF-LAX-delayRatio.json", "[1.35]");
        let dataset = Dataset::open(tmp.path()).unwrap();

        assert!(dataset.flight_data("TWF", "LAX").is_err());
    }

    #[test]
    fn test_flight_data_unknown_route() {
        let tmp = sample_dataset();
        let dataset = Dataset::open(tmp.path()).unwrap();

        assert!(dataset.flight_data("LAX", "JFK").is_err());
    }

    #[test]
    fn test_open_without_connections() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Dataset::open(tmp.path()).is_err());
    }

    #[test]
    fn test_data_point_serializes_camel_case() {
        let point = DataPoint {
            departed_on: DateTime::from_timestamp(0, 0).unwrap().with_timezone(&Local),
            delay_in_minutes: 5.0,
            delay_ratio: 0.01,
        };
        let json = serde_json::to_string(&point).unwrap();

        assert!(json.contains("\"departedOn\""));
        assert!(json.contains("\"delayInMinutes\":5.0"));
        assert!(json.contains("\"delayRatio\":0.01"));
    }
}
