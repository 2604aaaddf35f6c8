//! Writes the partitioned route dataset to disk.
//!
//! The output directory is recreated on every run and holds
//! `connections.json` plus one compact JSON array per route metric.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::routes::RouteAggregator;

pub const CONNECTIONS_FILE: &str = "connections.json";

/// Removes `dir` if it exists and creates it empty.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!(dir = %dir.display(), "Removing previous output");
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to remove output directory {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    Ok(())
}

/// Serializes `value` as compact JSON into `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), "Wrote file");
    Ok(())
}

/// Recreates `dir` and writes the connection map and every route column.
///
/// Returns the number of files written.
///
/// # Errors
///
/// Any filesystem or serialization failure is returned as-is. Two columns
/// resolving to the same file name (possible when route codes contain `-`)
/// is also an error, since one would silently overwrite the other.
pub fn write_dataset(dir: &Path, routes: &RouteAggregator) -> Result<usize> {
    recreate_dir(dir)?;

    write_json(&dir.join(CONNECTIONS_FILE), &routes.connections())?;
    let mut written = 1;

    for (route, _) in routes.routes() {
        if route.has_ambiguous_name() {
            warn!(
                src = %route.src,
                dst = %route.dst,
                "Route code contains '-', column file names are ambiguous"
            );
        }
    }

    let mut file_names = HashSet::new();
    for (key, values) in routes.columns() {
        let file_name = key.file_name();
        if !file_names.insert(file_name.clone()) {
            bail!("column file name {file_name} is produced by more than one route");
        }
        write_json(&dir.join(&file_name), &values)?;
        written += 1;
    }

    info!(dir = %dir.display(), files = written, "Dataset written");
    Ok(written)
}
