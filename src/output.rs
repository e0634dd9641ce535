//! Typed CSV persistence for pipeline tables.
//!
//! Every stage replaces its output files wholesale, so re-running a stage
//! on the same input produces identical bytes.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Writes `rows` to `path` as CSV with a header row, replacing any
/// previous file and creating parent directories as needed.
pub fn write_records<S: Serialize>(path: &str, rows: &[S]) -> Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    debug!(path, rows = rows.len(), "Writing CSV table");

    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads a whole CSV table into typed rows.
pub fn read_records<T: DeserializeOwned>(path: &str) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).with_context(|| format!("opening {path}"))?;

    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row.with_context(|| format!("reading row of {path}"))?);
    }

    Ok(rows)
}

/// Logs a run report as pretty-printed JSON.
pub fn print_json<S: Serialize>(report: &S) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
