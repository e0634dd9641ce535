//! Cleaning stage: header normalization, column projection, and
//! zero-impact filtering over the raw tables.
//!
//! Rows whose gap is zero are treated as incidents that did not affect
//! service. For the subway a zero delay is ambiguous (it may mean "under
//! one minute"), so both the unfiltered and the filtered variants are
//! persisted and downstream stages can pick either interpretation.

use crate::paths;
use crate::table::Table;
use anyhow::{Result, ensure};
use std::collections::HashSet;
use tracing::info;

const BUS_COLUMNS: &[&str] = &["date", "time", "day", "incident", "min_delay", "min_gap"];
const SUBWAY_COLUMNS: &[&str] = &["date", "time", "day", "code", "min_delay", "min_gap", "line"];

/// Runs the cleaner over the three raw files at their fixed paths.
pub fn run() -> Result<()> {
    let raw_bus = Table::read_csv(paths::RAW_BUS_STATS)?;
    let bus = clean_bus(raw_bus)?;
    bus.write_csv(paths::CLEANED_BUS_STATS)?;
    info!(rows = bus.rows.len(), "Cleaned bus delay table written");

    let raw_subway = Table::read_csv(paths::RAW_SUBWAY_STATS)?;
    let (subway, filtered) = clean_subway(raw_subway)?;
    subway.write_csv(paths::CLEANED_SUBWAY_STATS)?;
    filtered.write_csv(paths::FILTERED_SUBWAY_STATS)?;
    info!(
        rows = subway.rows.len(),
        filtered_rows = filtered.rows.len(),
        "Cleaned subway delay tables written"
    );

    let raw_codes = Table::read_csv(paths::RAW_SUBWAY_CODES)?;
    let codes = clean_codes(raw_codes)?;
    codes.write_csv(paths::SUBWAY_CODE_MAP)?;
    info!(rows = codes.rows.len(), "Merged subway code table written");

    Ok(())
}

/// Normalizes and projects the raw bus table, dropping rows whose gap is
/// zero (the incident did not affect service).
pub fn clean_bus(mut raw: Table) -> Result<Table> {
    raw.normalize_headers();
    let mut cleaned = raw.select(BUS_COLUMNS)?;

    ensure_numeric(&cleaned, "min_delay")?;
    ensure_numeric(&cleaned, "min_gap")?;

    let gap = cleaned.column("min_gap")?;
    cleaned.retain_rows(|row| parse_number(&row[gap]).is_some_and(|v| v > 0.0));

    validate_delay_table(&cleaned, &["day", "incident"])?;
    Ok(cleaned)
}

/// Normalizes and projects the raw subway table. Returns the cleaned table
/// and its zero-delay-filtered variant, in that order.
pub fn clean_subway(mut raw: Table) -> Result<(Table, Table)> {
    raw.normalize_headers();
    let cleaned = raw.select(SUBWAY_COLUMNS)?;

    ensure_numeric(&cleaned, "min_delay")?;
    ensure_numeric(&cleaned, "min_gap")?;
    validate_delay_table(&cleaned, &["day"])?;

    let mut filtered = cleaned.clone();
    let delay = filtered.column("min_delay")?;
    filtered.retain_rows(|row| parse_number(&row[delay]).is_some_and(|v| v > 0.0));

    Ok((cleaned, filtered))
}

/// Extracts the two code sub-tables (main lines and Scarborough RT) from
/// the raw code workbook and concatenates them into one code→description
/// mapping. RT rows without a code are dropped.
pub fn clean_codes(mut raw: Table) -> Result<Table> {
    raw.normalize_headers();

    let mut main = raw.select(&["sub_rmenu_code", "code_description"])?;
    main.rename("sub_rmenu_code", "code")?;

    let mut srt = raw.select(&["srt_rmenu_code", "code_description.1"])?;
    let code = srt.column("srt_rmenu_code")?;
    srt.retain_rows(|row| !row[code].trim().is_empty());
    srt.rename("srt_rmenu_code", "code")?;
    srt.rename("code_description.1", "code_description")?;

    Table::concat(main, srt)
}

/// Post-condition checks shared with the classifier: exactly seven
/// distinct weekdays, non-negative delays, and textual label columns.
/// A violation is a hard stop.
pub fn validate_delay_table(table: &Table, text_columns: &[&str]) -> Result<()> {
    let day = table.column("day")?;
    let distinct: HashSet<&str> = table.rows.iter().map(|row| row[day].as_str()).collect();
    ensure!(
        distinct.len() == 7,
        "expected 7 distinct weekdays, found {}: {distinct:?}",
        distinct.len()
    );

    let delay = table.column("min_delay")?;
    for row in &table.rows {
        if let Some(value) = parse_number(&row[delay]) {
            ensure!(value >= 0.0, "negative min_delay {value}");
        }
    }

    for name in text_columns {
        let index = table.column(name)?;
        for row in &table.rows {
            let value = row[index].as_str();
            ensure!(
                value.is_empty() || parse_number(value).is_none(),
                "column {name:?} holds numeric value {value:?}, expected text"
            );
        }
    }

    Ok(())
}

// Empty cells count as missing, not as a type violation; the zero-impact
// filters drop them since a missing value never compares greater than zero.
fn ensure_numeric(table: &Table, column: &str) -> Result<()> {
    let index = table.column(column)?;
    for row in &table.rows {
        let value = row[index].trim();
        ensure!(
            value.is_empty() || parse_number(value).is_some(),
            "column {column:?} holds non-numeric value {value:?}"
        );
    }
    Ok(())
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
