//! Workbook parsing for the fetch stage.
//!
//! Converts the first worksheet of an xlsx download into an untyped
//! [`Table`]. `header_row` gives the zero-based row holding the column
//! names; everything above it is discarded.

use crate::table::Table;
use anyhow::{Result, anyhow};
use calamine::{Data, Reader, Xlsx};
use chrono::NaiveTime;
use std::io::Cursor;

pub fn parse_workbook(bytes: &[u8], header_row: usize) -> Result<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no sheets"))??;

    let mut rows = range.rows().skip(header_row);
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default();
    let data = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table::new(headers, data))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        // Whole-number floats render without the fraction so delay minutes
        // survive as plain integers
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}

/// Serial values below 1.0 are pure times of day; midnight-stamped values
/// are calendar dates.
fn render_datetime(dt: &calamine::ExcelDateTime) -> String {
    match dt.as_datetime() {
        Some(ndt) if dt.as_f64() < 1.0 => ndt.format("%H:%M").to_string(),
        Some(ndt) if ndt.time() == midnight() => ndt.format("%Y-%m-%d").to_string(),
        Some(ndt) => ndt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => dt.as_f64().to_string(),
    }
}

fn midnight() -> NaiveTime {
    NaiveTime::from_hms_opt(0, 0, 0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_cell_to_string_scalars() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("  SRT  ".into())), "SRT");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_cell_to_string_whole_float_has_no_fraction() {
        assert_eq!(cell_to_string(&Data::Float(10.0)), "10");
        assert_eq!(cell_to_string(&Data::Float(10.5)), "10.5");
    }

    #[test]
    fn test_midnight_check() {
        assert_eq!(midnight().num_seconds_from_midnight(), 0);
    }
}
