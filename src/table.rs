//! Untyped tabular data for the cleaning stage.
//!
//! Raw exports arrive with arbitrary column headers, so the cleaner works
//! on a plain header/row representation before anything is parsed into
//! typed records.

use anyhow::{Context, Result, anyhow, ensure};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    pub fn read_csv(path: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {path}"))?;

        let headers = reader
            .headers()
            .with_context(|| format!("reading headers of {path}"))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("reading row of {path}"))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            // flexible() tolerates ragged exports; pad short rows
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Table { headers, rows })
    }

    pub fn write_csv(&self, path: &str) -> Result<()> {
        if let Some(dir) = Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let mut writer = WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("creating {path}"))?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Trims, lowercases, and underscores each header. Repeated names get a
    /// positional suffix (`code_description`, `code_description.1`, ...),
    /// which is how the raw subway code workbook's duplicate description
    /// columns are told apart.
    pub fn normalize_headers(&mut self) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        for header in &mut self.headers {
            let mut name = header.trim().to_lowercase().replace(' ', "_");
            let count = seen.entry(name.clone()).or_insert(0);
            if *count > 0 {
                name = format!("{name}.{count}");
            }
            *count += 1;
            *header = name;
        }
    }

    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("missing column {name:?} (have {:?})", self.headers))
    }

    /// Projects the table down to the named columns, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Table> {
        let indices = columns
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            headers: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }

    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let index = self.column(from)?;
        self.headers[index] = to.to_string();
        Ok(())
    }

    pub fn retain_rows<F>(&mut self, keep: F)
    where
        F: Fn(&[String]) -> bool,
    {
        self.rows.retain(|row| keep(row));
    }

    /// Stacks two tables with identical headers.
    pub fn concat(mut first: Table, second: Table) -> Result<Table> {
        ensure!(
            first.headers == second.headers,
            "cannot concatenate tables with differing headers: {:?} vs {:?}",
            first.headers,
            second.headers
        );
        first.rows.extend(second.rows);
        Ok(first)
    }
}
