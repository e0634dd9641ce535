//! Raw data retrieval from the Toronto open data portal.
//!
//! Downloads the three source workbooks (subway delay codes, subway delay
//! statistics, bus delay statistics) and persists each as a raw CSV. There
//! is no retry logic: a failed request or unparseable workbook aborts the
//! run. Re-running overwrites the previous raw files.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::paths;
use crate::xlsx;
use anyhow::{Context, Result};
use tracing::info;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Downloads and converts all three source workbooks.
pub async fn download_all<C: HttpClient>(client: &C) -> Result<()> {
    // The codes workbook carries a title row above its headers
    download_workbook(client, paths::SUBWAY_CODES_URL, 1, paths::RAW_SUBWAY_CODES).await?;
    download_workbook(client, paths::SUBWAY_STATS_URL, 0, paths::RAW_SUBWAY_STATS).await?;
    download_workbook(client, paths::BUS_STATS_URL, 0, paths::RAW_BUS_STATS).await?;
    Ok(())
}

#[tracing::instrument(skip(client), fields(url, dest))]
async fn download_workbook<C: HttpClient>(
    client: &C,
    url: &str,
    header_row: usize,
    dest: &str,
) -> Result<()> {
    info!(url, "Fetching workbook");
    let bytes = fetch_bytes(client, url)
        .await
        .with_context(|| format!("fetching {url}"))?;

    let table = xlsx::parse_workbook(&bytes, header_row)
        .with_context(|| format!("parsing workbook from {url}"))?;
    info!(dest, rows = table.rows.len(), "Workbook parsed");

    table.write_csv(dest)?;
    Ok(())
}
