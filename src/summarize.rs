//! Grouped aggregates over the classified delay tables.
//!
//! Each aggregate is materialized in full and written as its own table;
//! there is no windowing or cross-join between them.

use crate::output::{print_json, read_records, write_records};
use crate::paths;
use crate::records::{
    ClassifiedBusRow, ClassifiedSubwayRow, Incident, Weekday, parse_date,
};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// One delay event in the shape the aggregates need, regardless of mode.
#[derive(Debug, Clone)]
pub struct DelayEvent {
    pub date: NaiveDate,
    pub day: Weekday,
    pub min_delay: i64,
    pub incident: Option<Incident>,
    pub line: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeekdayMeanRow {
    pub day: Weekday,
    pub mean_num_delays: f64,
}

#[derive(Debug, Serialize)]
pub struct DateDelayRow {
    pub date: NaiveDate,
    pub day: Weekday,
    pub total_delay_time: i64,
    pub n: usize,
    pub mean_delay_time: f64,
}

#[derive(Debug, Serialize)]
pub struct IncidentCountRow {
    pub incident: Incident,
    pub n: usize,
}

#[derive(Debug, Serialize)]
pub struct LineCountRow {
    pub line: String,
    pub n: usize,
}

/// Row counts of the written summary tables, logged as a run report.
#[derive(Debug, Serialize)]
pub struct Report {
    pub bus_events: usize,
    pub subway_events: usize,
    pub tables_written: usize,
}

/// Runs the summarizer over the classified tables at their fixed paths.
pub fn run() -> Result<()> {
    let bus: Vec<ClassifiedBusRow> = read_records(paths::CLASSIFIED_BUS_STATS)?;
    let bus_events = bus.iter().map(bus_event).collect::<Result<Vec<_>>>()?;

    write_records(paths::SUMMARY_BUS_BY_DAY, &mean_delays_by_weekday(&bus_events))?;
    write_records(paths::SUMMARY_BUS_BY_DATE, &delay_time_by_date(&bus_events))?;
    write_records(paths::SUMMARY_BUS_BY_INCIDENT, &delays_by_incident(&bus_events))?;

    let subway: Vec<ClassifiedSubwayRow> = read_records(paths::CLASSIFIED_SUBWAY_STATS)?;
    let subway_events = subway.iter().map(subway_event).collect::<Result<Vec<_>>>()?;

    write_records(paths::SUMMARY_SUBWAY_BY_DAY, &mean_delays_by_weekday(&subway_events))?;
    write_records(paths::SUMMARY_SUBWAY_BY_DATE, &delay_time_by_date(&subway_events))?;
    write_records(paths::SUMMARY_SUBWAY_BY_INCIDENT, &delays_by_incident(&subway_events))?;
    write_records(paths::SUMMARY_SUBWAY_BY_LINE, &delays_by_line(&subway_events))?;

    let report = Report {
        bus_events: bus_events.len(),
        subway_events: subway_events.len(),
        tables_written: 7,
    };
    info!(bus = report.bus_events, subway = report.subway_events, "Summaries written");
    print_json(&report)?;

    Ok(())
}

fn bus_event(row: &ClassifiedBusRow) -> Result<DelayEvent> {
    Ok(DelayEvent {
        date: parse_date(&row.date)?,
        day: row.day,
        min_delay: row.min_delay,
        incident: row.incident,
        line: None,
    })
}

fn subway_event(row: &ClassifiedSubwayRow) -> Result<DelayEvent> {
    Ok(DelayEvent {
        date: parse_date(&row.date)?,
        day: row.day,
        min_delay: row.min_delay,
        incident: Some(row.incident),
        line: Some(row.line.clone()),
    })
}

/// Mean number of delay events per weekday, averaged over the calendar
/// dates sharing that weekday. All seven days are emitted Monday-first;
/// a day with no observations reports 0.0.
pub fn mean_delays_by_weekday(events: &[DelayEvent]) -> Vec<WeekdayMeanRow> {
    let mut per_date: BTreeMap<(NaiveDate, Weekday), usize> = BTreeMap::new();
    for event in events {
        *per_date.entry((event.date, event.day)).or_default() += 1;
    }

    let mut counts: HashMap<Weekday, Vec<f64>> = HashMap::new();
    for ((_, day), n) in &per_date {
        counts.entry(*day).or_default().push(*n as f64);
    }

    Weekday::ALL
        .iter()
        .map(|day| WeekdayMeanRow {
            day: *day,
            mean_num_delays: counts.get(day).map(|values| mean(values)).unwrap_or(0.0),
        })
        .collect()
}

/// Total and mean delay minutes per calendar date, date-ascending.
pub fn delay_time_by_date(events: &[DelayEvent]) -> Vec<DateDelayRow> {
    let mut per_date: BTreeMap<(NaiveDate, Weekday), (i64, usize)> = BTreeMap::new();
    for event in events {
        let entry = per_date.entry((event.date, event.day)).or_default();
        entry.0 += event.min_delay;
        entry.1 += 1;
    }

    per_date
        .into_iter()
        .map(|((date, day), (total, n))| DateDelayRow {
            date,
            day,
            total_delay_time: total,
            n,
            mean_delay_time: total as f64 / n as f64,
        })
        .collect()
}

/// Delay event counts per canonical incident category, label-alphabetical.
/// Events with a missing incident are excluded from this table only.
pub fn delays_by_incident(events: &[DelayEvent]) -> Vec<IncidentCountRow> {
    let mut counts: BTreeMap<&'static str, (Incident, usize)> = BTreeMap::new();
    for event in events {
        if let Some(incident) = event.incident {
            counts.entry(incident.label()).or_insert((incident, 0)).1 += 1;
        }
    }

    counts
        .into_values()
        .map(|(incident, n)| IncidentCountRow { incident, n })
        .collect()
}

/// Delay event counts per normalized line, line-alphabetical.
pub fn delays_by_line(events: &[DelayEvent]) -> Vec<LineCountRow> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        if let Some(line) = &event.line {
            *counts.entry(line.as_str()).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(line, n)| LineCountRow { line: line.to_string(), n })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
