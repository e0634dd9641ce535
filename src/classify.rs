//! Incident classification and line normalization.
//!
//! Bus incidents are mapped through a fixed literal lookup; subway delay
//! codes are classified by textual prefix and then inner-joined against
//! the delay records. Both paths drop unknown values silently: bus rows
//! keep a missing incident, subway rows without a classified code are
//! omitted entirely.

use crate::output::{read_records, write_records};
use crate::paths;
use crate::records::{
    BusDelayRow, ClassifiedBusRow, ClassifiedCodeRow, ClassifiedSubwayRow, CodeRow, Incident,
    SubwayDelayRow, Weekday,
};
use anyhow::{Result, ensure};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// The fixed mapping from reported bus incident text to the canonical
/// categories. Text absent from this table classifies as missing.
static BUS_INCIDENT_MAP: &[(&str, Incident)] = &[
    ("Diversion", Incident::Miscellaneous),
    ("Security", Incident::SecuritySafety),
    ("Cleaning - Unsanitary", Incident::SecuritySafety),
    ("Emergency Services", Incident::SecuritySafety),
    ("Collision - TTC", Incident::Operator),
    ("Mechanical", Incident::EquipmentMechanical),
    ("Operations - Operator", Incident::Operator),
    ("Investigation", Incident::SecuritySafety),
    ("Utilized Off Route", Incident::Miscellaneous),
    ("General Delay", Incident::Miscellaneous),
    ("Road Blocked - NON-TTC Collision", Incident::Miscellaneous),
    ("Held By", Incident::Miscellaneous),
    ("Vision", Incident::SecuritySafety),
];

/// Alias table for the subway line column. Unmapped spellings become
/// "Other".
static LINE_ALIASES: &[(&str, &str)] = &[
    ("YU", "Yonge-University"),
    ("YUS", "Yonge-University"),
    ("BD", "Bloor-Danforth"),
    ("BD LINE 2", "Bloor-Danforth"),
    ("SRT", "Scarborough-RT"),
    ("SHP", "Sheppard"),
    ("YU / BD", "Yonge-University/Bloor-Danforth"),
    ("BD/YU", "Yonge-University/Bloor-Danforth"),
    ("YU/BD", "Yonge-University/Bloor-Danforth"),
    ("YUS/BD", "Yonge-University/Bloor-Danforth"),
    ("YU & BD", "Yonge-University/Bloor-Danforth"),
    ("BLOOR DANFORTH & YONGE", "Yonge-University/Bloor-Danforth"),
];

/// Runs the classifier over the cleaned tables at their fixed paths.
pub fn run() -> Result<()> {
    let bus: Vec<BusDelayRow> = read_records(paths::CLEANED_BUS_STATS)?;
    let classified_bus = classify_bus(bus);
    validate_bus(&classified_bus)?;
    write_records(paths::CLASSIFIED_BUS_STATS, &classified_bus)?;
    info!(rows = classified_bus.len(), "Classified bus delay table written");

    let codes: Vec<CodeRow> = read_records(paths::SUBWAY_CODE_MAP)?;
    let classified_codes = classify_codes(codes);
    write_records(paths::CLASSIFIED_SUBWAY_CODES, &classified_codes)?;
    info!(rows = classified_codes.len(), "Classified code table written");

    let subway: Vec<SubwayDelayRow> = read_records(paths::CLEANED_SUBWAY_STATS)?;
    let joined = subway.len();
    let classified_subway = classify_subway(subway, &classified_codes);
    validate_subway(&classified_subway)?;
    write_records(paths::CLASSIFIED_SUBWAY_STATS, &classified_subway)?;
    info!(
        rows = classified_subway.len(),
        dropped = joined - classified_subway.len(),
        "Classified subway delay table written"
    );

    Ok(())
}

/// Maps one reported bus incident text to its canonical category.
pub fn map_bus_incident(text: &str) -> Option<Incident> {
    BUS_INCIDENT_MAP
        .iter()
        .find(|(known, _)| *known == text)
        .map(|(_, incident)| *incident)
}

/// Classifies a subway delay code by prefix. Rules are evaluated in
/// order; the three-letter MU prefixes must stay ahead of the looser
/// single-letter rules.
pub fn classify_code(code: &str) -> Incident {
    if code.starts_with('E') {
        return Incident::EquipmentMechanical;
    }
    if ["MUI", "MUS", "MUP"].iter().any(|p| code.starts_with(p)) {
        return Incident::SecuritySafety;
    }
    if code.starts_with("MUD") || code.starts_with("MUE") {
        return Incident::EquipmentMechanical;
    }
    if code.starts_with('P') {
        return Incident::EquipmentMechanical;
    }
    if code.starts_with('S') {
        return Incident::SecuritySafety;
    }
    if code.starts_with('T') {
        return Incident::Operator;
    }
    Incident::Miscellaneous
}

/// Maps a raw line spelling to its canonical name, or "Other".
pub fn normalize_line(raw: &str) -> String {
    LINE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == raw)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| "Other".to_string())
}

pub fn classify_bus(rows: Vec<BusDelayRow>) -> Vec<ClassifiedBusRow> {
    rows.into_iter()
        .map(|row| ClassifiedBusRow {
            date: row.date,
            time: row.time,
            day: row.day,
            incident: map_bus_incident(&row.incident),
            min_delay: row.min_delay,
            min_gap: row.min_gap,
        })
        .collect()
}

pub fn classify_codes(rows: Vec<CodeRow>) -> Vec<ClassifiedCodeRow> {
    rows.into_iter()
        .map(|row| ClassifiedCodeRow {
            incident: classify_code(&row.code),
            code: row.code,
            code_description: row.code_description,
        })
        .collect()
}

/// Inner-joins subway delay records against the classified code table,
/// normalizes line names, and sorts by (date, time) ascending. Records
/// whose code has no classification are dropped.
pub fn classify_subway(
    rows: Vec<SubwayDelayRow>,
    codes: &[ClassifiedCodeRow],
) -> Vec<ClassifiedSubwayRow> {
    let lookup: HashMap<&str, Incident> = codes
        .iter()
        .map(|code| (code.code.as_str(), code.incident))
        .collect();

    let mut classified: Vec<ClassifiedSubwayRow> = rows
        .into_iter()
        .filter_map(|row| {
            let incident = *lookup.get(row.code.as_str())?;
            Some(ClassifiedSubwayRow {
                date: row.date,
                time: row.time,
                day: row.day,
                incident,
                min_delay: row.min_delay,
                min_gap: row.min_gap,
                line: normalize_line(&row.line),
            })
        })
        .collect();

    classified.sort_by(|a, b| {
        (a.date.as_str(), a.time.as_str()).cmp(&(b.date.as_str(), b.time.as_str()))
    });

    classified
}

fn validate_bus(rows: &[ClassifiedBusRow]) -> Result<()> {
    let days: HashSet<Weekday> = rows.iter().map(|row| row.day).collect();
    ensure!(days.len() == 7, "expected 7 distinct weekdays, found {}", days.len());
    for row in rows {
        ensure!(row.min_delay >= 0, "negative min_delay {}", row.min_delay);
    }
    // Incident subset of the canonical categories holds by construction
    Ok(())
}

fn validate_subway(rows: &[ClassifiedSubwayRow]) -> Result<()> {
    let days: HashSet<Weekday> = rows.iter().map(|row| row.day).collect();
    ensure!(days.len() == 7, "expected 7 distinct weekdays, found {}", days.len());
    for row in rows {
        ensure!(row.min_delay >= 0, "negative min_delay {}", row.min_delay);
    }

    let incidents: HashSet<Incident> = rows.iter().map(|row| row.incident).collect();
    ensure!(
        incidents.len() == Incident::ALL.len(),
        "subway incidents must cover all {} categories, found {}",
        Incident::ALL.len(),
        incidents.len()
    );

    Ok(())
}
