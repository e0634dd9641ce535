//! Core record types shared across the pipeline stages.
//!
//! Cleaned and classified tables are read and written as typed rows via
//! serde; field order on the structs is the CSV column order.

use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar days, declared in canonical presentation order (Monday first).
///
/// The declaration order drives summary output so all seven days appear
/// in a fixed order even when a day has no observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four canonical delay-cause categories that unify the subway code
/// scheme and the bus incident-text scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Incident {
    #[serde(rename = "Equipment/Mechanical")]
    EquipmentMechanical,
    #[serde(rename = "Miscellaneous")]
    Miscellaneous,
    #[serde(rename = "Security/Safety")]
    SecuritySafety,
    #[serde(rename = "Operator")]
    Operator,
}

impl Incident {
    pub const ALL: [Incident; 4] = [
        Incident::EquipmentMechanical,
        Incident::Miscellaneous,
        Incident::SecuritySafety,
        Incident::Operator,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Incident::EquipmentMechanical => "Equipment/Mechanical",
            Incident::Miscellaneous => "Miscellaneous",
            Incident::SecuritySafety => "Security/Safety",
            Incident::Operator => "Operator",
        }
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A cleaned bus delay record, incident still as the raw reported text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusDelayRow {
    pub date: String,
    pub time: String,
    pub day: Weekday,
    pub incident: String,
    pub min_delay: i64,
    pub min_gap: i64,
}

/// A bus delay record after classification. Incident text with no entry in
/// the lookup table becomes `None` and serializes as an empty field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedBusRow {
    pub date: String,
    pub time: String,
    pub day: Weekday,
    pub incident: Option<Incident>,
    pub min_delay: i64,
    pub min_gap: i64,
}

/// A cleaned subway delay record, still keyed by the raw delay code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubwayDelayRow {
    pub date: String,
    pub time: String,
    pub day: Weekday,
    pub code: String,
    pub min_delay: i64,
    pub min_gap: i64,
    pub line: String,
}

/// A subway delay record joined against the classified code table, with
/// the line name normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedSubwayRow {
    pub date: String,
    pub time: String,
    pub day: Weekday,
    pub incident: Incident,
    pub min_delay: i64,
    pub min_gap: i64,
    pub line: String,
}

/// One entry of the merged code-to-description mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRow {
    pub code: String,
    pub code_description: String,
}

/// A delay code annotated with its canonical incident category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedCodeRow {
    pub code: String,
    pub code_description: String,
    pub incident: Incident,
}

/// Parses the date formats seen in the raw exports: plain dates, datetime
/// stamps, and US-style slashed dates.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    // Datetime stamps: keep the calendar date, drop the time part
    if let Some(prefix) = value.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(date);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%m/%d/%Y") {
        return Ok(date);
    }
    bail!("unrecognized date format: {value:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_order_is_monday_first() {
        assert_eq!(Weekday::ALL[0], Weekday::Monday);
        assert_eq!(Weekday::ALL[6], Weekday::Sunday);
        assert!(Weekday::Monday < Weekday::Sunday);
    }

    #[test]
    fn test_incident_labels() {
        assert_eq!(Incident::EquipmentMechanical.label(), "Equipment/Mechanical");
        assert_eq!(Incident::SecuritySafety.to_string(), "Security/Safety");
        assert_eq!(Incident::ALL.len(), 4);
    }

    #[test]
    fn test_parse_date_plain() {
        let date = parse_date("2023-01-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_with_time_part() {
        let date = parse_date("2023-01-15 00:00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_slashed() {
        let date = parse_date("1/15/2023").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_garbage() {
        assert!(parse_date("not a date").is_err());
    }
}
