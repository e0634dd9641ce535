use std::fs;

use ttc_delay_pipeline::classify::{classify_bus, classify_codes, classify_subway};
use ttc_delay_pipeline::clean::{clean_bus, clean_codes, clean_subway};
use ttc_delay_pipeline::output::{read_records, write_records};
use ttc_delay_pipeline::records::{BusDelayRow, Incident, SubwayDelayRow, Weekday};
use ttc_delay_pipeline::summarize::{
    DelayEvent, delay_time_by_date, delays_by_incident, delays_by_line, mean_delays_by_weekday,
};
use ttc_delay_pipeline::table::Table;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

const DAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

fn raw_subway_table() -> Table {
    let headers = strings(&[
        "Date", "Time", "Day", "Station", "Code", "Min Delay", "Min Gap", "Bound", "Line",
        "Vehicle",
    ]);

    // One row per weekday covering every classification prefix, plus a
    // zero-delay row and a row with an unknown code
    let cases: [(&str, &str, &str, &str, &str); 9] = [
        ("2023-01-02", "05:10", "E123", "10", "YU"),
        ("2023-01-03", "06:20", "MUIS1", "5", "YUS"),
        ("2023-01-04", "07:30", "MUD40", "4", "BD"),
        ("2023-01-05", "08:40", "P001", "3", "SRT"),
        ("2023-01-06", "09:50", "S123", "6", "SHP"),
        ("2023-01-07", "10:15", "T001", "7", "YU & BD"),
        ("2023-01-08", "11:25", "Z999", "8", "ZZZ"),
        ("2023-01-08", "12:00", "E123", "0", "YU"),
        ("2023-01-08", "13:00", "UNKNOWN", "9", "YU"),
    ];

    let rows = cases
        .iter()
        .enumerate()
        .map(|(i, (date, time, code, delay, line))| {
            strings(&[
                date,
                time,
                DAYS[i.min(6)],
                "Somewhere Stn",
                code,
                delay,
                "12",
                "N",
                line,
                "5001",
            ])
        })
        .collect();

    Table::new(headers, rows)
}

fn raw_code_table() -> Table {
    let headers = strings(&[
        "SUB RMENU CODE",
        "CODE DESCRIPTION",
        "SRT RMENU CODE",
        "CODE DESCRIPTION",
    ]);
    let rows = vec![
        strings(&["E123", "Escalator", "P001", "Power Off"]),
        strings(&["MUIS1", "Injured Customer", "S123", "Signal Issue"]),
        strings(&["MUD40", "Door Problem", "", ""]),
        strings(&["T001", "Operator Overcarried", "", ""]),
        strings(&["Z999", "Assorted", "", ""]),
    ];
    Table::new(headers, rows)
}

#[test]
fn subway_path_end_to_end() {
    let (cleaned, filtered) = clean_subway(raw_subway_table()).unwrap();

    // Zero-delay row present unfiltered, absent filtered
    assert_eq!(cleaned.rows.len(), 9);
    assert_eq!(filtered.rows.len(), 8);

    let codes = classify_codes(
        read_code_rows(clean_codes(raw_code_table()).unwrap()),
    );
    assert_eq!(codes.len(), 7);

    let rows: Vec<SubwayDelayRow> = table_to_records(&cleaned);
    let classified = classify_subway(rows, &codes);

    // The UNKNOWN-code row fell out of the inner join
    assert_eq!(classified.len(), 8);
    assert!(classified.windows(2).all(|pair| {
        (pair[0].date.as_str(), pair[0].time.as_str())
            <= (pair[1].date.as_str(), pair[1].time.as_str())
    }));

    // All four canonical categories are present
    let incidents: std::collections::HashSet<Incident> =
        classified.iter().map(|row| row.incident).collect();
    assert_eq!(incidents.len(), 4);

    // Line normalization applied
    assert!(classified.iter().any(|row| row.line == "Yonge-University"));
    assert!(classified.iter().any(|row| row.line == "Yonge-University/Bloor-Danforth"));
    assert!(classified.iter().any(|row| row.line == "Other"));

    // Per-line counts come out line-alphabetical
    let events: Vec<DelayEvent> = classified
        .iter()
        .map(|row| DelayEvent {
            date: ttc_delay_pipeline::records::parse_date(&row.date).unwrap(),
            day: row.day,
            min_delay: row.min_delay,
            incident: Some(row.incident),
            line: Some(row.line.clone()),
        })
        .collect();

    let by_line = delays_by_line(&events);
    let names: Vec<&str> = by_line.iter().map(|row| row.line.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let by_day = mean_delays_by_weekday(&events);
    assert_eq!(by_day.len(), 7);
    assert_eq!(by_day[0].day, Weekday::Monday);
}

#[test]
fn bus_path_end_to_end() {
    let headers = strings(&[
        "Date", "Route", "Time", "Day", "Location", "Incident", "Min Delay", "Min Gap",
        "Direction", "Vehicle",
    ]);
    // 2023-01-02 is a Monday; one row per day of that week
    let mut rows: Vec<Vec<String>> = DAYS
        .iter()
        .enumerate()
        .map(|(i, day)| {
            strings(&[
                &format!("2023-01-0{}", i + 2),
                "36",
                "02:00",
                day,
                "Finch Stn",
                "Mechanical",
                "10",
                "20",
                "N",
                "8637",
            ])
        })
        .collect();
    rows.push(strings(&[
        "2023-01-08", "52", "03:00", "Sunday", "Kipling Stn", "Late Entering Service", "20",
        "30", "E", "1110",
    ]));
    rows.push(strings(&[
        "2023-01-09", "52", "03:30", "Monday", "Kipling Stn", "Diversion", "0", "0", "E", "1110",
    ]));

    let cleaned = clean_bus(Table::new(headers, rows)).unwrap();
    // Zero-gap row dropped
    assert_eq!(cleaned.rows.len(), 8);

    let typed: Vec<BusDelayRow> = table_to_records(&cleaned);
    let classified = classify_bus(typed);

    // Unmapped incident text becomes missing, mapped text resolves
    assert_eq!(
        classified.iter().filter(|row| row.incident.is_none()).count(),
        1
    );
    assert!(
        classified
            .iter()
            .filter_map(|row| row.incident)
            .all(|incident| incident == Incident::EquipmentMechanical)
    );

    let events: Vec<DelayEvent> = classified
        .iter()
        .map(|row| DelayEvent {
            date: ttc_delay_pipeline::records::parse_date(&row.date).unwrap(),
            day: row.day,
            min_delay: row.min_delay,
            incident: row.incident,
            line: None,
        })
        .collect();

    // Seven dates; 2023-01-08 holds delays 10 and 20
    let by_date = delay_time_by_date(&events);
    assert_eq!(by_date.len(), 7);
    let sunday = by_date.last().unwrap();
    assert_eq!(sunday.day, Weekday::Sunday);
    assert_eq!(sunday.total_delay_time, 30);
    assert_eq!(sunday.n, 2);
    assert_eq!(sunday.mean_delay_time, 15.0);

    // The missing-incident event is excluded from the incident counts only
    let by_incident = delays_by_incident(&events);
    assert_eq!(by_incident.len(), 1);
    assert_eq!(by_incident[0].n, 7);
}

#[test]
fn cleaning_and_writing_are_idempotent() {
    let first = clean_subway(raw_subway_table()).unwrap().0;
    let second = clean_subway(raw_subway_table()).unwrap().0;
    assert_eq!(first, second);

    let dir = std::env::temp_dir();
    let path_a = format!("{}/ttc_pipeline_it_idem_a.csv", dir.display());
    let path_b = format!("{}/ttc_pipeline_it_idem_b.csv", dir.display());

    first.write_csv(&path_a).unwrap();
    second.write_csv(&path_b).unwrap();
    assert_eq!(fs::read(&path_a).unwrap(), fs::read(&path_b).unwrap());

    fs::remove_file(&path_a).unwrap();
    fs::remove_file(&path_b).unwrap();
}

#[test]
fn typed_rows_survive_a_csv_round_trip() {
    let path = format!(
        "{}/ttc_pipeline_it_round_trip.csv",
        std::env::temp_dir().display()
    );

    let rows = vec![SubwayDelayRow {
        date: "2023-01-02".into(),
        time: "05:10".into(),
        day: Weekday::Monday,
        code: "E123".into(),
        min_delay: 10,
        min_gap: 12,
        line: "YU".into(),
    }];

    write_records(&path, &rows).unwrap();
    let read: Vec<SubwayDelayRow> = read_records(&path).unwrap();
    assert_eq!(read[0].day, Weekday::Monday);
    assert_eq!(read[0].code, "E123");
    assert_eq!(read[0].min_delay, 10);

    fs::remove_file(&path).unwrap();
}

/// Deserializes an untyped cleaned table through CSV into typed rows,
/// the same way the on-disk handoff between stages works.
fn table_to_records<T: serde::de::DeserializeOwned>(table: &Table) -> Vec<T> {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static HANDOFF: AtomicUsize = AtomicUsize::new(0);

    let path = format!(
        "{}/ttc_pipeline_it_handoff_{}_{}.csv",
        std::env::temp_dir().display(),
        std::process::id(),
        HANDOFF.fetch_add(1, Ordering::Relaxed)
    );
    table.write_csv(&path).unwrap();
    let rows = read_records(&path).unwrap();
    fs::remove_file(&path).unwrap();
    rows
}

fn read_code_rows(table: Table) -> Vec<ttc_delay_pipeline::records::CodeRow> {
    table
        .rows
        .iter()
        .map(|row| ttc_delay_pipeline::records::CodeRow {
            code: row[0].clone(),
            code_description: row[1].clone(),
        })
        .collect()
}
