//! Fixed locations for every remote resource and on-disk table.
//!
//! The stages take no configuration; each one reads and writes these
//! paths, overwriting whatever a previous run left behind.

pub const SUBWAY_CODES_URL: &str = "https://ckan0.cf.opendata.inter.prod-toronto.ca/dataset/996cfe8d-fb35-40ce-b569-698d51fc683b/resource/3900e649-f31e-4b79-9f20-4731bbfd94f7/download/ttc-subway-delay-codes.xlsx";
pub const SUBWAY_STATS_URL: &str = "https://ckan0.cf.opendata.inter.prod-toronto.ca/dataset/996cfe8d-fb35-40ce-b569-698d51fc683b/resource/2fbec48b-33d9-4897-a572-96c9f002d66a/download/ttc-subway-delay-2023.xlsx";
pub const BUS_STATS_URL: &str = "https://ckan0.cf.opendata.inter.prod-toronto.ca/dataset/e271cdae-8788-4980-96ce-6a5c95bc6618/resource/10802a64-9ac0-4f2e-9538-04800a399d1e/download/ttc-bus-delay-data-2023.xlsx";

// Fetcher output
pub const RAW_SUBWAY_CODES: &str = "inputs/data/raw_subway_delay_codes.csv";
pub const RAW_SUBWAY_STATS: &str = "inputs/data/raw_subway_delay_statistics.csv";
pub const RAW_BUS_STATS: &str = "inputs/data/raw_bus_delay_statistics.csv";

// Cleaner output
pub const CLEANED_BUS_STATS: &str = "inputs/data/bus_delay_statistics.csv";
pub const CLEANED_SUBWAY_STATS: &str = "inputs/data/subway_delay_statistics.csv";
pub const FILTERED_SUBWAY_STATS: &str = "inputs/data/filtered_subway_delay_statistics.csv";
pub const SUBWAY_CODE_MAP: &str = "inputs/data/subway_delay_codes.csv";

// Classifier output
pub const CLASSIFIED_BUS_STATS: &str = "outputs/data/cleaned_bus_delay_statistics.csv";
pub const CLASSIFIED_SUBWAY_CODES: &str = "outputs/data/cleaned_subway_codes.csv";
pub const CLASSIFIED_SUBWAY_STATS: &str = "outputs/data/cleaned_subway_delay_statistics.csv";

// Simulator output
pub const SIM_SUBWAY_DELAYS: &str = "outputs/data/simulated_subway_delays.csv";
pub const SIM_BUS_DELAYS: &str = "outputs/data/simulated_bus_delays.csv";

// Summarizer output
pub const SUMMARY_BUS_BY_DAY: &str = "outputs/data/summaries/avg_num_bus_delays_by_day.csv";
pub const SUMMARY_SUBWAY_BY_DAY: &str = "outputs/data/summaries/avg_num_subway_delays_by_day.csv";
pub const SUMMARY_BUS_BY_DATE: &str = "outputs/data/summaries/total_bus_delay_time_by_date.csv";
pub const SUMMARY_SUBWAY_BY_DATE: &str = "outputs/data/summaries/total_subway_delay_time_by_date.csv";
pub const SUMMARY_BUS_BY_INCIDENT: &str = "outputs/data/summaries/total_num_bus_delays_by_incident.csv";
pub const SUMMARY_SUBWAY_BY_INCIDENT: &str = "outputs/data/summaries/total_num_subway_delays_by_incident.csv";
pub const SUMMARY_SUBWAY_BY_LINE: &str = "outputs/data/summaries/total_num_subway_delays_by_line.csv";
