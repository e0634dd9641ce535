pub mod classify;
pub mod clean;
pub mod fetch;
pub mod output;
pub mod paths;
pub mod records;
pub mod simulate;
pub mod summarize;
pub mod table;
pub mod xlsx;
