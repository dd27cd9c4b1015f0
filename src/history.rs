use std::io::Write;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::api::HistoryEntry;
use crate::util::mean;
use crate::view::one_decimal;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a backend timestamp.
///
/// The backend writes naive local ISO-8601 (`2024-05-01T10:20:30.123456`);
/// RFC 3339 with an offset is accepted too.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Local display form of a backend timestamp; unparseable input is shown as-is
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// One rendered row of the history table
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub when: String,
    pub reps: String,
    pub calories: String,
    pub duration: String,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            when: format_timestamp(&entry.timestamp),
            reps: entry.reps.to_string(),
            calories: one_decimal(entry.calories),
            duration: format!("{}s", one_decimal(entry.duration)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryTotals {
    pub sessions: usize,
    pub reps: u64,
    pub calories: f64,
    pub mean_duration: Option<f64>,
}

/// History as last fetched from the backend, in server order
#[derive(Debug, Clone, Default)]
pub struct HistoryTable {
    entries: Vec<HistoryEntry>,
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    /// Replace the whole table with a fresh fetch
    pub fn replace(&mut self, entries: Vec<HistoryEntry>) {
        self.rows = entries.iter().map(HistoryRow::from).collect();
        self.entries = entries;
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> Option<&HistoryEntry> {
        self.entries.get(idx)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn totals(&self) -> HistoryTotals {
        let durations: Vec<f64> = self.entries.iter().map(|e| e.duration).collect();
        HistoryTotals {
            sessions: self.entries.len(),
            reps: self.entries.iter().map(|e| e.reps as u64).sum(),
            calories: self.entries.iter().map(|e| e.calories).sum(),
            mean_duration: mean(&durations),
        }
    }
}

/// Write entries as CSV in the column order the backend stores them
pub fn write_csv<W: Write>(entries: &[HistoryEntry], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["timestamp", "reps", "calories", "duration", "summary"])?;
    for entry in entries {
        writer.write_record([
            entry.timestamp.clone(),
            entry.reps.to_string(),
            entry.calories.to_string(),
            entry.duration.to_string(),
            entry.summary.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
