//! Engine configuration, statistics and run summary types

use crate::types::LoadMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one extraction run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Server identity stamped onto every row
    pub server: String,
    /// Extraction window `[from, to)`
    pub window: (DateTime<Utc>, DateTime<Utc>),
    /// Full-replace or incremental-append
    pub mode: LoadMode,
    /// Records per fetched page
    pub page_size: u32,
}

/// Counters collected across one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionStats {
    /// Tables fully extracted
    pub tables_extracted: u64,
    /// Rows handed to the sink
    pub rows_written: u64,
    /// Pages fetched from the API
    pub pages_fetched: u64,
    /// Wall-clock duration of the run
    pub duration_ms: u64,
}

impl ExtractionStats {
    /// Record one completed table
    pub fn add_table(&mut self) {
        self.tables_extracted += 1;
    }

    /// Record written rows
    pub fn add_rows(&mut self, count: u64) {
        self.rows_written += count;
    }

    /// Record one fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Record the run duration
    pub fn set_duration(&mut self, elapsed: Duration) {
        self.duration_ms = elapsed.as_millis() as u64;
    }
}

/// Summary persisted after a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Completion time, `YYYY-MM-DD HH:MM:SS` UTC
    pub last_run: String,
    /// Tables the run extracted, in extraction order
    pub tables_extracted: Vec<String>,
}

impl RunState {
    /// Summarize a run finishing now
    pub fn new(tables_extracted: Vec<String>) -> Self {
        Self {
            last_run: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            tables_extracted,
        }
    }
}
