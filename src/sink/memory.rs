//! In-memory sink
//!
//! Collects rows per table instead of persisting them. Used by engine tests
//! and anywhere a dry run needs to observe the row stream.

use super::{Manifest, RowWriter, TableSink};
use crate::error::Result;
use crate::types::{LoadMode, OutputRow};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One collected table
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    /// Rows in write order
    pub rows: Vec<OutputRow>,
    /// Manifest produced at close, if the table was closed
    pub manifest: Option<Manifest>,
}

/// Sink that keeps everything in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: Arc<Mutex<HashMap<String, MemoryTable>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one collected table
    pub fn table(&self, name: &str) -> Option<MemoryTable> {
        self.tables.lock().expect("sink lock poisoned").get(name).cloned()
    }

    /// Rows collected for one table, empty if never opened
    pub fn rows(&self, name: &str) -> Vec<OutputRow> {
        self.table(name).map(|t| t.rows).unwrap_or_default()
    }

    /// Names of all opened tables
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .tables
            .lock()
            .expect("sink lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }
}

impl TableSink for MemorySink {
    fn open(&self, table: &str, mode: LoadMode) -> Result<Box<dyn RowWriter>> {
        {
            let mut tables = self.tables.lock().expect("sink lock poisoned");
            let entry = tables.entry(table.to_string()).or_default();
            if !mode.is_incremental() {
                entry.rows.clear();
            }
            entry.manifest = None;
        }

        Ok(Box::new(MemoryRowWriter {
            tables: Arc::clone(&self.tables),
            table: table.to_string(),
            mode,
        }))
    }
}

struct MemoryRowWriter {
    tables: Arc<Mutex<HashMap<String, MemoryTable>>>,
    table: String,
    mode: LoadMode,
}

impl RowWriter for MemoryRowWriter {
    fn write(&mut self, row: &OutputRow) -> Result<()> {
        self.tables
            .lock()
            .expect("sink lock poisoned")
            .entry(self.table.clone())
            .or_default()
            .rows
            .push(row.clone());
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<Manifest> {
        let mut tables = self.tables.lock().expect("sink lock poisoned");
        let entry = tables.entry(self.table.clone()).or_default();

        // Column order is first-seen across all rows, like the CSV sink
        let mut columns: Vec<String> = Vec::new();
        for row in &entry.rows {
            for name in row.column_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }

        let manifest = Manifest::new(columns, self.mode);
        entry.manifest = Some(manifest.clone());
        Ok(manifest)
    }
}
