//! Table sinks
//!
//! # Overview
//!
//! - `TableSink` / `RowWriter` - the streaming contract the engine writes
//!   through: open a table, push rows in production order, close to persist
//!   the manifest
//! - `Manifest` - column list plus the `[server, id]` primary key
//! - `CsvSink` - one headerless CSV + JSON manifest per table
//! - `MemorySink` - in-memory collector for tests
//!
//! Writers must not buffer more than a small bounded batch; the engine
//! hands rows over one at a time and relies on the sink to keep the
//! pipeline memory-bounded.

mod csv;
mod memory;

pub use self::csv::CsvSink;
pub use memory::{MemorySink, MemoryTable};

use crate::error::Result;
use crate::types::{LoadMode, OutputRow};
use serde::{Deserialize, Serialize};

/// Destination manifest persisted when a table closes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Output columns, in file order
    pub columns: Vec<String>,
    /// Primary key columns
    pub primary_key: Vec<String>,
    /// Whether the load appends to prior data
    pub incremental: bool,
    /// CSV field delimiter
    pub delimiter: String,
    /// CSV quote character
    pub enclosure: String,
}

impl Manifest {
    /// Manifest for a table keyed on `[server, id]`
    pub fn new(columns: Vec<String>, mode: LoadMode) -> Self {
        Self {
            columns,
            primary_key: vec!["server".to_string(), "id".to_string()],
            incremental: mode.is_incremental(),
            delimiter: ",".to_string(),
            enclosure: "\"".to_string(),
        }
    }
}

/// Destination for extracted tables
pub trait TableSink {
    /// Open a table for writing in the given mode. `Full` replaces whatever
    /// the destination held for the table; `Incremental` appends.
    fn open(&self, table: &str, mode: LoadMode) -> Result<Box<dyn RowWriter>>;
}

/// Writer for one open table
pub trait RowWriter {
    /// Write one row. Rows arrive in production order.
    fn write(&mut self, row: &OutputRow) -> Result<()>;

    /// Flush, persist the manifest and return it
    fn close(self: Box<Self>) -> Result<Manifest>;
}
