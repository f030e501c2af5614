//! CSV sink
//!
//! Writes one headerless CSV file per table, named `{server}_{table}.csv`,
//! next to a `.manifest` JSON declaring the column order and primary key.
//! Downstream loaders read the manifest, never the file, for structure.
//!
//! Columns grow append-only: when a later row reveals a field no earlier row
//! had (passthrough tables), the new column joins the end of the manifest
//! order and earlier rows simply stay short. The writer is flexible about
//! record length for exactly that reason.

use super::{Manifest, RowWriter, TableSink};
use crate::error::{Error, Result};
use crate::types::{value_to_string, LoadMode, OutputRow};
use csv::WriterBuilder;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sink producing `{server}_{table}.csv` + manifest pairs in one directory
pub struct CsvSink {
    dir: PathBuf,
    server: String,
}

impl CsvSink {
    /// Create a sink rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>, server: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            server: server.into(),
        })
    }

    /// Path of the CSV file for a table
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", self.server, table))
    }

    /// Path of the manifest for a table
    pub fn manifest_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.csv.manifest", self.server, table))
    }
}

impl TableSink for CsvSink {
    fn open(&self, table: &str, mode: LoadMode) -> Result<Box<dyn RowWriter>> {
        let path = self.table_path(table);
        let manifest_path = self.manifest_path(table);

        // Appending must keep the column positions of the previous run, so
        // the prior manifest seeds the column order.
        let mut columns: Vec<String> = Vec::new();
        if mode.is_incremental() && manifest_path.exists() {
            let file = File::open(&manifest_path)?;
            let previous: Manifest = serde_json::from_reader(file)?;
            columns = previous.columns;
        }

        let file = if mode.is_incremental() {
            OpenOptions::new().create(true).append(true).open(&path)?
        } else {
            File::create(&path)?
        };

        debug!("Opened {} for {mode:?} load", path.display());

        let writer = WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(BufWriter::new(file));

        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Ok(Box::new(CsvRowWriter {
            writer,
            columns,
            index,
            manifest_path,
            mode,
            rows_written: 0,
        }))
    }
}

/// Writer for one open CSV table
struct CsvRowWriter {
    writer: csv::Writer<BufWriter<File>>,
    columns: Vec<String>,
    index: HashMap<String, usize>,
    manifest_path: PathBuf,
    mode: LoadMode,
    rows_written: u64,
}

impl RowWriter for CsvRowWriter {
    fn write(&mut self, row: &OutputRow) -> Result<()> {
        for name in row.column_names() {
            if !self.index.contains_key(name) {
                self.index.insert(name.to_string(), self.columns.len());
                self.columns.push(name.to_string());
            }
        }

        let mut record = vec![String::new(); self.columns.len()];
        for (name, value) in row.iter() {
            record[self.index[name]] = value_to_string(value);
        }

        self.writer.write_record(&record)?;
        self.rows_written += 1;
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<Manifest> {
        self.writer
            .flush()
            .map_err(|e| Error::output(format!("flush failed: {e}")))?;

        let manifest = Manifest::new(self.columns.clone(), self.mode);
        let file = File::create(&self.manifest_path)?;
        serde_json::to_writer_pretty(file, &manifest)?;

        debug!(
            "Closed {} after {} rows",
            self.manifest_path.display(),
            self.rows_written
        );
        Ok(manifest)
    }
}
