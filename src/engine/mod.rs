//! Extraction engine
//!
//! Runs an ordered plan table by table: pages stream out of the fetcher,
//! every record passes through the transformer, every row goes straight to
//! the sink. Nothing holds a table's full result set; the only per-table
//! state the engine keeps across the stream are the parent ids that child
//! tables will fan out over.
//!
//! Tables run sequentially in plan order, so a child never starts before its
//! parent has finished and flushed. Any table failure aborts the whole run;
//! downstream tables would otherwise extract against incomplete parents.

mod types;

pub use types::{EngineConfig, ExtractionStats, RunState};

use crate::client::{DaktelaClient, Filter};
use crate::daterange::API_DATETIME_FORMAT;
use crate::error::{Result, ResultExt};
use crate::keygen;
use crate::sink::TableSink;
use crate::tables::TableSpec;
use crate::transform::{record_field, RecordTransformer};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{info, warn};

/// Streams an extraction plan through transform into a sink
pub struct Engine<'a> {
    client: &'a DaktelaClient,
    sink: &'a dyn TableSink,
    config: EngineConfig,
    stats: ExtractionStats,
    parent_ids: HashMap<String, Vec<String>>,
    parent_seen: HashMap<String, HashSet<String>>,
}

impl<'a> Engine<'a> {
    /// Create an engine over an authenticated client and a sink
    pub fn new(client: &'a DaktelaClient, sink: &'a dyn TableSink, config: EngineConfig) -> Self {
        Self {
            client,
            sink,
            config,
            stats: ExtractionStats::default(),
            parent_ids: HashMap::new(),
            parent_seen: HashMap::new(),
        }
    }

    /// Statistics collected so far
    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Run the plan to completion.
    ///
    /// Specs must already be in dependency order (see `plan::plan`); the
    /// first failing table aborts the run.
    pub async fn run(&mut self, specs: &[TableSpec]) -> Result<ExtractionStats> {
        let start = Instant::now();

        // Parents whose ids must be collected while they stream, keyed to
        // the column the children address them by
        let tracked: HashMap<String, String> = specs
            .iter()
            .filter_map(|s| {
                s.parent
                    .as_ref()
                    .map(|p| (p.table.clone(), p.key_column.clone()))
            })
            .collect();

        for spec in specs {
            let result = if spec.is_child() {
                self.extract_child_table(spec).await
            } else {
                self.extract_table(spec, tracked.get(&spec.name).map(String::as_str))
                    .await
            };
            result.with_context(|| format!("table {}", spec.name))?;
            self.stats.add_table();
        }

        self.stats.set_duration(start.elapsed());
        info!(
            "Extraction finished: {} tables, {} rows, {} pages in {}ms",
            self.stats.tables_extracted,
            self.stats.rows_written,
            self.stats.pages_fetched,
            self.stats.duration_ms
        );
        Ok(self.stats.clone())
    }

    /// Extract one top-level table, optionally collecting parent ids for
    /// later child fan-out
    async fn extract_table(&mut self, spec: &TableSpec, track_key: Option<&str>) -> Result<()> {
        let start = Instant::now();
        info!("Table {}: started", spec.name);

        let filters = self.window_filters(spec);
        let server = self.config.server.clone();
        let transformer = RecordTransformer::new(&server, spec);
        let mut writer = self.sink.open(&spec.name, self.config.mode)?;

        let client = self.client;
        let mut fetcher =
            client.fetch_table(&spec.endpoint, &filters, &spec.columns, self.config.page_size);

        let mut rows_written = 0u64;
        let mut keyless = 0u64;

        while let Some(records) = fetcher.next_page().await? {
            self.stats.add_page();
            for record in &records {
                if let Some(key_column) = track_key {
                    match record_field(record, key_column) {
                        Some(id) => self.track_parent(&spec.name, id),
                        None => keyless += 1,
                    }
                }
                for row in transformer.transform(record, None) {
                    writer.write(&row)?;
                    rows_written += 1;
                }
            }
        }

        writer.close()?;
        self.stats.add_rows(rows_written);

        if keyless > 0 {
            warn!(
                "Table {}: {keyless} records without a usable key excluded from child fan-out",
                spec.name
            );
        }
        info!(
            "Table {}: finished. {rows_written} rows in {:?}",
            spec.name,
            start.elapsed()
        );
        Ok(())
    }

    /// Extract a child table, driven by the parent ids discovered during the
    /// parent's streaming pass
    async fn extract_child_table(&mut self, spec: &TableSpec) -> Result<()> {
        let Some(parent) = spec.parent.clone() else {
            return Ok(());
        };

        let start = Instant::now();
        let parent_ids = self
            .parent_ids
            .get(&parent.table)
            .cloned()
            .unwrap_or_default();

        if parent_ids.is_empty() {
            warn!("Table {}: no valid parent ids, skipping", spec.name);
            return Ok(());
        }

        info!(
            "Table {}: started. Fanning out over {} parent records",
            spec.name,
            parent_ids.len()
        );

        let server = self.config.server.clone();
        let transformer = RecordTransformer::new(&server, spec);
        let mut writer = self.sink.open(&spec.name, self.config.mode)?;

        let client = self.client;
        let mut rows_written = 0u64;

        for parent_id in &parent_ids {
            let parent_key = keygen::compound_key(&server, &[parent_id.as_str()]);
            let mut fetcher = client.fetch_children(
                &spec.endpoint,
                parent_id,
                &parent.segment,
                self.config.page_size,
            );

            while let Some(records) = fetcher.next_page().await? {
                self.stats.add_page();
                for record in &records {
                    for row in transformer.transform(record, Some(&parent_key)) {
                        writer.write(&row)?;
                        rows_written += 1;
                    }
                }
            }
        }

        writer.close()?;
        self.stats.add_rows(rows_written);

        info!(
            "Table {}: finished. {rows_written} rows in {:?}",
            spec.name,
            start.elapsed()
        );
        Ok(())
    }

    /// Window filters for a date-filterable table; the window is half-open
    fn window_filters(&self, spec: &TableSpec) -> Vec<Filter> {
        let Some(field) = &spec.date_field else {
            return Vec::new();
        };
        let (from, to) = self.config.window;
        vec![
            Filter::gte(field, from.format(API_DATETIME_FORMAT).to_string()),
            Filter::lt(field, to.format(API_DATETIME_FORMAT).to_string()),
        ]
    }

    /// Remember a parent id once, keeping discovery order
    fn track_parent(&mut self, table: &str, id: String) {
        let seen = self.parent_seen.entry(table.to_string()).or_default();
        if seen.insert(id.clone()) {
            self.parent_ids.entry(table.to_string()).or_default().push(id);
        }
    }
}
