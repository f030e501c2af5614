//! Command execution

use super::commands::{Cli, Commands};
use crate::client::DaktelaClient;
use crate::config::ExtractionConfig;
use crate::engine::{Engine, EngineConfig, RunState};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::plan;
use crate::sink::CsvSink;
use crate::tables;
use std::fs::File;
use tracing::info;

/// Executes the parsed CLI command
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Lenient pre-parse peek at the config's debug flag, used before the
    /// log subscriber is installed. Real config errors surface in `run`.
    pub fn config_requests_debug(cli: &Cli) -> bool {
        std::fs::read_to_string(&cli.config)
            .ok()
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(&raw).ok())
            .and_then(|value| value.get("debug").and_then(serde_json::Value::as_bool))
            .unwrap_or(false)
    }

    /// Dispatch the selected command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Tables => {
                for name in tables::names() {
                    println!("{name}");
                }
                Ok(())
            }
            Commands::Run {
                tables,
                incremental,
            } => self.extract(tables.clone(), *incremental).await,
        }
    }

    async fn check(&self) -> Result<()> {
        let config = ExtractionConfig::from_file(&self.cli.config)?;
        let mut client = self.connect(&config);
        client.login(&config.username, &config.password).await?;
        println!("Connection to {} OK", config.base_url());
        Ok(())
    }

    async fn extract(&self, tables_override: Option<String>, incremental: bool) -> Result<()> {
        let mut config = ExtractionConfig::from_file(&self.cli.config)?;
        if let Some(tables) = tables_override {
            config.tables = tables;
        }
        if incremental {
            config.incremental = true;
        }
        config.validate()?;

        let server = config.server_name()?;
        let window = config.window()?;
        let specs = plan::plan(&config.table_list())?;
        info!(
            "Extracting {} tables from {} between {} and {}",
            specs.len(),
            config.base_url(),
            window.0.format("%Y-%m-%d %H:%M:%S"),
            window.1.format("%Y-%m-%d %H:%M:%S"),
        );

        let mut client = self.connect(&config);
        client.login(&config.username, &config.password).await?;

        let sink = CsvSink::new(&self.cli.output, &server)?;
        let engine_config = EngineConfig {
            server,
            window,
            mode: config.load_mode(),
            page_size: config.page_size,
        };

        let mut engine = Engine::new(&client, &sink, engine_config);
        let stats = engine.run(&specs).await?;

        let state = RunState::new(specs.iter().map(|s| s.name.clone()).collect());
        let state_path = self.cli.output.join("state.json");
        serde_json::to_writer_pretty(File::create(&state_path)?, &state)?;

        println!(
            "Extracted {} rows across {} tables in {}ms",
            stats.rows_written, stats.tables_extracted, stats.duration_ms
        );
        Ok(())
    }

    fn connect(&self, config: &ExtractionConfig) -> DaktelaClient {
        DaktelaClient::with_http(HttpClient::with_config(
            HttpClientConfig::builder()
                .base_url(config.base_url())
                .build(),
        ))
    }
}
