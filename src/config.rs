//! Extraction configuration
//!
//! Deserialized from a JSON file handed over by the surrounding platform.
//! Validation is eager: url/server presence and shape, the date window and
//! the table list are all checked before a single network call goes out.

use crate::client::DEFAULT_PAGE_SIZE;
use crate::daterange;
use crate::error::{Error, Result};
use crate::types::LoadMode;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^./]+\.daktela\.com/?$").expect("valid pattern"));

static SERVER_FROM_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://([^./]+)\.daktela\.com").expect("valid pattern"));

/// Parameters of one extraction run
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    /// API username
    pub username: String,
    /// API password (secret; never logged)
    pub password: String,
    /// Full instance URL, `https://{server}.daktela.com`
    #[serde(default)]
    pub url: Option<String>,
    /// Instance name; alternative to `url`
    #[serde(default)]
    pub server: Option<String>,
    /// Window start expression
    pub from: String,
    /// Window end expression
    pub to: String,
    /// Comma-separated table names, case-insensitive; unknown names extract
    /// generically
    pub tables: String,
    /// Append to prior output instead of replacing it
    #[serde(default)]
    pub incremental: bool,
    /// Raise log verbosity to debug
    #[serde(default)]
    pub debug: bool,
    /// Records per fetched page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl ExtractionConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| Error::config(format!("invalid config {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that can fail before the first network call
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::config("'username' must not be empty"));
        }
        if self.url.is_none() && self.server.is_none() {
            return Err(Error::config(
                "either 'url' or 'server' must be provided",
            ));
        }
        if let Some(url) = self.url.as_deref() {
            if !url.trim().is_empty() && !URL_PATTERN.is_match(url.trim()) {
                return Err(Error::config(format!(
                    "invalid url '{url}', expected https://{{server}}.daktela.com"
                )));
            }
        }
        if self.page_size == 0 {
            return Err(Error::config("'page_size' must be positive"));
        }
        if self.table_list().is_empty() {
            return Err(Error::config("'tables' must name at least one table"));
        }
        self.window()?;
        self.server_name()?;
        url::Url::parse(&self.base_url())?;
        Ok(())
    }

    /// Base URL of the instance
    pub fn base_url(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!(
                "https://{}.daktela.com",
                self.server.as_deref().unwrap_or_default()
            ),
        }
    }

    /// Server identity stamped onto every output row
    pub fn server_name(&self) -> Result<String> {
        if let Some(server) = self.server.as_deref() {
            if !server.trim().is_empty() {
                return Ok(server.trim().to_string());
            }
        }
        if let Some(url) = self.url.as_deref() {
            if let Some(captures) = SERVER_FROM_URL.captures(url.trim()) {
                return Ok(captures[1].to_string());
            }
        }
        Err(Error::config("could not derive the server name from the url"))
    }

    /// Requested table names, trimmed, empties dropped
    pub fn table_list(&self) -> Vec<String> {
        self.tables
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Resolve the extraction window
    pub fn window(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        daterange::window(&self.from, &self.to)
    }

    /// Load mode derived from the incremental flag
    pub fn load_mode(&self) -> LoadMode {
        LoadMode::from_incremental(self.incremental)
    }
}
