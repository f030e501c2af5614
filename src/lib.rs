// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Daktela Extractor
//!
//! Extracts records from a Daktela CRM/contact-center instance (API v6) and
//! materializes them as warehouse-ready CSV tables with JSON manifests.
//!
//! ## Features
//!
//! - **Memory-bounded streaming**: collections page through the pipeline one
//!   page at a time; no table's result set is ever held in memory
//! - **Parent/child fan-out**: child tables (`activities_email`, ...) are
//!   driven by parent ids discovered during the parent's streaming pass
//! - **Deterministic compound keys**: `[server, id]` primary keys stay
//!   stable across repeated and incremental runs
//! - **Bounded retries**: transient API failures back off exponentially and
//!   give up loudly after a fixed attempt budget
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use daktela_extractor::{
//!     client::DaktelaClient,
//!     engine::{Engine, EngineConfig},
//!     plan,
//!     sink::CsvSink,
//!     types::LoadMode,
//!     Result,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let specs = plan::plan(&["activities", "activities_email"])?;
//!
//!     let mut client = DaktelaClient::new("https://acme.daktela.com");
//!     client.login("user", "secret").await?;
//!
//!     let sink = CsvSink::new("out/tables", "acme")?;
//!     let window = daktela_extractor::daterange::window("-7", "today")?;
//!     let config = EngineConfig {
//!         server: "acme".to_string(),
//!         window,
//!         mode: LoadMode::Full,
//!         page_size: 1000,
//!     };
//!
//!     let mut engine = Engine::new(&client, &sink, config);
//!     let stats = engine.run(&specs).await?;
//!     println!("{} rows extracted", stats.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Engine                               │
//! │  plan(tables) → ordered TableSpecs → per table:                 │
//! │  fetch page → transform record → write row → next page          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬────────────┬──────┴──────┬─────────────┬─────────────┐
//! │   Plan   │   Client   │  Transform  │   Keygen    │    Sink     │
//! ├──────────┼────────────┼─────────────┼─────────────┼─────────────┤
//! │ Parents  │ Login      │ Flatten     │ MD5 over    │ CSV file    │
//! │ before   │ skip/take  │ Select      │ server +    │ + manifest  │
//! │ children │ Retry      │ Explode     │ natural key │ full/incr.  │
//! │          │ Rate limit │ Prefix      │             │             │
//! └──────────┴────────────┴─────────────┴─────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the extractor
pub mod error;

/// Common types and type aliases
pub mod types;

/// Date range resolution
pub mod daterange;

/// Compound primary key generation
pub mod keygen;

/// Table specifications and the built-in registry
pub mod tables;

/// Extraction planning and dependency ordering
pub mod plan;

/// HTTP client with retry and rate limiting
pub mod http;

/// Offset pagination
pub mod pagination;

/// Daktela API v6 client
pub mod client;

/// Record transformation
pub mod transform;

/// Table sinks (CSV + manifest, in-memory)
pub mod sink;

/// Extraction engine
pub mod engine;

/// Extraction configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
