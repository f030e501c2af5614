//! Daktela API v6 client
//!
//! # Overview
//!
//! - `DaktelaClient` - token login plus page-at-a-time collection access
//! - `TableFetcher` - lazy, finite fetcher over one filtered collection
//! - `Filter` / `Page` - wire-level types
//!
//! The fetcher is the memory-bounded piece: it yields one page of raw
//! records per call and retains nothing but the offset between calls, so a
//! multi-million-record table streams through a constant footprint. It is
//! not restartable; build a fresh one to re-read a window.

mod types;

pub use types::{encode_filters, Filter, Page};

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{OffsetPager, PageState};
use crate::types::{JsonValue, RawRecord};
use tracing::{debug, info};

/// Records per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Authenticated client for one Daktela instance
pub struct DaktelaClient {
    http: HttpClient,
    access_token: Option<String>,
}

impl DaktelaClient {
    /// Create a client for the given base URL with default HTTP settings
    pub fn new(base_url: &str) -> Self {
        let http = HttpClient::with_config(
            HttpClientConfig::builder()
                .base_url(base_url.trim_end_matches('/'))
                .build(),
        );
        Self::with_http(http)
    }

    /// Create a client over a pre-configured HTTP client
    pub fn with_http(http: HttpClient) -> Self {
        Self {
            http,
            access_token: None,
        }
    }

    /// Exchange credentials for an access token.
    ///
    /// Fails with an authentication error on any rejection; a token must be
    /// in hand before any collection is fetched.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let params = vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
            ("only_token".to_string(), "1".to_string()),
        ];

        let body: JsonValue = match self.http.post_json("api/v6/login.json", &params).await {
            Ok(body) => body,
            Err(Error::Request { status, body }) => {
                return Err(Error::auth(format!(
                    "Invalid response from the server (HTTP {status}): {body}. Make sure your credentials are correct."
                )));
            }
            Err(e) => return Err(e),
        };

        // The v6 API wraps the token in an object; older instances return it
        // as a bare string.
        let token = match body.get("result") {
            Some(JsonValue::String(token)) => Some(token.clone()),
            Some(JsonValue::Object(result)) => result
                .get("accessToken")
                .and_then(JsonValue::as_str)
                .map(ToString::to_string),
            _ => None,
        };

        match token {
            Some(token) if !token.is_empty() => {
                self.access_token = Some(token);
                info!("Successfully authenticated with the Daktela API");
                Ok(())
            }
            _ => Err(Error::auth("Token received was invalid or empty")),
        }
    }

    /// Check whether a login has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Fetch one page of a collection
    pub(crate) async fn get_page(&self, path: &str, query: &[(String, String)]) -> Result<Page> {
        let mut query = query.to_vec();
        if let Some(token) = &self.access_token {
            query.push(("accessToken".to_string(), token.clone()));
        }

        let envelope: types::Envelope = self.http.get_json(path, &query).await?;
        Ok(envelope.into())
    }

    /// Lazy fetcher over one table endpoint
    pub fn fetch_table(
        &self,
        endpoint: &str,
        filters: &[Filter],
        fields: &[String],
        page_size: u32,
    ) -> TableFetcher<'_> {
        let mut base_query = Vec::new();
        if !filters.is_empty() {
            base_query.push(("filter".to_string(), encode_filters(filters)));
        }
        if !fields.is_empty() {
            base_query.push(("fields".to_string(), fields.join(",")));
        }

        TableFetcher {
            client: self,
            path: format!("api/v6/{endpoint}.json"),
            base_query,
            pager: OffsetPager::new(page_size),
            state: PageState::new(),
        }
    }

    /// Lazy fetcher over one parent record's child collection
    pub fn fetch_children(
        &self,
        parent_endpoint: &str,
        parent_id: &str,
        segment: &str,
        page_size: u32,
    ) -> TableFetcher<'_> {
        TableFetcher {
            client: self,
            path: format!("api/v6/{parent_endpoint}/{parent_id}/{segment}.json"),
            base_query: Vec::new(),
            pager: OffsetPager::new(page_size),
            state: PageState::new(),
        }
    }
}

impl std::fmt::Debug for DaktelaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaktelaClient")
            .field("authenticated", &self.access_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Lazy sequence of raw records over one collection.
///
/// Yields one page per call and keeps only the continuation offset between
/// calls. Finite: returns `None` once the collection is exhausted.
pub struct TableFetcher<'a> {
    client: &'a DaktelaClient,
    path: String,
    base_query: Vec<(String, String)>,
    pager: OffsetPager,
    state: PageState,
}

impl TableFetcher<'_> {
    /// Fetch the next page of records, or `None` when done
    pub async fn next_page(&mut self) -> Result<Option<Vec<RawRecord>>> {
        if self.state.done {
            return Ok(None);
        }

        let mut query = self.base_query.clone();
        query.extend(self.pager.params(&self.state));

        let page = self.client.get_page(&self.path, &query).await?;
        let count = page.records.len();
        self.pager.advance(&mut self.state, count, page.total);

        debug!(
            "Fetched page {} of {}: {count} records",
            self.state.pages, self.path
        );

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(page.records))
    }

    /// Pagination progress so far
    pub fn state(&self) -> &PageState {
        &self.state
    }
}
