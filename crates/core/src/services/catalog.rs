//! External movie catalog client.
//!
//! Proxies search requests to the configured OMDb-style catalog API. This is
//! the only operation in the system that talks to the network, and the only
//! one that carries an explicit timeout; a slow catalog fails with a distinct
//! timeout error instead of hanging the request.

use cinevote_common::{AppError, AppResult, CatalogConfig};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;
use url::Url;

/// One movie summary returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMovie {
    /// Stable catalog identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Release year (may be a range for series).
    pub year: String,
    /// Poster URL, absent when the catalog has none.
    pub poster: Option<String>,
    /// Result type as reported by the catalog.
    #[serde(rename = "type")]
    pub kind: String,
}

/// One page of catalog search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    /// Result summaries for the requested page.
    pub movies: Vec<CatalogMovie>,
    /// Total matches reported by the catalog across all pages.
    pub total: u64,
}

/// Catalog search wire envelope.
#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search", default)]
    search: Vec<SearchItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: String,
    #[serde(rename = "Type")]
    kind: String,
}

/// Client for the external movie catalog.
#[derive(Clone, Debug)]
pub struct CatalogService {
    client: Client,
    api_url: Url,
    api_key: String,
}

impl CatalogService {
    /// Create a new catalog client from configuration.
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let api_url = Url::parse(&config.api_url)
            .map_err(|e| AppError::Config(format!("Invalid catalog URL: {e}")))?;

        let client = Client::builder()
            .user_agent(concat!("cinevote/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build catalog client: {e}")))?;

        Ok(Self {
            client,
            api_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Search the catalog for movies.
    ///
    /// A catalog "no matches" answer is an empty page, not an error. Timeouts
    /// and rejected credentials surface as their own error variants.
    pub async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        if query.trim().is_empty() {
            return Err(AppError::Validation("query must not be empty".to_string()));
        }
        if page == 0 {
            return Err(AppError::Validation("page must be positive".to_string()));
        }

        let page_param = page.to_string();
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("s", query),
                ("type", "movie"),
                ("page", page_param.as_str()),
            ])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let envelope: SearchEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Catalog(format!("Malformed catalog response: {e}")))?;

        page_from_envelope(envelope)
    }
}

/// Map a reqwest failure to the error taxonomy.
fn classify_transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        warn!("Catalog request timed out");
        AppError::CatalogTimeout
    } else {
        AppError::Catalog(err.to_string())
    }
}

/// Interpret the catalog envelope.
///
/// The catalog signals failures in-band: `Response: "False"` with an `Error`
/// message, even on HTTP 200.
fn page_from_envelope(envelope: SearchEnvelope) -> AppResult<CatalogPage> {
    if envelope.response.eq_ignore_ascii_case("true") {
        let movies = envelope
            .search
            .into_iter()
            .map(|item| CatalogMovie {
                id: item.imdb_id,
                title: item.title,
                year: item.year,
                poster: if item.poster == "N/A" {
                    None
                } else {
                    Some(item.poster)
                },
                kind: item.kind,
            })
            .collect::<Vec<_>>();

        let total = envelope
            .total_results
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(movies.len() as u64);

        return Ok(CatalogPage { movies, total });
    }

    let message = envelope
        .error
        .unwrap_or_else(|| "Unknown catalog failure".to_string());

    if message.contains("Invalid API key") {
        return Err(AppError::CatalogCredentials);
    }

    // "Movie not found!" is how the catalog reports an empty result set
    if message.contains("not found") {
        return Ok(CatalogPage {
            movies: Vec::new(),
            total: 0,
        });
    }

    Err(AppError::Catalog(message))
}
