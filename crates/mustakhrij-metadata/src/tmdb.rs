//! TMDB-style metadata client

use std::time::Duration;

use mustakhrij_core::error::Error;
use mustakhrij_core::error::Result;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

/// Metadata API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// API key
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Result language
    pub language: String,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            language: "en-US".to_string(),
            timeout: 10,
        }
    }
}

impl TmdbConfig {
    /// Overlay the API key from `TMDB_API_KEY`
    pub fn from_env(&mut self) {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            self.api_key = key;
        }
    }
}

/// One search result
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    /// Numeric movie identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Release date, `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average vote
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

/// Movie detail with the credits/videos/recommendations sub-objects
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    /// Numeric movie identifier
    pub id: i64,
    /// Title
    pub title: String,
    /// Release date, `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// Genre list
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Average vote
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Credits sub-object
    #[serde(default)]
    pub credits: Option<Credits>,
    /// Videos sub-object
    #[serde(default)]
    pub videos: Option<Videos>,
    /// Recommendations sub-object
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
}

/// A genre entry
#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    /// Genre name
    pub name: String,
}

/// The credits sub-object
#[derive(Debug, Clone, Deserialize)]
pub struct Credits {
    /// Crew members
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// One crew member
#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    /// Person name
    pub name: String,
    /// Job title, e.g. `"Director"`
    pub job: String,
}

/// The videos sub-object
#[derive(Debug, Clone, Deserialize)]
pub struct Videos {
    /// Video entries
    #[serde(default)]
    pub results: Vec<Video>,
}

/// One video entry
#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    /// Hosting-site video key
    pub key: String,
    /// Hosting site, e.g. `"YouTube"`
    pub site: String,
    /// Video type, e.g. `"Trailer"`
    #[serde(rename = "type")]
    pub kind: String,
}

/// The recommendations sub-object
#[derive(Debug, Clone, Deserialize)]
pub struct Recommendations {
    /// Recommended titles
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// Everything the enrichment pass could find for one title
#[derive(Debug, Clone, Default, Serialize)]
pub struct Enrichment {
    /// Canonical title
    pub title: String,
    /// Release year
    pub year: Option<i32>,
    /// Genre names
    pub genres: Vec<String>,
    /// Director name
    pub director: Option<String>,
    /// Average vote
    pub score: Option<f64>,
    /// Trailer URL
    pub trailer_url: Option<String>,
    /// Recommended titles
    pub recommendations: Vec<String>,
}

/// Metadata API client
#[derive(Debug)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    /// Create a new client
    pub fn new(config: TmdbConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::configuration("metadata API key is required"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Search movies by title
    #[instrument(skip(self))]
    pub async fn search(&self, title: &str) -> Result<Vec<SearchHit>> {
        let url = format!("{}/search/movie", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
                ("query", title),
            ])
            .send()
            .await
            .map_err(|e| Error::network(format!("search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "metadata API error {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to parse search response: {}", e)))?;

        Ok(parsed.results)
    }

    /// Fetch one movie's detail with credits, videos and recommendations
    #[instrument(skip(self))]
    pub async fn detail(&self, id: i64) -> Result<MovieDetail> {
        let url = format!("{}/movie/{}", self.config.base_url, id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
                ("append_to_response", "credits,videos,recommendations"),
            ])
            .send()
            .await
            .map_err(|e| Error::network(format!("detail request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "metadata API error {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::network(format!("failed to parse detail response: {}", e)))
    }

    /// Best-effort enrichment: first search hit, then its detail. Any
    /// failure along the way degrades to `None`.
    pub async fn enrich(&self, title: &str) -> Option<Enrichment> {
        let hits = match self.search(title).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(title = %title, error = %e, "metadata search failed, skipping enrichment");
                return None;
            }
        };
        let first = hits.into_iter().next()?;

        let detail = match self.detail(first.id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(id = first.id, error = %e, "metadata detail failed, skipping enrichment");
                return None;
            }
        };

        debug!(id = detail.id, title = %detail.title, "enrichment data found");
        Some(build_enrichment(detail))
    }
}

fn build_enrichment(detail: MovieDetail) -> Enrichment {
    let director = detail
        .credits
        .as_ref()
        .and_then(|c| c.crew.iter().find(|m| m.job == "Director"))
        .map(|m| m.name.clone());

    let trailer_url = detail
        .videos
        .as_ref()
        .and_then(|v| {
            v.results
                .iter()
                .find(|video| video.site == "YouTube" && video.kind == "Trailer")
        })
        .map(|video| format!("https://www.youtube.com/watch?v={}", video.key));

    let recommendations = detail
        .recommendations
        .as_ref()
        .map(|r| r.results.iter().take(5).map(|hit| hit.title.clone()).collect())
        .unwrap_or_default();

    Enrichment {
        title: detail.title,
        year: detail.release_date.as_deref().and_then(release_year),
        genres: detail.genres.iter().map(|g| g.name.clone()).collect(),
        director,
        score: detail.vote_average,
        trailer_url,
        recommendations,
    }
}

/// Year component of a `YYYY-MM-DD` date
fn release_year(date: &str) -> Option<i32> {
    date.split('-').next()?.parse().ok()
}
