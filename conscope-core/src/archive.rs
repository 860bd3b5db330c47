//! HTTP client for the static transcript archive.
//!
//! The archive is a dumb file server: a transcripts directory with an HTML
//! index and a sibling analyses directory. Every request carries explicit
//! no-cache directives since the files are regenerated in place. Content is
//! always fetched fresh; nothing is cached client-side.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, PRAGMA};

use crate::analysis::analysis_candidates;
use crate::config::ArchiveConfig;
use crate::error::{Error, Result};
use crate::listing;

/// Client for the transcript archive endpoints.
#[derive(Clone)]
pub struct ArchiveClient {
    http: reqwest::Client,
    transcripts_url: String,
    analyses_url: String,
}

impl ArchiveClient {
    /// Create a new archive client from configuration.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            transcripts_url: config.transcripts_url(),
            analyses_url: config.analyses_url(),
        })
    }

    /// Fetch the raw directory index page of the transcripts directory.
    pub async fn fetch_listing(&self) -> Result<String> {
        let url = format!("{}/", self.transcripts_url);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Listing(format!(
                "listing request returned {}",
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    /// Discover transcript filenames by scraping the directory index.
    pub async fn discover(&self) -> Result<Vec<String>> {
        let html = self.fetch_listing().await?;
        let files = listing::transcript_files(&html);
        tracing::info!(count = files.len(), "discovered transcript files");
        Ok(files)
    }

    /// Fetch a transcript body by filename.
    pub async fn fetch_transcript(&self, filename: &str) -> Result<String> {
        let url = format!("{}/{}", self.transcripts_url, filename);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// Resolve and fetch the analysis body for a transcript.
    ///
    /// Tries each candidate name in fixed order and returns the body of the
    /// first fetch with a success status. Every call restarts from the
    /// first candidate.
    pub async fn fetch_analysis(&self, filename: &str) -> Result<String> {
        for candidate in analysis_candidates(filename) {
            let url = format!("{}/{}", self.analyses_url, candidate);
            match self.http.get(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text().await?);
                }
                Ok(response) => {
                    tracing::trace!(
                        candidate = %candidate,
                        status = %response.status(),
                        "analysis candidate miss"
                    );
                }
                Err(e) => {
                    tracing::trace!(candidate = %candidate, error = %e, "analysis candidate fetch failed");
                }
            }
        }

        Err(Error::AnalysisNotFound(filename.to_string()))
    }
}
