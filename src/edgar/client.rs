// src/edgar/client.rs
use crate::edgar::models::{pad_cik, CompanyIdentity, SearchHit, SearchResponse, SubmissionIndex};
use crate::extractors::find_submission_text_link;
use crate::utils::error::EdgarError;
use async_trait::async_trait;
use reqwest::{header, Url};
use std::time::Duration;

pub const EDGAR_SEARCH_URL: &str = "https://efts.sec.gov/LATEST/search-index";
pub const EDGAR_SUBMISSIONS_BASE: &str = "https://data.sec.gov/submissions";
pub const EDGAR_ARCHIVES_BASE: &str = "https://www.sec.gov/Archives/edgar/data";
pub const EDGAR_WWW_HOST: &str = "https://www.sec.gov";

/// The network-facing stages of the pipeline. `EdgarClient` talks to EDGAR;
/// tests substitute fixtures.
#[async_trait]
pub trait EdgarApi: Send + Sync {
    /// Maps a free-text company name to its CIK.
    async fn resolve_cik(&self, company_name: &str) -> Result<CompanyIdentity, EdgarError>;

    /// Fetches the full submission history of a CIK.
    async fn fetch_submissions(&self, cik: &str) -> Result<SubmissionIndex, EdgarError>;

    /// Finds the consolidated submission text file linked from a filing index page.
    async fn locate_submission_text(&self, filing_index_url: &str) -> Result<Url, EdgarError>;

    /// Downloads a consolidated submission text file in full.
    async fn download_text(&self, url: &str) -> Result<String, EdgarError>;

    /// Base URL filing index pages live under.
    fn archives_base(&self) -> &str;
}

/// Where each EDGAR service lives.
#[derive(Debug, Clone)]
pub struct EdgarEndpoints {
    pub search_url: String,
    pub submissions_base: String,
    pub archives_base: String,
    /// Host relative links on index pages are qualified against
    pub www_host: String,
}

impl Default for EdgarEndpoints {
    fn default() -> Self {
        Self {
            search_url: EDGAR_SEARCH_URL.to_string(),
            submissions_base: EDGAR_SUBMISSIONS_BASE.to_string(),
            archives_base: EDGAR_ARCHIVES_BASE.to_string(),
            www_host: EDGAR_WWW_HOST.to_string(),
        }
    }
}

/// Returns the first hit whose primary display name contains `query`
/// (case-insensitive). No ranking beyond the order the search returned.
pub fn match_company(hits: &[SearchHit], query: &str) -> Option<CompanyIdentity> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    hits.iter().find_map(|hit| {
        let display_name = hit.source.display_names.first()?;
        if !display_name.to_lowercase().contains(&needle) {
            return None;
        }
        let cik = hit.source.ciks.first()?;
        Some(CompanyIdentity {
            query_name: query.to_string(),
            display_name: display_name.clone(),
            cik: pad_cik(cik),
        })
    })
}

pub struct EdgarClient {
    http: reqwest::Client,
    endpoints: EdgarEndpoints,
    host: Url,
}

impl EdgarClient {
    /// Client against the production EDGAR endpoints.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, EdgarError> {
        Self::with_endpoints(user_agent, timeout, EdgarEndpoints::default())
    }

    pub fn with_endpoints(user_agent: &str, timeout: Duration, endpoints: EdgarEndpoints) -> Result<Self, EdgarError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent) // Set the required User-Agent
            .timeout(timeout)
            .build()?;

        let host = Url::parse(&endpoints.www_host)
            .map_err(|e| EdgarError::Parse(format!("Invalid EDGAR host '{}': {}", endpoints.www_host, e)))?;

        tracing::debug!("Using User-Agent: {}", user_agent);
        Ok(Self { http, endpoints, host })
    }

    /// Sends a GET and rejects any non-2xx status.
    async fn get(&self, request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response, EdgarError> {
        let response = request.send().await?; // Propagates reqwest::Error as EdgarError::Network

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and request rate.");
            }
            return Err(EdgarError::Http(status));
        }

        Ok(response)
    }

    /// Runs the full-text company search and returns the raw hit list.
    pub async fn search_company(&self, company_name: &str) -> Result<Vec<SearchHit>, EdgarError> {
        let url = &self.endpoints.search_url;
        tracing::info!("Searching EDGAR for company: {}", company_name);

        let request = self
            .http
            .get(url)
            .query(&[("q", company_name), ("entity", "company")]);
        let response = self.get(request, url).await?;

        let search: SearchResponse = response
            .json()
            .await
            .map_err(|e| EdgarError::Parse(format!("Invalid search response: {}", e)))?;

        tracing::debug!("Search returned {} hits", search.hits.hits.len());
        Ok(search.hits.hits)
    }
}

#[async_trait]
impl EdgarApi for EdgarClient {
    async fn resolve_cik(&self, company_name: &str) -> Result<CompanyIdentity, EdgarError> {
        let not_found = || EdgarError::CompanyNotFound(company_name.to_string());

        if company_name.trim().is_empty() {
            return Err(not_found());
        }

        // Transport, status and parse failures are reported the same way as "no match".
        let hits = match self.search_company(company_name).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("Company search for '{}' failed: {}", company_name, e);
                return Err(not_found());
            }
        };

        let identity = match_company(&hits, company_name).ok_or_else(not_found)?;
        tracing::info!("Resolved '{}' to {} (CIK {})", company_name, identity.display_name, identity.cik);
        Ok(identity)
    }

    async fn fetch_submissions(&self, cik: &str) -> Result<SubmissionIndex, EdgarError> {
        let url = format!(
            "{}/CIK{}.json",
            self.endpoints.submissions_base.trim_end_matches('/'),
            pad_cik(cik)
        );
        tracing::info!("Fetching submission index: {}", url);

        let response = self.get(self.http.get(&url), &url).await?;
        let submission: SubmissionIndex = response
            .json()
            .await
            .map_err(|e| EdgarError::Parse(format!("Invalid submission index for CIK {}: {}", cik, e)))?;

        tracing::debug!(
            "Submission index for CIK {} lists {} recent filings",
            submission.cik,
            submission.filings.recent.form.len()
        );
        Ok(submission)
    }

    async fn locate_submission_text(&self, filing_index_url: &str) -> Result<Url, EdgarError> {
        tracing::info!("Locating submission text on: {}", filing_index_url);
        let not_found = || EdgarError::SubmissionTextNotFound(filing_index_url.to_string());

        let page = match self.get(self.http.get(filing_index_url), filing_index_url).await {
            Ok(response) => response.text().await,
            Err(e) => {
                tracing::warn!("Could not fetch filing index page: {}", e);
                return Err(not_found());
            }
        };
        let page = page.map_err(|e| {
            tracing::warn!("Could not read filing index page: {}", e);
            not_found()
        })?;

        let url = find_submission_text_link(&page, &self.host).ok_or_else(not_found)?;
        tracing::info!("Submission text located at: {}", url);
        Ok(url)
    }

    async fn download_text(&self, url: &str) -> Result<String, EdgarError> {
        tracing::info!("Downloading document from: {}", url);

        let request = self
            .http
            .get(url)
            // Submission text is served as text/plain; accept anything EDGAR sends
            .header(header::ACCEPT, "text/plain,text/html,application/xml,*/*");
        let response = self.get(request, url).await?;

        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn archives_base(&self) -> &str {
        &self.endpoints.archives_base
    }
}
