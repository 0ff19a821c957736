// src/edgar/models.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A company resolved from a free-text name. The CIK is authoritative for the
/// rest of the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyIdentity {
    pub query_name: String,
    pub display_name: String,
    /// Ten-digit, zero-padded CIK.
    pub cik: String,
}

/// Pads a CIK to the ten digits EDGAR uses in submission URLs.
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik.trim())
}

// --- Full-text search response ---
// Only the fields the resolver reads are modelled.

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
}

#[derive(Debug, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_source")]
    pub source: SearchSource,
}

#[derive(Debug, Deserialize)]
pub struct SearchSource {
    #[serde(default)]
    pub display_names: Vec<String>,
    #[serde(default)]
    pub ciks: Vec<String>,
}

/// Structure representing the EDGAR company submission index
/// Example: https://data.sec.gov/submissions/CIK0000320193.json
#[derive(Debug, Deserialize)]
pub struct SubmissionIndex {
    pub cik: String,
    #[serde(default)]
    pub name: Option<String>,
    pub filings: Filings,
}

#[derive(Debug, Deserialize)]
pub struct Filings {
    pub recent: RecentFilings,
}

/// Parallel arrays: position `i` in each describes the same submission.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
}

/// One annual filing, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingRecord {
    pub accession_number: String,
    pub filing_date: String,
    /// Browsable `-index.html` page for this filing
    pub filing_url: String,
}

impl FilingRecord {
    /// Calendar year the filing was made, if the date is well-formed (YYYY-MM-DD).
    pub fn year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.filing_date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }
}
