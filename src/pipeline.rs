// src/pipeline.rs
//! Company name in, analysis record out.
//!
//! resolve CIK -> fetch submissions -> filter 10-Ks -> select one -> locate
//! submission text -> download -> extract fields -> summarize -> assemble.
//! The first failing stage ends the run; nothing is retried and no partial
//! result is returned.

use crate::edgar::filings::{filter_annual_filings, filter_by_year, select_filing, FilingSelection};
use crate::edgar::{EdgarApi, FilingRecord};
use crate::extractors::{ExtractedFields, FieldExtractor};
use crate::summarizer::Summarizer;
use crate::utils::error::AppError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_EXCERPT_CHARS: usize = 12_000;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Failed to compile TAG_RE"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE"));

// Raw characters scanned per excerpt character; markup and indentation are dropped.
const RAW_CHARS_PER_EXCERPT_CHAR: usize = 8;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub selection: FilingSelection,
    /// Inclusive filing-year bounds applied to the listed filings
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// How much of the filing body (markup stripped) is passed to the summarizer
    pub excerpt_chars: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            selection: FilingSelection::Latest,
            start_year: None,
            end_year: None,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

/// Final payload handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cik: Option<String>,
    pub filings: Vec<FilingRecord>,
    /// Accession number of the filing that was downloaded and summarized
    pub analyzed_filing: String,
    pub summary_report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_fields: Option<ExtractedFields>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResult {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(AnalysisResult),
    Failure(ErrorResult),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisOutcome::Success(_))
    }
}

pub struct Pipeline {
    edgar: Arc<dyn EdgarApi>,
    extractor: FieldExtractor,
    summarizer: Arc<dyn Summarizer>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        edgar: Arc<dyn EdgarApi>,
        extractor: FieldExtractor,
        summarizer: Arc<dyn Summarizer>,
        options: PipelineOptions,
    ) -> Self {
        Self { edgar, extractor, summarizer, options }
    }

    /// Runs the whole chain for one company. Any stage failure becomes an
    /// [`ErrorResult`] carrying that stage's message.
    pub async fn analyze_company(&self, company_name: &str) -> AnalysisOutcome {
        match self.try_analyze(company_name).await {
            Ok(result) => AnalysisOutcome::Success(result),
            Err(e) => {
                let status = match &e {
                    AppError::Edgar(edgar) => edgar.status_code(),
                    _ => None,
                };
                tracing::error!(?status, "Analysis of '{}' failed: {}", company_name, e);
                AnalysisOutcome::Failure(ErrorResult { error: e.to_string() })
            }
        }
    }

    pub async fn try_analyze(&self, company_name: &str) -> Result<AnalysisResult, AppError> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(AppError::InvalidInput("Please enter a valid company name.".to_string()));
        }
        tracing::info!("Analyzing {}...", company_name);

        // 1. Name -> CIK
        let identity = self.edgar.resolve_cik(company_name).await?;

        // 2-3. Submission history -> annual filings
        let index = self.edgar.fetch_submissions(&identity.cik).await?;
        let filings = filter_annual_filings(&index, &identity.cik, self.edgar.archives_base());
        let filings = filter_by_year(filings, self.options.start_year, self.options.end_year);
        tracing::info!("Found {} 10-K filings", filings.len());

        let filing = select_filing(&filings, &self.options.selection, &identity.cik)?;
        tracing::info!("Processing filing {} filed {}", filing.accession_number, filing.filing_date);

        // 4-5. Index page -> consolidated text
        let text_url = self.edgar.locate_submission_text(&filing.filing_url).await?;
        let raw_text = self.edgar.download_text(text_url.as_str()).await?;
        tracing::info!("Successfully downloaded document ({} bytes)", raw_text.len());

        // 6. Fields
        let fields = self.extractor.extract(&raw_text);

        // 7. Prose summary
        let display_name = index.name.clone().unwrap_or_else(|| identity.display_name.clone());
        let summary_input = build_summary_input(&fields, &raw_text, self.options.excerpt_chars);
        let summary_report = self.summarizer.summarize(&summary_input, &display_name).await?;

        let analyzed_filing = filing.accession_number.clone();
        Ok(AnalysisResult {
            company_name: display_name,
            cik: Some(identity.cik),
            filings,
            analyzed_filing,
            summary_report,
            extracted_fields: if fields.is_empty() { None } else { Some(fields) },
        })
    }
}

/// Extracted fields as `Label: value` lines, then the start of the filing body
/// with markup removed and whitespace collapsed.
pub fn build_summary_input(fields: &ExtractedFields, raw_text: &str, excerpt_chars: usize) -> String {
    let mut input = String::new();

    if fields.is_empty() {
        input.push_str("No structured fields were found in this filing.\n");
    } else {
        input.push_str("Extracted fields:\n");
        for (field, value) in fields.present() {
            input.push_str(&format!("{}: {}\n", field.label(), value));
        }
    }

    if excerpt_chars > 0 {
        let scan_end = raw_text
            .char_indices()
            .nth(excerpt_chars.saturating_mul(RAW_CHARS_PER_EXCERPT_CHAR))
            .map_or(raw_text.len(), |(idx, _)| idx);
        let stripped = TAG_RE.replace_all(&raw_text[..scan_end], " ");
        let collapsed = WHITESPACE_RE.replace_all(stripped.trim(), " ");
        let excerpt: String = collapsed.chars().take(excerpt_chars).collect();
        if !excerpt.is_empty() {
            input.push_str("\nFiling excerpt:\n");
            input.push_str(&excerpt);
        }
    }

    input
}
