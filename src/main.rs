// src/main.rs
mod edgar;
mod extractors;
mod pipeline;
mod storage;
mod summarizer;
mod utils;

use clap::Parser;
use edgar::{EdgarClient, FilingSelection};
use extractors::{Field, FieldExtractor};
use pipeline::{AnalysisOutcome, AnalysisResult, Pipeline, PipelineOptions, DEFAULT_EXCERPT_CHARS};
use std::process::ExitCode;
use std::sync::Arc;
use storage::StorageManager;
use summarizer::OpenAiSummarizer;
use utils::config::{self, Settings};
use utils::AppError;

/// Command Line Interface for SEC 10-K analysis
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Company name to look up on EDGAR (e.g., "Apple", "Tesla")
    company: String,

    /// Analyze this accession number instead of the most recent 10-K
    #[arg(short, long)]
    accession_number: Option<String>,

    /// Only list 10-K filings made in or after this year
    #[arg(long)]
    start_year: Option<i32>,

    /// Only list 10-K filings made in or before this year
    #[arg(long)]
    end_year: Option<i32>,

    /// Comma-separated fields to extract (default: all)
    #[arg(long, value_delimiter = ',')]
    fields: Vec<Field>,

    /// Characters of filing text passed to the summarizer
    #[arg(long, default_value_t = DEFAULT_EXCERPT_CHARS)]
    excerpt_chars: usize,

    /// Save the analysis (JSON + summary text) under this directory
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Print the result record as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// User-Agent sent to EDGAR (name and contact email)
    #[arg(long, env = "EDGAR_USER_AGENT")]
    user_agent: Option<String>,

    /// Chat model used for the summary report
    #[arg(long, env = "OPENAI_MODEL")]
    model: Option<String>,

    /// HTTP timeout in seconds for EDGAR and summarizer calls
    #[arg(long, env = "HTTP_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. .env before argument parsing so clap's env fallbacks see it
    config::load_dotenv();
    let args = Args::parse();
    tracing::debug!("Starting processing for args: {:?}", args);

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the analysis succeeded; `Err` only for setup failures.
async fn run(args: Args) -> Result<bool, AppError> {
    let settings = Settings::from_lookup(|key| match key {
        "EDGAR_USER_AGENT" => args.user_agent.clone(),
        "OPENAI_MODEL" => args.model.clone(),
        "HTTP_TIMEOUT_SECS" => args.timeout_secs.map(|s| s.to_string()),
        _ => std::env::var(key).ok(),
    })?;

    let edgar = EdgarClient::new(&settings.user_agent, settings.http_timeout)?;
    let summarizer = OpenAiSummarizer::from_settings(&settings)?;
    let extractor = if args.fields.is_empty() {
        FieldExtractor::new()
    } else {
        FieldExtractor::with_fields(&args.fields)
    };

    let options = PipelineOptions {
        selection: args
            .accession_number
            .clone()
            .map_or(FilingSelection::Latest, FilingSelection::Accession),
        start_year: args.start_year,
        end_year: args.end_year,
        excerpt_chars: args.excerpt_chars,
    };

    let pipeline = Pipeline::new(Arc::new(edgar), extractor, Arc::new(summarizer), options);
    let outcome = pipeline.analyze_company(&args.company).await;
    tracing::info!("Analysis finished (success: {})", outcome.is_success());

    if args.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| AppError::Processing(format!("Could not serialize result: {}", e)))?;
        println!("{}", json);
    }

    match outcome {
        AnalysisOutcome::Success(result) => {
            if !args.json {
                print!("{}", render_report(&result));
            }
            if let Some(dir) = &args.output_dir {
                let storage = StorageManager::new(dir)?;
                storage.save_result(&result)?;
                storage.save_summary(&result)?;
            }
            Ok(true)
        }
        AnalysisOutcome::Failure(failure) => {
            if !args.json {
                eprintln!("Error: {}", failure.error);
            }
            Ok(false)
        }
    }
}

/// Plain-text rendering: summary, filings table, extracted fields.
fn render_report(result: &AnalysisResult) -> String {
    let mut out = String::new();

    out.push_str(&result.company_name);
    if let Some(cik) = &result.cik {
        out.push_str(&format!(" (CIK {})", cik));
    }
    out.push_str("\n\n### Summary Report\n");
    out.push_str(&result.summary_report);
    out.push_str("\n\n### 10-K Filings\n");
    out.push_str(&format!("{:<22} {:<12} {}\n", "Accession Number", "Filing Date", "Filing URL"));
    for filing in &result.filings {
        let marker = if filing.accession_number == result.analyzed_filing { " *" } else { "" };
        out.push_str(&format!(
            "{:<22} {:<12} {}{}\n",
            filing.accession_number, filing.filing_date, filing.filing_url, marker
        ));
    }

    if let Some(fields) = &result.extracted_fields {
        out.push_str("\n### Extracted Fields\n");
        for (field, value) in fields.present() {
            out.push_str(&format!("{}: {}\n", field.label(), value));
        }
    }

    out
}
