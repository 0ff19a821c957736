// src/summarizer/mod.rs
//! The prose-summary stage. The pipeline only sees the [`Summarizer`] trait;
//! the language-model backend behind it is swappable.

pub mod openai;

use crate::utils::error::SummaryError;
use async_trait::async_trait;

pub use openai::OpenAiSummarizer;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Turns extracted filing text into a prose report about `company_name`.
    async fn summarize(&self, text: &str, company_name: &str) -> Result<String, SummaryError>;
}
