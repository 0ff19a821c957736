// src/summarizer/openai.rs
//! OpenAI-compatible chat-completions backend.

use crate::summarizer::Summarizer;
use crate::utils::config::Settings;
use crate::utils::error::SummaryError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a financial analyst with deep expertise in SEC 10-K filings. \
Given metadata and financial figures extracted from a company's most recent annual report, \
write a concise summary report: who the registrant is, the headline figures (revenue, net income, \
assets, liabilities) with what they imply, and any notable trends or risks visible in the text. \
Only use the figures provided; say so when a figure is missing.";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Long-lived client; one per process.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self, SummaryError> {
        if api_key.trim().is_empty() {
            return Err(SummaryError::Config("OPENAI_API_KEY is empty".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SummaryError> {
        Self::new(
            &settings.openai_api_key,
            &settings.openai_base_url,
            &settings.openai_model,
            settings.http_timeout,
        )
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, text: &str, company_name: &str) -> Result<String, SummaryError> {
        let url = format!("{}/chat/completions", self.base_url);
        let prompt = format!("Company: {}\n\n{}", company_name, text);

        let request = ChatRequest {
            model: &self.model,
            temperature: 0.2,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
        };

        tracing::info!("Requesting summary for {} from model {}", company_name, self.model);
        tracing::debug!("Summary prompt is {} chars", prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Summarizer error response ({}): {}", status, body);
            return Err(SummaryError::Api { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        let summary = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(SummaryError::EmptyResponse)?;

        tracing::info!("Summary received ({} chars)", summary.len());
        Ok(summary)
    }
}
