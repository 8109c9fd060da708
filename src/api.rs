//! Generative-language summarization with a truncation fallback.
//!
//! # Architecture
//!
//! The module uses a trait-based design so the remote model can be swapped
//! or stubbed:
//! - [`AskAsync`]: core trait defining async LLM interaction
//! - [`GenAiClient`]: `generateContent` client for Gemini-style endpoints
//! - [`Summarizer`]: wraps any [`AskAsync`] and guarantees a summary
//!
//! # Failure Handling
//!
//! A summary is never an error. Auth, network, quota and response-shape
//! failures are logged and replaced by [`fallback_summary`].

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::GenAiConfig;
use crate::utils::truncate_for_log;

/// Instruction prepended to every article.
pub const SUMMARY_PROMPT: &str = "Summarize the following news in 4-5 lines:";

/// Characters kept by [`fallback_summary`].
pub const FALLBACK_CHARS: usize = 300;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("response contained no candidates")]
    NoCandidates,

    #[error("first candidate has no text content")]
    EmptyCandidate,

    #[error("no API key configured")]
    MissingApiKey,
}

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return its reply.
pub trait AskAsync {
    /// The type of response returned by the LLM.
    type Response;

    /// Send `text` to the LLM and receive a response.
    async fn ask(&self, text: &str) -> Result<Self::Response, SummaryError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Response envelope: only the first candidate's content is consumed.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined.
    ///
    /// # Errors
    ///
    /// [`SummaryError::NoCandidates`] or [`SummaryError::EmptyCandidate`]
    /// when the envelope does not carry usable text.
    pub fn first_candidate_text(&self) -> Result<String, SummaryError> {
        let candidate = self.candidates.first().ok_or(SummaryError::NoCandidates)?;
        let text: String = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        if text.is_empty() {
            return Err(SummaryError::EmptyCandidate);
        }
        Ok(text.to_string())
    }
}

/// Client for a `models/{model}:generateContent` endpoint.
pub struct GenAiClient {
    client: Client,
    api_key: Option<String>,
    config: GenAiConfig,
}

impl fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenAiClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl GenAiClient {
    pub fn new(client: Client, api_key: Option<String>, config: GenAiConfig) -> Self {
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl AskAsync for GenAiClient {
    type Response = String;

    #[instrument(level = "debug", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, text: &str) -> Result<Self::Response, SummaryError> {
        let api_key = self.api_key.as_deref().ok_or(SummaryError::MissingApiKey)?;
        let body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Api {
                status,
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, "generateContent answered");
        parsed.first_candidate_text()
    }
}

/// First [`FALLBACK_CHARS`] characters of `text` followed by `"..."`.
///
/// Slices on character boundaries, so it cannot panic on multi-byte input.
pub fn fallback_summary(text: &str) -> String {
    let mut out: String = text.chars().take(FALLBACK_CHARS).collect();
    out.push_str("...");
    out
}

/// Turns article text into a short summary, whatever the model does.
#[derive(Debug)]
pub struct Summarizer<T> {
    inner: T,
}

impl<T> Summarizer<T>
where
    T: AskAsync<Response = String> + fmt::Debug,
{
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Summarize `text` in a few lines, or fall back to a truncation.
    #[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
    pub async fn summarize(&self, text: &str) -> String {
        let prompt = format!("{SUMMARY_PROMPT}\n{text}");
        match self.inner.ask(&prompt).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Summarization failed; using truncated text");
                fallback_summary(text)
            }
        }
    }
}
