//! Gemini `generateContent` client that turns a category name into articles.
//!
//! One request per call, no retry. The model is asked for a bare JSON object
//! `{"articles": [...]}`; anything else (markdown fences aside) is a
//! malformed response and fails the whole batch.

use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use super::Article;
use crate::config::Config;
use crate::util::{is_loopback_host, strip_control_chars, validate_api_base};

const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// User-facing text for every fetch failure.
pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to fetch news. Please check your API key and try again.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("No Gemini API key configured (set GEMINI_API_KEY or gemini_api_key)")]
    MissingApiKey,
    #[error("Request timed out after {}s", REQUEST_TIMEOUT.as_secs())]
    Timeout,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Response contained no text")]
    EmptyResponse,
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Gateway to the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    model: String,
    base_url: String,
    articles_per_request: u32,
    temperature: f32,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("articles_per_request", &self.articles_per_request)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from configuration, resolving the API key from the
    /// environment first.
    ///
    /// A missing key is not an error here: the client is still usable and
    /// every fetch reports [`GatewayError::MissingApiKey`].
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        if config.api_key().is_none() {
            tracing::warn!("No Gemini API key found; category fetches will fail");
        }

        Ok(Self {
            http,
            api_key: config.api_key(),
            model: config.gemini_model.clone(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            articles_per_request: config.articles_per_request,
            temperature: config.temperature,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask for fresh articles in `category`.
    ///
    /// # Errors
    ///
    /// Any transport fault, non-2xx status, oversize body, or response that
    /// does not decode into a duplicate-free article list.
    pub async fn fetch_articles(&self, category: &str) -> Result<Vec<Article>, GatewayError> {
        let key = self.api_key.as_ref().ok_or(GatewayError::MissingApiKey)?;

        // The key travels in a header, so it must never go out over plain HTTP
        // to anything but this machine.
        let base = validate_api_base(&self.base_url).map_err(|e| {
            tracing::error!(base_url = %self.base_url, error = %e, "Rejecting Gemini base URL");
            GatewayError::InsecureBaseUrl
        })?;
        if base.scheme() == "http" && is_loopback_host(&base) {
            tracing::warn!(base_url = %self.base_url, "Using non-HTTPS Gemini base URL (localhost only)");
        }

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": build_prompt(category, self.articles_per_request) }] }],
            "tools": [{ "google_search": {} }],
            "generationConfig": { "temperature": self.temperature },
        });

        tracing::debug!(category = %category, model = %self.model, "Requesting articles");

        let request = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string());

        let text = tokio::time::timeout(REQUEST_TIMEOUT, send(request))
            .await
            .map_err(|_| GatewayError::Timeout)??;

        let articles = parse_response(&text)?;
        tracing::info!(category = %category, count = articles.len(), "Fetched articles");
        Ok(articles)
    }
}

/// Prompt asking the model to act as a news API for `category`.
pub fn build_prompt(category: &str, count: u32) -> String {
    format!(
        r#"Act as a news API. Your response must be a single, valid JSON object, with no other text or markdown.
Find {count} recent and significant news articles for the category: "{category}", using Google Search.

The JSON object must have a root key "articles" containing an array of {count} article objects.
Each article object must have this exact structure:
- id: A unique UUID.
- headline: The article headline.
- subheadline: A one-sentence summary.
- summaryPoints: An array of 3 key bullet points.
- content: An article of about 150 words.
- imageUrl: A relevant image URL. Use a placeholder like "https://picsum.photos/seed/a-unique-string/1200/800" if a real one isn't found.
- sourceUri: The original source URL from search.
- sourceTitle: The original source title.

CRITICAL: The entire output must be only the JSON object. Ensure all strings are correctly quoted and special characters are escaped (e.g., "The speaker said \"It's a success.\"")."#
    )
}

/// Decode a `generateContent` body into articles.
fn parse_response(body: &str) -> Result<Vec<Article>, GatewayError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::Malformed(format!("response envelope: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }

    parse_articles(strip_code_fence(&text))
}

/// Remove a surrounding markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse `{"articles": [...]}` into a duplicate-free list of articles.
///
/// All text fields have terminal control sequences removed.
pub fn parse_articles(json: &str) -> Result<Vec<Article>, GatewayError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| GatewayError::Malformed(e.to_string()))?;

    let list = value
        .get("articles")
        .ok_or_else(|| GatewayError::Malformed("missing \"articles\" key".into()))?;
    if !list.is_array() {
        return Err(GatewayError::Malformed("\"articles\" is not an array".into()));
    }

    let articles: Vec<Article> = serde_json::from_value(list.clone())
        .map_err(|e| GatewayError::Malformed(format!("article shape: {}", e)))?;

    let mut seen = HashSet::new();
    if let Some(dup) = articles.iter().find(|a| !seen.insert(a.id.as_str())) {
        return Err(GatewayError::Malformed(format!(
            "duplicate article id {:?}",
            dup.id
        )));
    }

    Ok(articles.into_iter().map(sanitize).collect())
}

fn clean(s: String) -> String {
    match strip_control_chars(&s) {
        std::borrow::Cow::Borrowed(_) => s,
        std::borrow::Cow::Owned(cleaned) => cleaned,
    }
}

fn sanitize(article: Article) -> Article {
    Article {
        id: article.id,
        headline: clean(article.headline),
        subheadline: clean(article.subheadline),
        summary_points: article.summary_points.into_iter().map(clean).collect(),
        content: clean(article.content),
        image_url: clean(article.image_url),
        source_uri: clean(article.source_uri),
        source_title: clean(article.source_title),
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<String, GatewayError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(GatewayError::HttpStatus(response.status().as_u16()));
    }
    read_limited_text(response, MAX_RESPONSE_SIZE).await
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, GatewayError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(GatewayError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(GatewayError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| GatewayError::InvalidUtf8)
}
