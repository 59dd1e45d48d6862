use crate::error::{Error, Result};
use async_trait::async_trait;
use botcheck_core::TextClassifier;
use botcheck_types::TextClassification;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub retries: u32,
    pub min_length: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_ms: 10_000,
            retries: 3,
            min_length: 10,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

fn build_http_client(timeout_ms: u64) -> Client {
    let timeout = Duration::from_millis(timeout_ms);

    // Some sandboxed environments panic during proxy auto-detection in
    // reqwest's default client builder. Fall back to no-proxy in that case.
    match catch_unwind(AssertUnwindSafe(|| Client::builder().timeout(timeout).build())) {
        Ok(Ok(client)) => client,
        Ok(Err(_)) | Err(_) => Client::builder()
            .no_proxy()
            .timeout(timeout)
            .build()
            .expect("failed to construct HTTP client"),
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    question_text: &'a str,
    response_text: &'a str,
    min_length: usize,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    gibberish: Probability,
    copy_paste: Probability,
    relevance: Relevance,
    generic: Probability,
    quality: Quality,
}

#[derive(Debug, Deserialize)]
struct Probability {
    probability: f64,
    #[allow(dead_code)]
    evidence: String,
}

#[derive(Debug, Deserialize)]
struct Relevance {
    off_topic_probability: f64,
    #[allow(dead_code)]
    evidence: String,
}

#[derive(Debug, Deserialize)]
struct Quality {
    score: f64,
    #[allow(dead_code)]
    rationale: String,
}

impl From<ClassifyResponse> for TextClassification {
    fn from(r: ClassifyResponse) -> Self {
        TextClassification {
            p_gibberish: r.gibberish.probability,
            p_copy_paste: r.copy_paste.probability,
            p_irrelevant: r.relevance.off_topic_probability,
            p_generic: r.generic.probability,
            quality: r.quality.score,
        }
    }
}

/// HTTP-backed `TextClassifier` (§6.2). 5xx/transport failures retry with
/// exponential backoff up to `retries`; 4xx is permanent (not retried).
pub struct HttpTextClassifier {
    config: ClientConfig,
    http: Client,
}

impl HttpTextClassifier {
    pub fn new(config: ClientConfig) -> Self {
        let http = build_http_client(config.timeout_ms);
        Self { config, http }
    }

    async fn call_once(&self, question_text: &str, response_text: &str) -> Result<TextClassification> {
        let url = format!("{}/classify", self.config.base_url);
        let request = ClassifyRequest {
            question_text,
            response_text,
            min_length: self.config.min_length,
        };

        let mut builder = self.http.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::PermanentFailure(format!("{status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ServerError(status.as_u16(), body));
        }

        let body = response.text().await?;
        let parsed: ClassifyResponse = serde_json::from_str(&body)?;
        Ok(parsed.into())
    }
}

fn is_retryable(err: &Error) -> bool {
    matches!(err, Error::Transport(_) | Error::Timeout | Error::ServerError(_, _))
}

#[async_trait]
impl TextClassifier for HttpTextClassifier {
    async fn classify(&self, question_text: &str, response_text: &str) -> botcheck_types::Result<TextClassification> {
        let mut attempt = 0u32;
        loop {
            match self.call_once(question_text, response_text).await {
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) && attempt < self.config.retries => {
                    attempt += 1;
                    let backoff_ms = 100u64.saturating_mul(1u64 << (attempt - 1).min(6));
                    let jitter_ms = backoff_ms / 4;
                    tokio::time::sleep(Duration::from_millis(backoff_ms + jitter_ms)).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
