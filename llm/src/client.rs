//! HTTP client for a KoboldCpp-compatible generation endpoint.
//!
//! [`KoboldClient`] implements [`Generator`] by linearizing the conversation
//! into a single prompt, posting it with the sampling parameters, and pulling
//! the generated text out of whichever response layout the server returned.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::message::{linearize, Message};
use crate::traits::{Generator, LLMError, Sampling};

const STOP_SEQUENCES: [&str; 2] = ["User:", "\n\n\n"];

/// Connection settings for [`KoboldClient`].
#[derive(Clone, Debug)]
pub struct KoboldConfig {
    /// Full URL of the generate endpoint. Every call fails while unset.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for KoboldConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: String,
    temperature: f32,
    max_length: u32,
    stop_sequence: &'a [&'a str],
}

type Extractor = fn(&Value) -> Option<&str>;

fn response_field(body: &Value) -> Option<&str> {
    body.get("response")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn first_result(body: &Value) -> Option<&str> {
    body.get("results")?.get(0)?.get("text")?.as_str()
}

fn text_field(body: &Value) -> Option<&str> {
    body.get("text").and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Known response layouts, tried in order.
const EXTRACTORS: [(&str, Extractor); 3] = [
    ("response", response_field),
    ("results", first_result),
    ("text", text_field),
];

/// Pull the generated text out of a response body.
pub fn extract_text(body: &Value) -> Result<String, LLMError> {
    for (layout, extract) in EXTRACTORS {
        if let Some(text) = extract(body) {
            debug!(layout, "extracted generated text");
            return Ok(text.trim().to_string());
        }
    }
    error!(%body, "unknown response format");
    Err(LLMError::UnexpectedFormat)
}

pub struct KoboldClient {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl KoboldClient {
    pub fn new(config: KoboldConfig) -> Result<Self, LLMError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: config.endpoint,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[async_trait]
impl Generator for KoboldClient {
    async fn generate(&self, messages: &[Message], sampling: Sampling) -> Result<String, LLMError> {
        let endpoint = self.endpoint.as_deref().ok_or(LLMError::NotConfigured)?;
        info!(%endpoint, "calling inference endpoint");

        let payload = GenerateRequest {
            prompt: linearize(messages),
            temperature: sampling.temperature,
            max_length: sampling.max_length,
            stop_sequence: &STOP_SEQUENCES,
        };
        let resp = self.client.post(endpoint).json(&payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "inference request failed");
            return Err(LLMError::Status { status, body });
        }

        let body = resp.json::<Value>().await?;
        let text = extract_text(&body)?;
        info!(chars = text.len(), "got response from inference endpoint");
        Ok(text)
    }
}
