use async_trait::async_trait;
use thiserror::Error;

use crate::message::Message;

/// Sampling parameters sent alongside a prompt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampling {
    pub temperature: f32,
    pub max_length: u32,
}

impl Sampling {
    pub const fn new(temperature: f32, max_length: u32) -> Self {
        Self {
            temperature,
            max_length,
        }
    }
}

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("no inference endpoint configured")]
    NotConfigured,
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("inference endpoint returned {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response format from inference endpoint")]
    UnexpectedFormat,
}

/// Anything that can turn a conversation into generated text.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, messages: &[Message], sampling: Sampling) -> Result<String, LLMError>;
}
