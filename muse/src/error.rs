use llm::LLMError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuseError {
    /// Required caller text was missing or blank.
    #[error("{0}")]
    Validation(&'static str),
    #[error("invalid request body: {0}")]
    Payload(#[from] serde_json::Error),
    #[error(transparent)]
    Inference(#[from] LLMError),
}

/// Return `text` if it has any non-whitespace content.
pub(crate) fn required<'a>(text: Option<&'a str>, missing: &'static str) -> Result<&'a str, MuseError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(MuseError::Validation(missing)),
    }
}
