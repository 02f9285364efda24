use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::message::{linearize, Message};
use crate::traits::{Generator, LLMError, Sampling};

/// A recorded [`Generator::generate`] call.
#[derive(Clone, Debug)]
pub struct GenerateCall {
    pub messages: Vec<Message>,
    pub sampling: Sampling,
}

impl GenerateCall {
    /// The prompt a real client would have sent for this call.
    pub fn prompt(&self) -> String {
        linearize(&self.messages)
    }
}

#[derive(Clone, Debug)]
enum Reply {
    Text(String),
    Echo,
    Unconfigured,
}

/// In-memory generator used in tests.
#[derive(Clone)]
pub struct MockGenerator {
    reply: Reply,
    calls: Arc<Mutex<Vec<GenerateCall>>>,
}

impl MockGenerator {
    /// Always answer with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Answer with the linearized prompt it received.
    pub fn echo() -> Self {
        Self::with_reply(Reply::Echo)
    }

    /// Fail every call the way an unconfigured client does.
    pub fn unconfigured() -> Self {
        Self::with_reply(Reply::Unconfigured)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<GenerateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, messages: &[Message], sampling: Sampling) -> Result<String, LLMError> {
        let call = GenerateCall {
            messages: messages.to_vec(),
            sampling,
        };
        let prompt = call.prompt();
        self.calls.lock().unwrap().push(call);
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Echo => Ok(prompt),
            Reply::Unconfigured => Err(LLMError::NotConfigured),
        }
    }
}
