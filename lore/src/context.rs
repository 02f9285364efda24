use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Record;

/// Longest chapter excerpt, in characters, that reaches a prompt.
pub const MAX_CHAPTER_CHARS: usize = 1500;

/// One line of a stored chat transcript.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

impl ChatLine {
    pub fn from_author(&self) -> bool {
        self.kind == "user"
    }
}

/// A previous conversation between the author and a character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatSession {
    pub messages: Vec<ChatLine>,
}

impl ChatSession {
    /// Parse a stored `chatBox` value, which may be JSON text or already
    /// structured. Anything unreadable yields an empty session.
    pub fn from_chat_box(chat_box: Option<&Value>) -> Self {
        let parsed = match chat_box {
            None => Ok(Vec::new()),
            Some(Value::String(raw)) => serde_json::from_str(raw),
            Some(value) => Vec::<ChatLine>::deserialize(value),
        };
        Self {
            messages: parsed.unwrap_or_default(),
        }
    }

    /// The last `n` lines of the session.
    pub fn tail(&self, n: usize) -> &[ChatLine] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub content: String,
}

impl Chapter {
    pub fn from_record(record: &Record) -> Self {
        let title = record
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled");
        let content = record
            .get("chapterContent")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self {
            title: title.to_string(),
            content: content.chars().take(MAX_CHAPTER_CHARS).collect(),
        }
    }
}

/// Everything fetched from the content store for one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextBundle {
    pub personality: String,
    pub chat_history: Vec<ChatSession>,
    pub chapters: Vec<Chapter>,
    pub catalyst: String,
}
