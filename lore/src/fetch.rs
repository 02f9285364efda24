//! Normalized context lookups.
//!
//! Each lookup resolves to a plain value. A [`StoreError`] from the
//! underlying [`ContentStore`] means exactly the same thing as "nothing
//! found": it is logged and replaced by the lookup's empty value, so callers
//! never branch on fetch failures.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::context::{Chapter, ChatSession, ContextBundle};
use crate::store::{ContentStore, Filter, Record, StoreError};
use crate::tags::Tags;

pub const CHARACTERS: &str = "Characters";
pub const CHATS: &str = "ChatWithCharacters";
pub const CHAPTERS: &str = "BackupChapters";
pub const CATALYSTS: &str = "Catalyst";

const CHAT_SESSION_LIMIT: usize = 5;
const CHAPTER_LIMIT: usize = 3;

trait OrEmpty {
    fn or_empty(self, collection: &str) -> Vec<Record>;
}

impl OrEmpty for Result<Vec<Record>, StoreError> {
    fn or_empty(self, collection: &str) -> Vec<Record> {
        self.unwrap_or_else(|err| {
            warn!(collection, %err, "lookup failed, treating as empty");
            Vec::new()
        })
    }
}

/// Which lookups a handler wants, keyed by the tags to use for each.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lookups<'a> {
    pub personality: Option<&'a Tags>,
    pub chat_history: Option<&'a Tags>,
    pub chapters: Option<&'a Tags>,
    pub catalyst: Option<&'a Tags>,
}

#[derive(Clone)]
pub struct ContextFetcher {
    store: Arc<dyn ContentStore>,
}

impl ContextFetcher {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    async fn lookup(&self, collection: &str, filter: Filter, limit: usize) -> Vec<Record> {
        self.store
            .query(collection, &filter, limit)
            .await
            .or_empty(collection)
    }

    /// Personality text of the first character tagged with `tags[0]`.
    pub async fn character_personality(&self, tags: &Tags) -> String {
        let Some(tag) = tags.first() else {
            return String::new();
        };
        debug!(tag, "fetching character");
        let records = self
            .lookup(CHARACTERS, Filter::eq("charactertags", tag), 1)
            .await;
        let personality = records
            .first()
            .and_then(|r| r.get("chatbot"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        debug!(found = !personality.is_empty(), "character personality");
        personality
    }

    /// Up to five stored chat sessions with the character tagged `tags[0]`.
    pub async fn chat_history(&self, tags: &Tags) -> Vec<ChatSession> {
        let Some(tag) = tags.first() else {
            return Vec::new();
        };
        debug!(tag, "fetching chat history");
        let sessions: Vec<ChatSession> = self
            .lookup(CHATS, Filter::eq("charactertags", tag), CHAT_SESSION_LIMIT)
            .await
            .iter()
            .map(|r| ChatSession::from_chat_box(r.get("chatBox")))
            .collect();
        if sessions.is_empty() {
            debug!(tag, "no chat history for character");
        }
        sessions
    }

    /// Up to three chapters from the story tagged `tags[0]`, each truncated.
    pub async fn related_chapters(&self, tags: &Tags) -> Vec<Chapter> {
        let Some(tag) = tags.first() else {
            return Vec::new();
        };
        debug!(tag, "fetching chapters");
        self.lookup(CHAPTERS, Filter::eq("storyTag", tag), CHAPTER_LIMIT)
            .await
            .iter()
            .map(Chapter::from_record)
            .collect()
    }

    /// The first catalyst whose title contains `tags[0]`, pretty-printed.
    pub async fn catalyst_intel(&self, tags: &Tags) -> String {
        let Some(tag) = tags.first() else {
            return String::new();
        };
        debug!(tag, "fetching catalyst intel");
        let records = self
            .lookup(CATALYSTS, Filter::contains("title", tag), 1)
            .await;
        match records.first() {
            // A matched record with no fields still renders, as `{}`.
            Some(record) => serde_json::to_string_pretty(record).unwrap_or_default(),
            None => {
                debug!(tag, "no catalyst intel for tag");
                String::new()
            }
        }
    }

    /// Run the requested lookups concurrently and wait for all of them.
    pub async fn gather(&self, lookups: Lookups<'_>) -> ContextBundle {
        let (personality, chat_history, chapters, catalyst) = tokio::join!(
            async {
                match lookups.personality {
                    Some(tags) => self.character_personality(tags).await,
                    None => String::new(),
                }
            },
            async {
                match lookups.chat_history {
                    Some(tags) => self.chat_history(tags).await,
                    None => Vec::new(),
                }
            },
            async {
                match lookups.chapters {
                    Some(tags) => self.related_chapters(tags).await,
                    None => Vec::new(),
                }
            },
            async {
                match lookups.catalyst {
                    Some(tags) => self.catalyst_intel(tags).await,
                    None => String::new(),
                }
            },
        );
        let bundle = ContextBundle {
            personality,
            chat_history,
            chapters,
            catalyst,
        };
        info!(
            personality = !bundle.personality.is_empty(),
            sessions = bundle.chat_history.len(),
            chapters = bundle.chapters.len(),
            catalyst = !bundle.catalyst.is_empty(),
            "context gathered"
        );
        bundle
    }
}
