use std::sync::Arc;
use std::time::Instant;

use llm::{Generator, Message};
use lore::{ContentStore, ContextFetcher, Lookups};
use serde_json::Value;
use tracing::{debug, info};

use crate::action::{
    ActionKind, ActionRequest, CharacterChatRequest, DevilPovRequest, InvokeRequest,
    RewriteRequest, UnhingeRequest, UnleashRequest,
};
use crate::compose;
use crate::error::{required, MuseError};

/// Runs actions: fetch context, compose the prompt, generate.
///
/// Holds no per-request state, so one instance serves every request.
#[derive(Clone)]
pub struct Muse {
    fetcher: ContextFetcher,
    llm: Arc<dyn Generator>,
}

impl Muse {
    pub fn new(store: Arc<dyn ContentStore>, llm: Arc<dyn Generator>) -> Self {
        Self {
            fetcher: ContextFetcher::new(store),
            llm,
        }
    }

    /// Parse a raw `/devil-pov` body and run the selected action.
    pub async fn handle(&self, body: Value) -> Result<String, MuseError> {
        let request = ActionRequest::from_json(body)?;
        self.run(request).await
    }

    pub async fn run(&self, request: ActionRequest) -> Result<String, MuseError> {
        let kind = request.kind();
        info!(action = kind.key(), "running action");
        match request {
            ActionRequest::Unhinge(req) => self.unhinge(req).await,
            ActionRequest::Unleash(req) => self.unleash(req).await,
            ActionRequest::NoMercy(req) => self.no_mercy(req).await,
            ActionRequest::Invoke(req) => self.invoke(req).await,
            ActionRequest::Intensify(req) => self.intensify(req).await,
            ActionRequest::CharacterChat(req) => self.character_chat(req).await,
            ActionRequest::DevilPov(req) => self.devil_pov(req).await,
        }
    }

    async fn generate(&self, kind: ActionKind, messages: Vec<Message>) -> Result<String, MuseError> {
        let prompt_chars: usize = messages.iter().map(|m| m.content.len()).sum();
        info!(action = kind.key(), messages = messages.len(), prompt_chars, "prompt composed");
        Ok(self.llm.generate(&messages, kind.sampling()).await?)
    }

    async fn unhinge(&self, req: UnhingeRequest) -> Result<String, MuseError> {
        let chapter = required(req.chapter_content.as_deref(), "No content to unhinge")?;
        self.generate(ActionKind::Unhinge, compose::unhinge(chapter))
            .await
    }

    async fn no_mercy(&self, req: RewriteRequest) -> Result<String, MuseError> {
        let text = required(req.selected_text.as_deref(), "No text selected for rewrite")?;
        self.generate(ActionKind::NoMercy, compose::no_mercy(text))
            .await
    }

    async fn intensify(&self, req: RewriteRequest) -> Result<String, MuseError> {
        let text = required(req.selected_text.as_deref(), "No text selected to intensify")?;
        self.generate(ActionKind::Intensify, compose::intensify(text))
            .await
    }

    async fn unleash(&self, req: UnleashRequest) -> Result<String, MuseError> {
        let chapter = required(req.chapter_content.as_deref(), "No content to continue from")?;
        let ctx = self
            .fetcher
            .gather(Lookups {
                personality: Some(&req.character_tags),
                catalyst: Some(&req.catalyst_tags),
                ..Default::default()
            })
            .await;
        self.generate(ActionKind::Unleash, compose::unleash(chapter, &ctx))
            .await
    }

    async fn invoke(&self, req: InvokeRequest) -> Result<String, MuseError> {
        let ctx = self
            .fetcher
            .gather(Lookups {
                personality: Some(&req.character_tags),
                catalyst: Some(&req.catalyst_tags),
                ..Default::default()
            })
            .await;
        self.generate(ActionKind::Invoke, compose::invoke(&req, &ctx))
            .await
    }

    async fn character_chat(&self, req: CharacterChatRequest) -> Result<String, MuseError> {
        info!(
            character = req.character_name.as_deref().unwrap_or_default(),
            character_id = ?req.character_id,
            tags = %req.character_tags.joined(),
            story = %req.story_tags.joined(),
            tone = %req.tone_tags.joined(),
            history = req.chat_history.as_ref().map_or(0, Vec::len),
            "character chat"
        );
        let message = required(req.user_message.as_deref(), "No message provided")?;

        let started = Instant::now();
        // Characters double as catalyst keys.
        let ctx = self
            .fetcher
            .gather(Lookups {
                personality: Some(&req.character_tags),
                chat_history: Some(&req.character_tags),
                chapters: Some(&req.story_tags),
                catalyst: Some(&req.character_tags),
            })
            .await;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "chat context fetched");
        for (idx, session) in ctx.chat_history.iter().enumerate() {
            debug!(session = idx + 1, messages = session.messages.len(), "stored chat session");
        }
        for chapter in &ctx.chapters {
            debug!(title = %chapter.title, chars = chapter.content.chars().count(), "related chapter");
        }

        self.generate(
            ActionKind::CharacterChat,
            compose::character_chat(&req, message, &ctx),
        )
        .await
    }

    async fn devil_pov(&self, req: DevilPovRequest) -> Result<String, MuseError> {
        let started = Instant::now();
        let ctx = self
            .fetcher
            .gather(Lookups {
                personality: Some(&req.character_tags),
                chat_history: Some(&req.character_tags),
                chapters: Some(&req.story_tags),
                catalyst: Some(&req.catalyst_tags),
            })
            .await;
        info!(elapsed_ms = started.elapsed().as_millis() as u64, "context fetched");
        self.generate(ActionKind::DevilPov, compose::devil_pov(&req, &ctx))
            .await
    }
}
