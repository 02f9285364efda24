//! Action keys, their sampling parameters, and request payloads.

use llm::Sampling;
use lore::Tags;
use serde::Deserialize;
use serde_json::Value;

/// The request-handling strategies behind `/devil-pov`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Unhinge,
    Unleash,
    NoMercy,
    Invoke,
    Intensify,
    CharacterChat,
    DevilPov,
}

static ACTIONS: [(&str, ActionKind); 7] = [
    ("unhinge", ActionKind::Unhinge),
    ("unleash", ActionKind::Unleash),
    ("noMercy", ActionKind::NoMercy),
    ("invoke", ActionKind::Invoke),
    ("intensify", ActionKind::Intensify),
    ("characterChat", ActionKind::CharacterChat),
    ("devilPOV", ActionKind::DevilPov),
];

impl ActionKind {
    /// Look up an action by its wire key. Missing or unknown keys select
    /// [`ActionKind::DevilPov`].
    pub fn from_key(key: Option<&str>) -> Self {
        key.and_then(|key| ACTIONS.iter().find(|(name, _)| *name == key))
            .map(|(_, kind)| *kind)
            .unwrap_or(Self::DevilPov)
    }

    pub fn key(self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(name, _)| *name)
            .unwrap_or("devilPOV")
    }

    pub fn sampling(self) -> Sampling {
        match self {
            Self::Unhinge => Sampling::new(0.9, 3000),
            Self::Unleash => Sampling::new(0.85, 2000),
            Self::NoMercy => Sampling::new(0.9, 1500),
            Self::Invoke => Sampling::new(0.85, 800),
            Self::Intensify => Sampling::new(0.8, 1500),
            Self::CharacterChat => Sampling::new(0.85, 500),
            Self::DevilPov => Sampling::new(0.9, 2500),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnhingeRequest {
    pub chapter_content: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnleashRequest {
    pub chapter_content: Option<String>,
    pub character_tags: Tags,
    pub catalyst_tags: Tags,
}

/// Payload of the selection rewrites, `noMercy` and `intensify`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriteRequest {
    pub selected_text: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvokeRequest {
    pub user_prompt: Option<String>,
    pub context_before: Option<String>,
    pub context_after: Option<String>,
    pub character_tags: Tags,
    pub catalyst_tags: Tags,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterChatRequest {
    pub user_message: Option<String>,
    pub character_id: Option<Value>,
    pub character_name: Option<String>,
    pub persona_type: Option<String>,
    pub chatbot_instructions: Option<String>,
    pub pov: Option<String>,
    pub character_tags: Tags,
    pub story_tags: Tags,
    pub tone_tags: Tags,
    /// The running conversation as `{role, content}` entries, oldest first.
    pub chat_history: Option<Vec<Value>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevilPovRequest {
    pub character_name: Option<String>,
    pub character_tags: Tags,
    pub story_tags: Tags,
    pub tone_tags: Tags,
    pub catalyst_tags: Tags,
}

/// A parsed `/devil-pov` body.
#[derive(Clone, Debug)]
pub enum ActionRequest {
    Unhinge(UnhingeRequest),
    Unleash(UnleashRequest),
    NoMercy(RewriteRequest),
    Invoke(InvokeRequest),
    Intensify(RewriteRequest),
    CharacterChat(CharacterChatRequest),
    DevilPov(DevilPovRequest),
}

impl ActionRequest {
    /// Select the action from the body's `action` field and parse the rest of
    /// the body as that action's payload.
    pub fn from_json(body: Value) -> Result<Self, serde_json::Error> {
        let kind = ActionKind::from_key(body.get("action").and_then(Value::as_str));
        Ok(match kind {
            ActionKind::Unhinge => Self::Unhinge(serde_json::from_value(body)?),
            ActionKind::Unleash => Self::Unleash(serde_json::from_value(body)?),
            ActionKind::NoMercy => Self::NoMercy(serde_json::from_value(body)?),
            ActionKind::Invoke => Self::Invoke(serde_json::from_value(body)?),
            ActionKind::Intensify => Self::Intensify(serde_json::from_value(body)?),
            ActionKind::CharacterChat => Self::CharacterChat(serde_json::from_value(body)?),
            ActionKind::DevilPov => Self::DevilPov(serde_json::from_value(body)?),
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Unhinge(_) => ActionKind::Unhinge,
            Self::Unleash(_) => ActionKind::Unleash,
            Self::NoMercy(_) => ActionKind::NoMercy,
            Self::Invoke(_) => ActionKind::Invoke,
            Self::Intensify(_) => ActionKind::Intensify,
            Self::CharacterChat(_) => ActionKind::CharacterChat,
            Self::DevilPov(_) => ActionKind::DevilPov,
        }
    }
}
