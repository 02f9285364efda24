//! Prompt strategies behind the `/devil-pov` endpoint.
//!
//! An inbound body is parsed into an [`ActionRequest`], whose handler on
//! [`Muse`] fetches story context, composes a role-tagged prompt with the
//! templates in [`compose`], and asks the [`llm::Generator`] for text.

pub mod action;
pub mod compose;
pub mod error;
pub mod relay;
pub mod templates;

pub use action::{
    ActionKind, ActionRequest, CharacterChatRequest, DevilPovRequest, InvokeRequest,
    RewriteRequest, UnhingeRequest, UnleashRequest,
};
pub use error::MuseError;
pub use relay::Muse;
