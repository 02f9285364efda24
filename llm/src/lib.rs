//! Client side of the text-generation endpoint.
//!
//! The `llm` crate defines the [`Generator`] trait used by the prompt
//! handlers, the role-tagged [`Message`] model and its linearized form, and a
//! concrete [`KoboldClient`] that talks to a KoboldCpp-style `generate` API.
//! A [`MockGenerator`] is provided for tests.

pub mod client;
pub mod message;
pub mod mock;
pub mod traits;

pub use client::{KoboldClient, KoboldConfig};
pub use message::{linearize, Message, Role};
pub use mock::{GenerateCall, MockGenerator};
pub use traits::{Generator, LLMError, Sampling};
