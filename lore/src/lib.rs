//! Story context pulled from the Wix content store.
//!
//! [`ContentStore`] abstracts the filtered-query API, with [`WixStore`] as the
//! HTTP implementation and [`MockStore`] for tests. [`ContextFetcher`] sits on
//! top and turns raw records into the personality, chat history, chapters and
//! catalyst intel the prompt templates consume. Lookups never fail outward.

pub mod context;
pub mod fetch;
pub mod mock;
pub mod store;
pub mod tags;
pub mod wix;

pub use context::{Chapter, ChatLine, ChatSession, ContextBundle, MAX_CHAPTER_CHARS};
pub use fetch::{ContextFetcher, Lookups};
pub use mock::{MockStore, Query};
pub use store::{ContentStore, Filter, Record, StoreError};
pub use tags::Tags;
pub use wix::{WixConfig, WixStore};
