//! HTTP front end for the muse: one generation endpoint plus a health check.

pub mod config;
pub mod logging;
pub mod web;

pub use config::Config;
pub use logging::init_logging;
pub use web::{AppState, app};
