use std::time::Duration;

use clap::Parser;
use llm::KoboldConfig;
use lore::WixConfig;

/// Server settings, read from flags or the environment.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
pub struct Config {
    /// Interface to bind the HTTP server
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server
    #[arg(long, env = "PORT", default_value_t = 3333)]
    pub port: u16,

    /// KoboldCpp-compatible generate URL. Every action fails while unset.
    #[arg(long, env = "RUNPOD_ENDPOINT")]
    pub runpod_endpoint: Option<String>,

    /// Wix API key, sent as the Authorization header
    #[arg(long, env = "WIX_API_KEY", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub wix_api_key: String,

    #[arg(long, env = "WIX_ACCOUNT_ID", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub wix_account_id: String,

    #[arg(long, env = "WIX_SITE_ID", default_value = "", hide_env_values = true, hide_default_value = true)]
    pub wix_site_id: String,

    /// Base URL of the Wix REST API
    #[arg(long, env = "WIX_API_URL", default_value = lore::wix::DEFAULT_BASE_URL)]
    pub wix_api_url: String,

    /// Seconds to wait for a generation before giving up
    #[arg(long = "inference-timeout", env = "INFERENCE_TIMEOUT_SECS", default_value_t = 300)]
    pub inference_timeout_secs: u64,

    /// Seconds to wait for a content store query
    #[arg(long = "store-timeout", env = "STORE_TIMEOUT_SECS", default_value_t = 30)]
    pub store_timeout_secs: u64,
}

impl Config {
    pub fn inference(&self) -> KoboldConfig {
        KoboldConfig {
            endpoint: self
                .runpod_endpoint
                .clone()
                .filter(|url| !url.trim().is_empty()),
            timeout: Duration::from_secs(self.inference_timeout_secs),
        }
    }

    pub fn store(&self) -> WixConfig {
        WixConfig {
            base_url: self.wix_api_url.trim_end_matches('/').to_string(),
            api_key: self.wix_api_key.clone(),
            account_id: self.wix_account_id.clone(),
            site_id: self.wix_site_id.clone(),
            timeout: Duration::from_secs(self.store_timeout_secs),
        }
    }

    /// Whether all three Wix credentials are present.
    pub fn has_store_credentials(&self) -> bool {
        [&self.wix_api_key, &self.wix_account_id, &self.wix_site_id]
            .iter()
            .all(|v| !v.is_empty())
    }
}
