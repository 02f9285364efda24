use std::sync::Arc;

use clap::Parser;
use devil_muse::{AppState, Config, app, init_logging};
use llm::KoboldClient;
use lore::WixStore;
use muse::Muse;
use tracing::{info, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_logging();

    let llm = KoboldClient::new(config.inference())?;
    let inference_configured = llm.is_configured();
    if inference_configured {
        info!("inference endpoint configured");
    } else {
        warn!("RUNPOD_ENDPOINT not set, every action will fail");
    }
    if !config.has_store_credentials() {
        warn!("Wix credentials incomplete, prompts will carry no stored context");
    }
    let store = WixStore::new(config.store())?;

    let state = AppState {
        muse: Muse::new(Arc::new(store), Arc::new(llm)),
        inference_configured,
    };

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(addr = %listener.local_addr()?, "devil muse listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
