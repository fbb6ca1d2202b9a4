//! Papyrix Web Server
//!
//! Run with: cargo run -p papyrix-web

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use papyrix_common::PapyrixConfig;
use papyrix_model::{GeneratorConfig, T5Generator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Papyrix Web Server...");

    let config = PapyrixConfig::load()?;

    // Model load happens once, up front; first run downloads from the Hub.
    let generator = T5Generator::new(GeneratorConfig {
        model_id: config.model.model_id.clone(),
        max_input_tokens: config.model.max_input_tokens,
        use_gpu: config.model.use_gpu,
    })
    .await?;

    let state = papyrix_web::state::AppState::new(Arc::new(generator));
    let app = papyrix_web::router::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
