use dotenvy::dotenv;
use mediagrab::config::settings::AppConfig;
use mediagrab::infrastructure::storage::downloads::DownloadStore;
use mediagrab::state::AppState;
use mediagrab::{app, workers};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediagrab=info,tower_http=info".into()),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new();
    let storage = DownloadStore::new(config.download_dir.clone())?;
    let state = AppState::new(config.clone(), storage);

    workers::pipeline::spawn_workers(state.clone());

    let app = app::create_app(state);
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
