use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use finance_report::{config::Config, db::Store, metrics::Metrics, router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;

    // Console always, file as well when LOG_FILE is set
    let file_layer = match &cfg.log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!(
        host = %cfg.host,
        port = cfg.port,
        data_dir = %cfg.data_dir.display(),
        strategy = %cfg.metrics_strategy,
        "Configuration loaded"
    );

    let store = Store::connect_in_memory().await?;
    let metrics = Metrics::new()?;

    let state = Arc::new(AppState {
        store,
        sources: cfg.source_files(),
        strategy: cfg.metrics_strategy,
        metrics,
    });

    let app = router(state);

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Finance report service listening");

    axum::serve(listener, app).await?;

    Ok(())
}
