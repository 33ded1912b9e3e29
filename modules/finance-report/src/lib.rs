pub mod config;
pub mod dates;
pub mod db;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod repos;
pub mod routes;
pub mod services;

use db::Store;
use metrics::Metrics;
use services::data_loader::SourceFiles;
use services::metrics_calculator::MetricsStrategy;

pub use routes::router;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub sources: SourceFiles,
    pub strategy: MetricsStrategy,
    pub metrics: Metrics,
}
