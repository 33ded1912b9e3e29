#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;

use finance_report::db::Store;
use finance_report::metrics::Metrics;
use finance_report::services::data_loader::SourceFiles;
use finance_report::services::metrics_calculator::MetricsStrategy;
use finance_report::AppState;

pub const ACCOUNTS_HEADER: &str = "account_code,account_name,account_nature\n";
pub const TRANSACTIONS_HEADER: &str = "account_code,transaction_type,amount,transaction_date\n";

/// Fresh, empty in-memory store with the schema applied.
pub async fn setup_store() -> Store {
    Store::connect_in_memory()
        .await
        .expect("Failed to create in-memory store")
}

/// The sample ledger shipped in `data/`.
pub fn sample_sources() -> SourceFiles {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    SourceFiles {
        accounts: data_dir.join("chart-of-accounts.csv"),
        transactions: data_dir.join("bookings.csv"),
    }
}

/// Write both ledger files into `dir` and return their locations.
pub fn write_sources(dir: &Path, accounts: &str, transactions: &str) -> SourceFiles {
    let sources = SourceFiles {
        accounts: dir.join("accounts.csv"),
        transactions: dir.join("bookings.csv"),
    };
    std::fs::write(&sources.accounts, accounts).expect("Failed to write accounts file");
    std::fs::write(&sources.transactions, transactions).expect("Failed to write bookings file");
    sources
}

/// Store already holding the sample ledger.
pub async fn loaded_store() -> Store {
    let store = setup_store().await;
    finance_report::services::data_loader::ensure_loaded(&store, &sample_sources())
        .await
        .expect("Failed to load sample ledger");
    store
}

/// Build the full service router around `store` for testing.
pub fn app(store: Store, sources: SourceFiles, strategy: MetricsStrategy) -> Router {
    let metrics = Metrics::new().expect("Failed to create metrics registry");
    finance_report::router(Arc::new(AppState {
        store,
        sources,
        strategy,
        metrics,
    }))
}

pub fn fixture(name: &str) -> String {
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("Failed to read fixture")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Read response body as text.
pub async fn body_text(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read response body as JSON.
pub async fn body_json(response: axum::http::Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
