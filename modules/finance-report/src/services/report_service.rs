//! Report Service
//!
//! Entry point for the two-month comparison: makes sure the ledger is
//! loaded, opens one store session, computes both months with the
//! configured strategy and renders the text report.

use chrono::NaiveDate;
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::db::Store;
use crate::services::data_loader::{self, LoadError, SourceFiles};
use crate::services::metrics_calculator::{
    absolute_diff, percent_diff, MetricValues, MetricsStrategy, MonthMetrics,
};
use crate::services::month_data::MonthDataError;
use crate::services::report_formatter::format_report;

/// Everything needed to render the comparison of two months
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub first_month: MonthMetrics,
    pub second_month: MonthMetrics,
    pub absolute_diff: MetricValues,
    pub percent_diff: MetricValues,
}

/// Errors surfaced while producing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Ingestion(String),

    #[error("Database error: {0}")]
    Store(#[source] sqlx::Error),

    #[error("{0}")]
    Validation(String),
}

impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        ReportError::Store(err)
    }
}

impl From<MonthDataError> for ReportError {
    fn from(err: MonthDataError) -> Self {
        match err {
            MonthDataError::Database(e) => ReportError::Store(e),
            other => ReportError::Validation(other.to_string()),
        }
    }
}

impl From<LoadError> for ReportError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Database(e) => ReportError::Store(e),
            other => ReportError::Ingestion(other.to_string()),
        }
    }
}

/// Compute both months and their differences on an open session
pub async fn build_report(
    strategy: MetricsStrategy,
    conn: &mut SqliteConnection,
    first_date: NaiveDate,
    second_date: NaiveDate,
) -> Result<Report, MonthDataError> {
    tracing::debug!(%first_date, %second_date, strategy = %strategy, "Building report");

    let first_month = strategy.month_metrics(&mut *conn, first_date).await?;
    let second_month = strategy.month_metrics(&mut *conn, second_date).await?;

    let report = Report {
        first_month,
        second_month,
        absolute_diff: absolute_diff(&first_month.values, &second_month.values),
        percent_diff: percent_diff(&first_month.values, &second_month.values),
    };

    tracing::debug!(
        first = ?report.first_month.values,
        second = ?report.second_month.values,
        "Report built"
    );

    Ok(report)
}

/// Produce the formatted comparison of the months containing the two dates
pub async fn generate_finance_report(
    store: &Store,
    sources: &SourceFiles,
    strategy: MetricsStrategy,
    first_date: NaiveDate,
    second_date: NaiveDate,
) -> Result<String, ReportError> {
    data_loader::ensure_loaded(store, sources).await?;

    let mut session = store.session().await?;
    let report = build_report(strategy, &mut session, first_date, second_date).await?;
    drop(session);

    tracing::info!(
        %first_date,
        %second_date,
        strategy = %strategy,
        "Finance report generated"
    );

    Ok(format_report(&report))
}
