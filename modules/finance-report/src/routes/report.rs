//! Report API Routes
//!
//! `GET /report?first_date=YYYY-MM-DD&second_date=YYYY-MM-DD` returns the
//! two-month comparison as plain text. Every failure, including bad query
//! parameters, is answered with 500 and a `{"detail": ...}` body.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    services::report_service::{self, ReportError},
    AppState,
};

const STORE_ERROR_MESSAGE: &str = "Issue with SQL database";

/// Query parameters for the report endpoint
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Any date inside the first month
    pub first_date: NaiveDate,
    /// Any date inside the second month
    pub second_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Handler for GET /report
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<String, ReportErrorResponse> {
    let result = match query {
        Ok(Query(params)) => {
            report_service::generate_finance_report(
                &state.store,
                &state.sources,
                state.strategy,
                params.first_date,
                params.second_date,
            )
            .await
        }
        Err(rejection) => Err(ReportError::Validation(rejection.body_text())),
    };

    state
        .metrics
        .finance_reports_total
        .with_label_values(&[result_label(&result)])
        .inc();

    result.map_err(ReportErrorResponse::from)
}

fn result_label(result: &Result<String, ReportError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ReportError::Ingestion(_)) => "ingestion_error",
        Err(ReportError::Store(_)) => "store_error",
        Err(ReportError::Validation(_)) => "validation_error",
    }
}

/// Error response wrapper for proper HTTP error handling
#[derive(Debug)]
pub struct ReportErrorResponse {
    pub status: StatusCode,
    pub message: String,
}

impl From<ReportError> for ReportErrorResponse {
    fn from(err: ReportError) -> Self {
        let message = match &err {
            ReportError::Ingestion(msg) => {
                tracing::error!(error = %msg, "Report failed: ledger could not be loaded");
                msg.clone()
            }
            ReportError::Store(e) => {
                tracing::error!(error = %e, "Report failed: store error");
                STORE_ERROR_MESSAGE.to_string()
            }
            ReportError::Validation(msg) => {
                tracing::warn!(error = %msg, "Report request rejected");
                msg.clone()
            }
        };

        ReportErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl IntoResponse for ReportErrorResponse {
    fn into_response(self) -> Response {
        let body = Json(ErrorDetail {
            detail: self.message,
        });
        (self.status, body).into_response()
    }
}
