//! Month data sources
//!
//! Translate a month anchor date into the inclusive store window
//! `[first day 00:00:00, last day 23:59:59.999999]` and fetch either the raw
//! bookings or the pre-aggregated metrics for it.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::SqliteConnection;
use thiserror::Error;

use crate::dates::{first_day_of_month, last_day_of_month};
use crate::models::TransactionWithAccount;
use crate::repos::month_data_repo::{self, MonthMetricsRow};

/// Errors raised while reading one month from the store
#[derive(Debug, Error)]
pub enum MonthDataError {
    #[error("Date {0} is outside the supported calendar range")]
    OutOfRange(NaiveDate),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn month_window(month_date: NaiveDate) -> Result<(NaiveDateTime, NaiveDateTime), MonthDataError> {
    let end = last_day_of_month(month_date).ok_or(MonthDataError::OutOfRange(month_date))?;
    Ok((first_day_of_month(month_date), end))
}

/// All bookings of the month containing `month_date`
pub async fn get_transactions(
    conn: &mut SqliteConnection,
    month_date: NaiveDate,
) -> Result<Vec<TransactionWithAccount>, MonthDataError> {
    let (start, end) = month_window(month_date)?;

    let transactions = month_data_repo::query_transactions_in_range(conn, start, end).await?;

    tracing::debug!(
        %month_date,
        %start,
        %end,
        count = transactions.len(),
        "Fetched month transactions"
    );

    Ok(transactions)
}

/// Store-aggregated metrics of the month containing `month_date`
pub async fn get_month_metrics(
    conn: &mut SqliteConnection,
    month_date: NaiveDate,
) -> Result<MonthMetricsRow, MonthDataError> {
    let (start, end) = month_window(month_date)?;

    let row = month_data_repo::query_metrics_in_range(conn, start, end).await?;

    tracing::debug!(%month_date, ?row, "Fetched month metrics");

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_window() {
        let (start, end) = month_window(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()).unwrap();

        assert_eq!(start.to_string(), "2020-06-01 00:00:00");
        assert_eq!(end.to_string(), "2020-06-30 23:59:59.999999");
    }

    #[test]
    fn test_month_window_out_of_range() {
        let err = month_window(NaiveDate::MAX).unwrap_err();
        assert!(matches!(err, MonthDataError::OutOfRange(d) if d == NaiveDate::MAX));
    }
}
