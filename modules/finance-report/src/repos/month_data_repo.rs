//! Read-only month queries over the ledger store
//!
//! Both queries take an inclusive `[start, end]` timestamp window and run on
//! a caller-supplied connection so a report can keep one session for both
//! of its months.

use chrono::NaiveDateTime;
use sqlx::{FromRow, SqliteConnection};

use crate::models::{AccountNature, TransactionType, TransactionWithAccount};

/// Pre-aggregated metrics for one window, as computed by the store
#[derive(Debug, Clone, Copy, PartialEq, FromRow)]
pub struct MonthMetricsRow {
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub margin: f64,
}

/// Query all bookings in the window joined with their account nature
///
/// Bookings whose account code is missing from the chart of accounts are
/// not returned.
pub async fn query_transactions_in_range(
    conn: &mut SqliteConnection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<TransactionWithAccount>, sqlx::Error> {
    sqlx::query_as::<_, TransactionWithAccount>(
        r#"
        SELECT
            ts.id,
            ts.account_code,
            ts.transaction_type,
            ts.amount_minor,
            ts.transaction_date,
            ac.account_nature
        FROM transact ts
        INNER JOIN account ac ON ac.account_code = ts.account_code
        WHERE ts.transaction_date >= ?1
          AND ts.transaction_date <= ?2
        ORDER BY ts.transaction_date ASC, ts.id ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await
}

/// Aggregate revenue, expenses, profit and margin for the window
///
/// Sums run over integer minor units. The final conversions mirror the
/// in-process aggregation operation for operation (`minor / 100.0` and
/// `profit_minor * 100.0 / revenue_minor`), so both paths yield the same
/// floating-point values.
pub async fn query_metrics_in_range(
    conn: &mut SqliteConnection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<MonthMetricsRow, sqlx::Error> {
    sqlx::query_as::<_, MonthMetricsRow>(
        r#"
        SELECT
            totals.revenue_minor / 100.0 AS revenue,
            totals.expenses_minor / 100.0 AS expenses,
            (totals.revenue_minor + totals.expenses_minor) / 100.0 AS profit,
            CASE
                WHEN totals.revenue_minor != 0
                THEN (totals.revenue_minor + totals.expenses_minor) * 100.0 / totals.revenue_minor
                ELSE 0.0
            END AS margin
        FROM (
            SELECT
                COALESCE(SUM(
                    CASE
                        WHEN month_trans.account_nature = ?1 AND month_trans.transaction_type = ?3
                            THEN month_trans.amount_minor
                        WHEN month_trans.account_nature = ?1 AND month_trans.transaction_type = ?4
                            THEN -month_trans.amount_minor
                        ELSE 0
                    END
                ), 0) AS revenue_minor,
                COALESCE(SUM(
                    CASE
                        WHEN month_trans.account_nature = ?2 AND month_trans.transaction_type = ?3
                            THEN month_trans.amount_minor
                        WHEN month_trans.account_nature = ?2 AND month_trans.transaction_type = ?4
                            THEN -month_trans.amount_minor
                        ELSE 0
                    END
                ), 0) AS expenses_minor
            FROM (
                SELECT ts.transaction_type, ts.amount_minor, ac.account_nature
                FROM transact ts
                INNER JOIN account ac ON ac.account_code = ts.account_code
                WHERE ts.transaction_date >= ?5
                  AND ts.transaction_date <= ?6
            ) month_trans
        ) totals
        "#,
    )
    .bind(AccountNature::Income.as_str())
    .bind(AccountNature::Expense.as_str())
    .bind(TransactionType::Credit.as_str())
    .bind(TransactionType::Debit.as_str())
    .bind(start)
    .bind(end)
    .fetch_one(conn)
    .await
}
