//! Metrics Calculator
//!
//! Derives revenue, expenses, profit and margin for one month and the
//! absolute and percentage differences between two months.
//!
//! Two strategies share the same output contract:
//! - [`MetricsStrategy::TransactionLevel`] fetches the month's bookings and
//!   aggregates them in process ([`aggregate_transactions`]).
//! - [`MetricsStrategy::PreAggregated`] lets the store run the equivalent
//!   aggregate query and copies the resulting row.
//!
//! Sign convention: revenue and expenses are both "credits minus debits",
//! so expenses are usually negative and `profit = revenue + expenses`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::SqliteConnection;

use crate::models::{AccountNature, TransactionType, TransactionWithAccount};
use crate::repos::month_data_repo::MonthMetricsRow;
use crate::services::month_data::{self, MonthDataError};

/// Revenue, expenses, profit and margin
///
/// Used both for a single month and for the difference between two months.
/// Every field defaults to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricValues {
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub margin: f64,
}

impl MetricValues {
    /// Build month metrics from net revenue and net expenses in minor units
    pub fn from_minor_totals(revenue_minor: i64, expenses_minor: i64) -> Self {
        let profit_minor = revenue_minor + expenses_minor;

        let margin = if revenue_minor != 0 {
            profit_minor as f64 * 100.0 / revenue_minor as f64
        } else {
            0.0
        };

        MetricValues {
            revenue: minor_to_units(revenue_minor),
            expenses: minor_to_units(expenses_minor),
            profit: minor_to_units(profit_minor),
            margin,
        }
    }
}

impl From<MonthMetricsRow> for MetricValues {
    fn from(row: MonthMetricsRow) -> Self {
        MetricValues {
            revenue: row.revenue,
            expenses: row.expenses,
            profit: row.profit,
            margin: row.margin,
        }
    }
}

/// Metrics for one calendar month, anchored at the requested date
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthMetrics {
    pub month_date: NaiveDate,
    pub values: MetricValues,
}

/// How month metrics are derived from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricsStrategy {
    /// Fetch every booking of the month and aggregate in process
    TransactionLevel,
    /// Let the store aggregate and copy its single result row
    #[default]
    PreAggregated,
}

impl MetricsStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricsStrategy::TransactionLevel => "transactions",
            MetricsStrategy::PreAggregated => "aggregated",
        }
    }

    /// Derive the metrics of the month containing `month_date`
    pub async fn month_metrics(
        self,
        conn: &mut SqliteConnection,
        month_date: NaiveDate,
    ) -> Result<MonthMetrics, MonthDataError> {
        let values = match self {
            MetricsStrategy::TransactionLevel => {
                let transactions = month_data::get_transactions(conn, month_date).await?;
                aggregate_transactions(&transactions)
            }
            MetricsStrategy::PreAggregated => {
                let row = month_data::get_month_metrics(conn, month_date).await?;
                MetricValues::from(row)
            }
        };

        Ok(MonthMetrics { month_date, values })
    }
}

impl FromStr for MetricsStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactions" => Ok(MetricsStrategy::TransactionLevel),
            "aggregated" => Ok(MetricsStrategy::PreAggregated),
            other => Err(format!("unknown metrics strategy: {other}")),
        }
    }
}

impl fmt::Display for MetricsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate a month of bookings into metrics
///
/// Order of the input does not matter: totals are accumulated as exact
/// integer minor units before conversion.
pub fn aggregate_transactions(transactions: &[TransactionWithAccount]) -> MetricValues {
    let mut revenue_minor: i64 = 0;
    let mut expenses_minor: i64 = 0;

    for transaction in transactions {
        let nature = transaction.nature();
        let kind = transaction.kind();

        revenue_minor += revenue_in_row(nature, kind, transaction.amount_minor);
        expenses_minor += expense_in_row(nature, kind, transaction.amount_minor);
    }

    MetricValues::from_minor_totals(revenue_minor, expenses_minor)
}

/// Revenue contribution of one booking: (income credit) - (income debit)
pub fn revenue_in_row(
    nature: Option<AccountNature>,
    kind: Option<TransactionType>,
    amount_minor: i64,
) -> i64 {
    match nature {
        Some(AccountNature::Income) => signed_amount(kind, amount_minor),
        _ => 0,
    }
}

/// Expense contribution of one booking: (expense credit) - (expense debit)
pub fn expense_in_row(
    nature: Option<AccountNature>,
    kind: Option<TransactionType>,
    amount_minor: i64,
) -> i64 {
    match nature {
        Some(AccountNature::Expense) => signed_amount(kind, amount_minor),
        _ => 0,
    }
}

/// Credits count positive, debits negative, anything else zero
pub fn signed_amount(kind: Option<TransactionType>, amount_minor: i64) -> i64 {
    match kind {
        Some(TransactionType::Credit) => amount_minor,
        Some(TransactionType::Debit) => -amount_minor,
        None => 0,
    }
}

/// Field-wise `first - second`
pub fn absolute_diff(first: &MetricValues, second: &MetricValues) -> MetricValues {
    MetricValues {
        revenue: first.revenue - second.revenue,
        expenses: first.expenses - second.expenses,
        profit: first.profit - second.profit,
        margin: first.margin - second.margin,
    }
}

/// Field-wise change of `first` relative to `|second|`, in percent
///
/// A field whose `second` value is zero is left at zero.
pub fn percent_diff(first: &MetricValues, second: &MetricValues) -> MetricValues {
    MetricValues {
        revenue: percent_change(first.revenue, second.revenue),
        expenses: percent_change(first.expenses, second.expenses),
        profit: percent_change(first.profit, second.profit),
        margin: percent_change(first.margin, second.margin),
    }
}

fn percent_change(first: f64, second: f64) -> f64 {
    if second != 0.0 {
        (first - second) * 100.0 / second.abs()
    } else {
        0.0
    }
}

fn minor_to_units(minor: i64) -> f64 {
    minor as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    const EPSILON: f64 = 1e-9;

    fn booking(nature: &str, kind: &str, amount_minor: i64) -> TransactionWithAccount {
        TransactionWithAccount {
            id: 1,
            account_code: "4000".to_string(),
            transaction_type: kind.to_string(),
            amount_minor,
            transaction_date: NaiveDateTime::default(),
            account_nature: nature.to_string(),
        }
    }

    fn values(revenue: f64, expenses: f64, profit: f64, margin: f64) -> MetricValues {
        MetricValues {
            revenue,
            expenses,
            profit,
            margin,
        }
    }

    #[test]
    fn test_revenue_in_row() {
        let income = Some(AccountNature::Income);
        let expense = Some(AccountNature::Expense);
        let credit = Some(TransactionType::Credit);
        let debit = Some(TransactionType::Debit);

        assert_eq!(revenue_in_row(income, credit, 100), 100);
        assert_eq!(revenue_in_row(income, debit, 100), -100);
        assert_eq!(revenue_in_row(expense, credit, 100), 0);
        assert_eq!(revenue_in_row(expense, debit, 100), 0);
        assert_eq!(revenue_in_row(None, credit, 100), 0);
    }

    #[test]
    fn test_expense_in_row() {
        let income = Some(AccountNature::Income);
        let expense = Some(AccountNature::Expense);
        let credit = Some(TransactionType::Credit);
        let debit = Some(TransactionType::Debit);

        assert_eq!(expense_in_row(expense, credit, 100), 100);
        assert_eq!(expense_in_row(expense, debit, 100), -100);
        assert_eq!(expense_in_row(income, credit, 100), 0);
        assert_eq!(expense_in_row(income, debit, 100), 0);
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(signed_amount(Some(TransactionType::Credit), 1), 1);
        assert_eq!(signed_amount(Some(TransactionType::Debit), 1), -1);
        assert_eq!(signed_amount(None, 1), 0);
    }

    #[test]
    fn test_income_credit_contributes_to_revenue_only() {
        let metrics = aggregate_transactions(&[booking("income", "credit", 10_000)]);

        assert_eq!(metrics.revenue, 100.0);
        assert_eq!(metrics.expenses, 0.0);
        assert_eq!(metrics.profit, 100.0);
        assert_eq!(metrics.margin, 100.0);
    }

    #[test]
    fn test_expense_debit_contributes_to_expenses_only() {
        let metrics = aggregate_transactions(&[booking("expense", "debit", 5_000)]);

        assert_eq!(metrics.revenue, 0.0);
        assert_eq!(metrics.expenses, -50.0);
        assert_eq!(metrics.profit, -50.0);
        // No revenue, so no margin
        assert_eq!(metrics.margin, 0.0);
    }

    #[test]
    fn test_malformed_rows_contribute_nothing() {
        let metrics = aggregate_transactions(&[
            booking("income", "garbage", 10_000),
            booking("asset", "credit", 10_000),
            booking("", "", 10_000),
        ]);

        assert_eq!(metrics, MetricValues::default());
    }

    #[test]
    fn test_aggregate_mixed_month() {
        let metrics = aggregate_transactions(&[
            booking("income", "credit", 1_250_000),
            booking("income", "debit", 45_025),
            booking("expense", "debit", 400_000),
            booking("expense", "credit", 2_040),
        ]);

        assert_eq!(metrics.revenue, 12_049.75);
        assert_eq!(metrics.expenses, -3_979.60);
        assert!((metrics.profit - (metrics.revenue + metrics.expenses)).abs() < EPSILON);
        assert!((metrics.margin - metrics.profit / metrics.revenue * 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let mut rows = vec![
            booking("income", "credit", 333),
            booking("income", "credit", 10_001),
            booking("expense", "debit", 777),
            booking("income", "debit", 1),
        ];
        let forward = aggregate_transactions(&rows);
        rows.reverse();
        let backward = aggregate_transactions(&rows);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        assert_eq!(aggregate_transactions(&[]), MetricValues::default());
        assert_eq!(MetricValues::from_minor_totals(0, -1_000).margin, 0.0);
    }

    #[test]
    fn test_absolute_diff() {
        let first = values(100.0, -40.0, 60.0, 60.0);
        let second = values(50.0, -50.0, 0.0, 0.0);

        let diff = absolute_diff(&first, &second);

        assert_eq!(diff, values(50.0, 10.0, 60.0, 60.0));
    }

    #[test]
    fn test_percent_diff_uses_absolute_denominator() {
        let first = values(150.0, -30.0, 120.0, 80.0);
        let second = values(100.0, -60.0, 40.0, 40.0);

        let diff = percent_diff(&first, &second);

        assert_eq!(diff.revenue, 50.0);
        // (-30 - -60) * 100 / |-60|
        assert_eq!(diff.expenses, 50.0);
        assert_eq!(diff.profit, 200.0);
        assert_eq!(diff.margin, 100.0);
    }

    #[test]
    fn test_percent_diff_zero_denominator_stays_zero() {
        let first = values(150.0, -30.0, 120.0, 80.0);
        let second = values(0.0, 0.0, 0.0, 0.0);

        let diff = percent_diff(&first, &second);

        assert_eq!(diff, MetricValues::default());
        assert!(!diff.revenue.is_nan());
    }

    #[test]
    fn test_percent_diff_zero_denominator_is_per_field() {
        let first = values(150.0, -30.0, 120.0, 80.0);
        let second = values(100.0, 0.0, 100.0, 0.0);

        let diff = percent_diff(&first, &second);

        assert_eq!(diff.revenue, 50.0);
        assert_eq!(diff.expenses, 0.0);
        assert_eq!(diff.profit, 20.0);
        assert_eq!(diff.margin, 0.0);
    }

    #[test]
    fn test_pre_aggregated_row_is_copied() {
        let row = MonthMetricsRow {
            revenue: 1.0,
            expenses: 2.0,
            profit: 3.0,
            margin: 4.0,
        };

        assert_eq!(MetricValues::from(row), values(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "transactions".parse::<MetricsStrategy>().unwrap(),
            MetricsStrategy::TransactionLevel
        );
        assert_eq!(
            " Aggregated ".parse::<MetricsStrategy>().unwrap(),
            MetricsStrategy::PreAggregated
        );
        assert!("both".parse::<MetricsStrategy>().is_err());
        assert_eq!(MetricsStrategy::default().to_string(), "aggregated");
    }
}
