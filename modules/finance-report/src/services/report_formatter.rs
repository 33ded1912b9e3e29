//! Report Formatter
//!
//! Renders a [`Report`] as five newline-terminated CSV-like lines: a header
//! with the month labels, then Revenues, Expenses, Profits and Margins rows.

use chrono::{Datelike, NaiveDate};

use crate::dates::month_name;
use crate::services::report_service::Report;

pub const REVENUES: &str = "Revenues";
pub const EXPENSES: &str = "Expenses";
pub const PROFITS: &str = "Profits";
pub const MARGINS: &str = "Margins";

/// Render the full report text
pub fn format_report(report: &Report) -> String {
    let first = &report.first_month.values;
    let second = &report.second_month.values;
    let abs = &report.absolute_diff;
    let pct = &report.percent_diff;

    let mut raw = format_header(report.first_month.month_date, report.second_month.month_date);

    raw.push_str(&format_row(
        REVENUES,
        first.revenue,
        second.revenue,
        abs.revenue,
        pct.revenue,
    ));
    raw.push_str(&format_row(
        EXPENSES,
        first.expenses,
        second.expenses,
        abs.expenses,
        pct.expenses,
    ));
    raw.push_str(&format_row(
        PROFITS,
        first.profit,
        second.profit,
        abs.profit,
        pct.profit,
    ));
    raw.push_str(&format_margins(
        first.margin,
        second.margin,
        abs.margin,
        pct.margin,
    ));

    raw
}

/// Header line
///
/// Both comparison labels carry the first month's year, even when the
/// second month belongs to another year.
pub fn format_header(first_month_date: NaiveDate, second_month_date: NaiveDate) -> String {
    let first_name = month_name(first_month_date);
    let second_name = month_name(second_month_date);
    let first_year = first_month_date.year();
    let second_year = second_month_date.year();

    format!(
        ",\"{first_name}, {first_year}\"\
         ,\"{second_name}, {second_year}\"\
         ,\"{first_name} vs {second_name}, {first_year} (Abs)\"\
         ,\"{first_name} vs {second_name}, {first_year} (%)\"\n"
    )
}

/// Labelled money row (Revenues, Expenses, Profits)
pub fn format_row(label: &str, col1: f64, col2: f64, col3: f64, col4: f64) -> String {
    format!("{label}{}", format_by_default(col1, col2, col3, col4))
}

/// Columns shared by the money rows: three values at 2dp, percent at 1dp
pub fn format_by_default(col1: f64, col2: f64, col3: f64, col4: f64) -> String {
    format!(",{col1:.2},{col2:.2},{col3:.2},{col4:.1}%\n")
}

/// Margins row: everything at 1dp, absolute diff in percentage points
pub fn format_margins(col1: f64, col2: f64, col3: f64, col4: f64) -> String {
    format!("{MARGINS},{col1:.1}%,{col2:.1}%,{col3:.1} p.p.,{col4:.1}%\n")
}
