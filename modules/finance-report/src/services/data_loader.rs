//! Data Loader
//!
//! Ingests the chart of accounts and the transaction ledger from CSV into the
//! in-memory store. The load happens at most once per store: the first
//! successful call fills both tables inside one SQL transaction, later calls
//! are no-ops. A failed load leaves the store empty so the next call retries.
//!
//! File format: comma-delimited with a header row. Amounts use a decimal
//! comma (`"1234,56"`, quoted so the comma is not a delimiter) and are kept
//! as integer minor units. Dates are `YYYY-MM-DD`. Account codes are opaque
//! text. The sum of all amounts must fit in an `i64` of minor units, which
//! keeps every month total and profit in range for both metrics strategies.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use thiserror::Error;

use crate::db::Store;
use crate::models::{Account, AccountNature, Transaction, TransactionType};
use crate::repos::ledger_repo;

const ACCOUNT_COLUMNS: [&str; 2] = ["account_code", "account_nature"];
const TRANSACTION_COLUMNS: [&str; 4] = [
    "account_code",
    "transaction_type",
    "amount",
    "transaction_date",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Location of the two ledger source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFiles {
    pub accounts: PathBuf,
    pub transactions: PathBuf,
}

/// Result of a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { accounts: usize, transactions: usize },
    AlreadyLoaded,
}

/// Errors that can occur while loading the ledger
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Issue with loading data from csv file \"{file}\": {reason}")]
    Source { file: String, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LoadError {
    fn in_file(path: &Path, reason: impl Into<String>) -> Self {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        LoadError::Source {
            file,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AccountRecord {
    account_code: String,
    account_nature: String,
}

#[derive(Debug, Deserialize)]
struct TransactionRecord {
    account_code: String,
    transaction_type: String,
    amount: String,
    transaction_date: String,
}

/// Load both files into the store unless it already holds ledger data
pub async fn ensure_loaded(store: &Store, files: &SourceFiles) -> Result<LoadOutcome, LoadError> {
    let mut loaded = store.lock_load_state().await;
    if *loaded {
        return Ok(LoadOutcome::AlreadyLoaded);
    }

    if ledger_repo::count_accounts(store.pool()).await? > 0 {
        tracing::debug!("Ledger store already populated; skipping load");
        *loaded = true;
        return Ok(LoadOutcome::AlreadyLoaded);
    }

    let (accounts, transactions) = match read_sources(files).await {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read ledger source files");
            return Err(e);
        }
    };

    let mut tx = store.pool().begin().await?;
    for account in &accounts {
        ledger_repo::insert_account(&mut tx, account).await?;
    }
    for transaction in &transactions {
        ledger_repo::insert_transaction(&mut tx, transaction).await?;
    }
    tx.commit().await?;

    *loaded = true;

    tracing::info!(
        accounts = accounts.len(),
        transactions = transactions.len(),
        accounts_file = %files.accounts.display(),
        transactions_file = %files.transactions.display(),
        "Ledger loaded into store"
    );

    Ok(LoadOutcome::Loaded {
        accounts: accounts.len(),
        transactions: transactions.len(),
    })
}

async fn read_sources(files: &SourceFiles) -> Result<(Vec<Account>, Vec<Transaction>), LoadError> {
    let accounts_raw = read_file(&files.accounts).await?;
    let transactions_raw = read_file(&files.transactions).await?;

    let accounts = parse_accounts(&files.accounts, &accounts_raw)?;
    let transactions = parse_transactions(&files.transactions, &transactions_raw)?;

    Ok((accounts, transactions))
}

async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LoadError::in_file(path, e.to_string()))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(LoadError::in_file(path, "No columns to parse from file"));
    }

    Ok(bytes)
}

fn csv_reader(raw: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw)
}

fn check_columns(
    path: &Path,
    reader: &mut csv::Reader<&[u8]>,
    required: &[&str],
) -> Result<(), LoadError> {
    let headers = reader
        .headers()
        .map_err(|e| LoadError::in_file(path, e.to_string()))?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if !missing.is_empty() {
        return Err(LoadError::in_file(
            path,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    Ok(())
}

/// Parse the chart of accounts; extra columns are ignored
pub fn parse_accounts(path: &Path, raw: &[u8]) -> Result<Vec<Account>, LoadError> {
    let mut reader = csv_reader(raw);
    check_columns(path, &mut reader, &ACCOUNT_COLUMNS)?;

    let mut accounts = Vec::new();
    for (index, record) in reader.deserialize::<AccountRecord>().enumerate() {
        let record = record.map_err(|e| LoadError::in_file(path, e.to_string()))?;
        let line = index + 2;
        check_account_code(path, line, &record.account_code)?;

        if AccountNature::parse(&record.account_nature).is_none() {
            tracing::warn!(
                line,
                account_code = %record.account_code,
                account_nature = %record.account_nature,
                "Unrecognised account nature; account will not contribute to metrics"
            );
        }

        accounts.push(Account {
            account_code: record.account_code,
            account_nature: record.account_nature,
        });
    }

    Ok(accounts)
}

/// Parse the transaction ledger; extra columns are ignored
pub fn parse_transactions(path: &Path, raw: &[u8]) -> Result<Vec<Transaction>, LoadError> {
    let mut reader = csv_reader(raw);
    check_columns(path, &mut reader, &TRANSACTION_COLUMNS)?;

    let mut transactions = Vec::new();
    let mut ledger_total: i64 = 0;
    for (index, record) in reader.deserialize::<TransactionRecord>().enumerate() {
        let record = record.map_err(|e| LoadError::in_file(path, e.to_string()))?;
        let line = index + 2;
        check_account_code(path, line, &record.account_code)?;

        let amount_minor = parse_amount_minor(&record.amount)
            .map_err(|reason| LoadError::in_file(path, format!("line {line}: {reason}")))?;

        ledger_total = ledger_total.checked_add(amount_minor).ok_or_else(|| {
            LoadError::in_file(
                path,
                format!("line {line}: ledger total exceeds the supported amount range"),
            )
        })?;

        let transaction_date = NaiveDate::parse_from_str(&record.transaction_date, DATE_FORMAT)
            .map_err(|e| {
                LoadError::in_file(
                    path,
                    format!(
                        "line {line}: invalid transaction_date '{}': {e}",
                        record.transaction_date
                    ),
                )
            })?
            .and_time(NaiveTime::MIN);

        if TransactionType::parse(&record.transaction_type).is_none() {
            tracing::warn!(
                line,
                transaction_type = %record.transaction_type,
                "Unrecognised transaction type; booking will not contribute to metrics"
            );
        }

        transactions.push(Transaction {
            account_code: record.account_code,
            transaction_type: record.transaction_type,
            amount_minor,
            transaction_date,
        });
    }

    Ok(transactions)
}

fn check_account_code(path: &Path, line: usize, code: &str) -> Result<(), LoadError> {
    if code.is_empty() {
        return Err(LoadError::in_file(path, format!("line {line}: empty account_code")));
    }
    Ok(())
}

/// Parse a decimal-comma amount into minor units (hundredths)
///
/// A decimal point is accepted as well. Sub-cent digits are rounded half
/// away from zero.
pub fn parse_amount_minor(raw: &str) -> Result<i64, String> {
    let normalized = raw.trim().replace(',', ".");

    let amount = Decimal::from_str(&normalized)
        .map_err(|e| format!("invalid amount '{raw}': {e}"))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("invalid amount '{raw}': amounts must not be negative"));
    }

    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| format!("invalid amount '{raw}': out of range"))
}
