//! Ledger records held by the in-memory store.

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Nature of a chart-of-accounts entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountNature {
    Income,
    Expense,
}

impl AccountNature {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountNature::Income => "income",
            AccountNature::Expense => "expense",
        }
    }

    /// Parse the stored text; anything other than the exact lowercase
    /// names is not a recognised nature
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "income" => Some(AccountNature::Income),
            "expense" => Some(AccountNature::Expense),
            _ => None,
        }
    }
}

/// Direction of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "credit" => Some(TransactionType::Credit),
            "debit" => Some(TransactionType::Debit),
            _ => None,
        }
    }
}

/// Chart of Accounts entry
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub account_code: String,
    pub account_nature: String,
}

/// Single booking from the transaction ledger
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Transaction {
    pub account_code: String,
    pub transaction_type: String,
    pub amount_minor: i64,
    pub transaction_date: NaiveDateTime,
}

/// Transaction joined with the nature of its account
///
/// Type and nature are kept as stored text: unrecognised values are
/// legal and simply contribute nothing to the metrics.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TransactionWithAccount {
    pub id: i64,
    pub account_code: String,
    pub transaction_type: String,
    pub amount_minor: i64,
    pub transaction_date: NaiveDateTime,
    pub account_nature: String,
}

impl TransactionWithAccount {
    pub fn nature(&self) -> Option<AccountNature> {
        AccountNature::parse(&self.account_nature)
    }

    pub fn kind(&self) -> Option<TransactionType> {
        TransactionType::parse(&self.transaction_type)
    }
}
