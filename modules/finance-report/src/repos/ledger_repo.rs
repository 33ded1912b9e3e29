//! Write-side access to the ledger tables, used by the bulk loader.

use sqlx::{Sqlite, SqlitePool, Transaction as SqlTransaction};

use crate::models::{Account, Transaction};

/// Insert a chart-of-accounts entry within a transaction
pub async fn insert_account(
    tx: &mut SqlTransaction<'_, Sqlite>,
    account: &Account,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO account (account_code, account_nature)
        VALUES (?1, ?2)
        "#,
    )
    .bind(&account.account_code)
    .bind(&account.account_nature)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Insert a ledger booking within a transaction
pub async fn insert_transaction(
    tx: &mut SqlTransaction<'_, Sqlite>,
    transaction: &Transaction,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO transact (account_code, transaction_type, amount_minor, transaction_date)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&transaction.account_code)
    .bind(&transaction.transaction_type)
    .bind(transaction.amount_minor)
    .bind(transaction.transaction_date)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn count_accounts(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM account")
        .fetch_one(pool)
        .await
}

pub async fn count_transactions(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transact")
        .fetch_one(pool)
        .await
}

/// List all accounts ordered by code
pub async fn list_accounts(pool: &SqlitePool) -> Result<Vec<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        r#"
        SELECT account_code, account_nature
        FROM account
        ORDER BY account_code ASC
        "#,
    )
    .fetch_all(pool)
    .await
}
