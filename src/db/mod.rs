//! This module is responsible for reading, writing and managing the SQLite database

mod migrations;

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{Amount, Category, Earning, Expense, NewEarning, NewExpense};
use crate::store::Store;
use crate::{Error, Result};
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub(crate) use migrations::CURRENT_VERSION;

/// Only numbers are read back as amounts. Anything else that ended up in the column comes back as
/// NULL and is treated as a missing amount.
const AMOUNT_COLUMN: &str =
    "CASE WHEN typeof(amount) IN ('integer', 'real') THEN CAST(amount AS TEXT) END AS amount";

/// The SQLite-backed record store. Cloning is cheap and clones share the same pool.
///
/// The pool holds a single connection, so statements issued through any clone are executed one
/// at a time.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
    path: PathBuf,
}

impl Db {
    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn init(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at '{}'", path.display());
        }
        let db = Self::connect(path, true).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// - Validates that there is a SQLite file at `path`
    /// - Creates a SQLite client
    /// - Updates the database schema with migrations if it is out-of-date
    /// - Returns a constructed `Db` object for further operations
    pub(crate) async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display());
        }
        let db = Self::connect(path, false).await?;
        db.migrate().await?;
        Ok(db)
    }

    async fn connect(path: &Path, create: bool) -> Res<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(create);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Unable to open the database at '{}'", path.display()))?;

        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the `schema_version` table if needed and runs any pending migrations.
    pub(crate) async fn migrate(&self) -> Res<()> {
        sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await
            .context("Failed to create schema_version table")?;

        let current = match self.schema_version().await? {
            Some(version) => version,
            None => {
                sqlx::query("INSERT INTO schema_version (version) VALUES (0)")
                    .execute(&self.pool)
                    .await
                    .context("Failed to insert initial schema version")?;
                0
            }
        };

        if current > CURRENT_VERSION {
            bail!(
                "The database schema is at version {current}, which is newer than the \
                 supported version {CURRENT_VERSION}. Is a newer version of this app installed?"
            );
        }

        migrations::run(&self.pool, current, CURRENT_VERSION).await
    }

    /// Returns the schema version, or `None` if it has never been recorded.
    pub(crate) async fn schema_version(&self) -> Res<Option<i32>> {
        let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
            .fetch_one(&self.pool)
            .await
            .context("Failed to query schema version")?;
        Ok(row.0)
    }

    async fn insert_earning_row(&self, earning: &NewEarning) -> Res<i64> {
        // REAL affinity stores the decimal text as a number.
        let result = sqlx::query("INSERT INTO earnings (amount, description) VALUES (?, ?)")
            .bind(earning.amount.value().to_string())
            .bind(earning.description.as_deref())
            .execute(&self.pool)
            .await
            .context("Failed to insert earning")?;
        Ok(result.last_insert_rowid())
    }

    async fn insert_expense_row(&self, expense: &NewExpense) -> Res<i64> {
        let result =
            sqlx::query("INSERT INTO expenses (amount, category, description) VALUES (?, ?, ?)")
                .bind(expense.amount.value().to_string())
                .bind(expense.category.to_string())
                .bind(expense.description.as_deref())
                .execute(&self.pool)
                .await
                .context("Failed to insert expense")?;
        Ok(result.last_insert_rowid())
    }

    async fn earning_rows(&self) -> Res<Vec<Earning>> {
        let sql =
            format!("SELECT id, {AMOUNT_COLUMN}, description, date FROM earnings ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list earnings")?;
        rows.iter().map(earning_from_row).collect()
    }

    async fn expense_rows(&self) -> Res<Vec<Expense>> {
        let sql = format!(
            "SELECT id, {AMOUNT_COLUMN}, category, description, date FROM expenses ORDER BY id"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list expenses")?;
        rows.iter().map(expense_from_row).collect()
    }

    async fn delete_row(&self, table: &str, id: i64) -> Res<bool> {
        let sql = format!("DELETE FROM {table} WHERE id = ?");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete id {id} from {table}"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns the number of rows in `table`.
    #[cfg(test)]
    pub(crate) async fn count_rows(&self, table: &str) -> Res<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        let row: (i64,) = sqlx::query_as(&sql)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to count rows in {table}"))?;
        Ok(row.0)
    }

    /// Executes raw SQL. Used by tests to plant rows that the app itself would never write.
    #[cfg(test)]
    pub(crate) async fn execute_raw(&self, sql: &str) -> Res<()> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Store for Db {
    async fn ensure_schema(&self) -> Result<()> {
        self.migrate()
            .await
            .pub_result(ErrorType::StorageUnavailable)
    }

    async fn insert_earning(&self, earning: &NewEarning) -> Result<i64> {
        let id = classify(self.insert_earning_row(earning).await)?;
        debug!("Inserted earning {id}");
        Ok(id)
    }

    async fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let id = classify(self.insert_expense_row(expense).await)?;
        debug!("Inserted expense {id}");
        Ok(id)
    }

    async fn list_earnings(&self) -> Result<Vec<Earning>> {
        classify(self.earning_rows().await)
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        classify(self.expense_rows().await)
    }

    async fn delete_earning(&self, id: i64) -> Result<bool> {
        let deleted = classify(self.delete_row("earnings", id).await)?;
        debug!("Delete earning {id}: deleted={deleted}");
        Ok(deleted)
    }

    async fn delete_expense(&self, id: i64) -> Result<bool> {
        let deleted = classify(self.delete_row("expenses", id).await)?;
        debug!("Delete expense {id}: deleted={deleted}");
        Ok(deleted)
    }
}

/// Connection and pool failures mean the database cannot be reached at all. Everything else is a
/// failed statement.
fn classify<T>(res: Res<T>) -> Result<T> {
    res.map_err(|e| {
        let error_type = match e.downcast_ref::<sqlx::Error>() {
            Some(
                sqlx::Error::Io(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Configuration(_),
            ) => ErrorType::StorageUnavailable,
            _ => ErrorType::Storage,
        };
        Error::new(error_type, e)
    })
}

fn earning_from_row(row: &SqliteRow) -> Res<Earning> {
    let id: i64 = row.try_get("id")?;
    Ok(Earning {
        id,
        amount: amount_from_row(row, "earnings", id)?,
        description: row.try_get("description")?,
        date: date_from_row(row)?,
    })
}

fn expense_from_row(row: &SqliteRow) -> Res<Expense> {
    let id: i64 = row.try_get("id")?;
    let category: String = row.try_get("category")?;
    Ok(Expense {
        id,
        amount: amount_from_row(row, "expenses", id)?,
        category: Category::from_str(&category)
            .with_context(|| format!("Unknown category '{category}' on expense {id}"))?,
        description: row.try_get("description")?,
        date: date_from_row(row)?,
    })
}

fn amount_from_row(row: &SqliteRow, table: &str, id: i64) -> Res<Option<Amount>> {
    let text: Option<String> = row.try_get("amount")?;
    let Some(text) = text else {
        warn!("Row {id} in {table} has a missing or non-numeric amount");
        return Ok(None);
    };
    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(value) => Ok(Some(Amount::new(value))),
        Err(e) => {
            warn!("Row {id} in {table} has an amount '{text}' that cannot be represented: {e}");
            Ok(None)
        }
    }
}

/// `CURRENT_TIMESTAMP` produces `YYYY-MM-DD HH:MM:SS` in UTC.
fn date_from_row(row: &SqliteRow) -> Res<DateTime<Utc>> {
    let text: String = row.try_get("date")?;
    if let Ok(naive) = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(&text)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Unable to parse the date '{text}'"))
}
