//! Implements the `Store` trait using in-memory data.
//!
//! Used by tests to drive the view-models without a database. It can also be switched into an
//! "unavailable" state to exercise the storage failure paths.

use crate::error::{ErrorType, IntoResult};
use crate::model::{Earning, Expense, NewEarning, NewExpense};
use crate::store::Store;
use crate::Result;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    earnings: Vec<Earning>,
    expenses: Vec<Expense>,
    last_earning_id: i64,
    last_expense_id: i64,
}

/// An implementation of the `Store` trait that holds records in memory. Ids are never reused,
/// matching the `AUTOINCREMENT` behavior of the SQLite tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
    lists_unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While `unavailable` is true every operation fails with `ErrorType::StorageUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// While `unavailable` is true only `list_earnings` and `list_expenses` fail, so a mutation can
    /// succeed and the reload that follows it can fail.
    pub fn set_lists_unavailable(&self, unavailable: bool) {
        self.lists_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Pushes an earning row as-is, bypassing validation. Used to simulate malformed rows.
    pub fn push_raw_earning(&self, earning: Earning) -> Result<()> {
        let mut tables = self.lock()?;
        tables.last_earning_id = tables.last_earning_id.max(earning.id);
        tables.earnings.push(earning);
        Ok(())
    }

    fn lock_for_list(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        if self.lists_unavailable.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("The in-memory store cannot list records"))
                .pub_result(ErrorType::StorageUnavailable);
        }
        self.lock()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("The in-memory store is unavailable"))
                .pub_result(ErrorType::StorageUnavailable);
        }
        match self.tables.lock() {
            Ok(guard) => Ok(guard),
            Err(_) => Err(anyhow::anyhow!("The in-memory store is poisoned"))
                .pub_result(ErrorType::Storage),
        }
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        drop(self.lock()?);
        Ok(())
    }

    async fn insert_earning(&self, earning: &NewEarning) -> Result<i64> {
        let mut tables = self.lock()?;
        tables.last_earning_id += 1;
        let id = tables.last_earning_id;
        tables.earnings.push(Earning {
            id,
            amount: Some(earning.amount),
            description: earning.description.clone(),
            date: Utc::now(),
        });
        Ok(id)
    }

    async fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let mut tables = self.lock()?;
        tables.last_expense_id += 1;
        let id = tables.last_expense_id;
        tables.expenses.push(Expense {
            id,
            amount: Some(expense.amount),
            category: expense.category,
            description: expense.description.clone(),
            date: Utc::now(),
        });
        Ok(id)
    }

    async fn list_earnings(&self) -> Result<Vec<Earning>> {
        Ok(self.lock_for_list()?.earnings.clone())
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.lock_for_list()?.expenses.clone())
    }

    async fn delete_earning(&self, id: i64) -> Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.earnings.len();
        tables.earnings.retain(|e| e.id != id);
        Ok(tables.earnings.len() < before)
    }

    async fn delete_expense(&self, id: i64) -> Result<bool> {
        let mut tables = self.lock()?;
        let before = tables.expenses.len();
        tables.expenses.retain(|e| e.id != id);
        Ok(tables.expenses.len() < before)
    }
}
