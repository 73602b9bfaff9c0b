//! The record store abstraction. The view-models talk to an injected `Store` so that they can be
//! driven by the SQLite database (`Db`) in the app and by `MemoryStore` in tests.

mod memory;

use crate::model::{Earning, Expense, NewEarning, NewExpense};
use crate::Result;

pub use memory::MemoryStore;

/// Durable storage of `Earning` and `Expense` records.
///
/// Every operation is a single atomic statement. Errors are classified as
/// `ErrorType::StorageUnavailable` or `ErrorType::Storage`.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Brings the schema up to date. Idempotent, safe to call on every start.
    async fn ensure_schema(&self) -> Result<()>;

    /// Appends an earning and returns its store-assigned id.
    async fn insert_earning(&self, earning: &NewEarning) -> Result<i64>;

    /// Appends an expense and returns its store-assigned id.
    async fn insert_expense(&self, expense: &NewExpense) -> Result<i64>;

    /// Returns all earnings in insertion order.
    async fn list_earnings(&self) -> Result<Vec<Earning>>;

    /// Returns all expenses in insertion order.
    async fn list_expenses(&self) -> Result<Vec<Expense>>;

    /// Deletes the earning with `id`. Returns `false`, not an error, if there was no such row.
    async fn delete_earning(&self, id: i64) -> Result<bool>;

    /// Deletes the expense with `id`. Returns `false`, not an error, if there was no such row.
    async fn delete_expense(&self, id: i64) -> Result<bool>;
}
