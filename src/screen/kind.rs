use crate::model::{Earning, Expense, NewEarning, NewExpense, Record};
use crate::store::Store;
use crate::validate::{EarningForm, ExpenseForm};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;

/// The parts of a screen that differ between earnings and expenses. `Screen<K>` is written once
/// against this trait.
#[async_trait::async_trait]
pub trait RecordKind: Send + Sync + 'static {
    type Record: Record + Clone + Debug + Serialize + Send + Sync;
    type Form: Clone + Debug + Default + Send + Sync;
    type New: Debug + Send + Sync;

    /// A lowercase singular noun for log messages, e.g. "earning".
    const NAME: &'static str;

    fn validate(form: &Self::Form) -> Result<Self::New>;

    async fn insert(store: &dyn Store, new: &Self::New) -> Result<i64>;

    async fn list(store: &dyn Store) -> Result<Vec<Self::Record>>;

    async fn delete(store: &dyn Store, id: i64) -> Result<bool>;
}

/// Selects the earnings table for a `Screen`.
#[derive(Debug, Clone, Copy)]
pub struct Earnings;

/// Selects the expenses table for a `Screen`.
#[derive(Debug, Clone, Copy)]
pub struct Expenses;

#[async_trait::async_trait]
impl RecordKind for Earnings {
    type Record = Earning;
    type Form = EarningForm;
    type New = NewEarning;

    const NAME: &'static str = "earning";

    fn validate(form: &EarningForm) -> Result<NewEarning> {
        form.validate()
    }

    async fn insert(store: &dyn Store, new: &NewEarning) -> Result<i64> {
        store.insert_earning(new).await
    }

    async fn list(store: &dyn Store) -> Result<Vec<Earning>> {
        store.list_earnings().await
    }

    async fn delete(store: &dyn Store, id: i64) -> Result<bool> {
        store.delete_earning(id).await
    }
}

#[async_trait::async_trait]
impl RecordKind for Expenses {
    type Record = Expense;
    type Form = ExpenseForm;
    type New = NewExpense;

    const NAME: &'static str = "expense";

    fn validate(form: &ExpenseForm) -> Result<NewExpense> {
        form.validate()
    }

    async fn insert(store: &dyn Store, new: &NewExpense) -> Result<i64> {
        store.insert_expense(new).await
    }

    async fn list(store: &dyn Store) -> Result<Vec<Expense>> {
        store.list_expenses().await
    }

    async fn delete(store: &dyn Store, id: i64) -> Result<bool> {
        store.delete_expense(id).await
    }
}
