use crate::model::{Amount, Category, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row from the `expenses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    /// `None` when the stored value is missing or not a number.
    pub amount: Option<Amount>,
    pub category: Category,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

impl Record for Expense {
    fn id(&self) -> i64 {
        self.id
    }

    fn amount(&self) -> Option<Amount> {
        self.amount
    }
}

/// A validated expense that is ready to be inserted. Since `category` is a `Category`, an
/// expense outside of the allowed set cannot be represented.
///
/// Construct one with `ExpenseForm::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpense {
    pub(crate) amount: Amount,
    pub(crate) category: Category,
    pub(crate) description: Option<String>,
}

impl NewExpense {
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
