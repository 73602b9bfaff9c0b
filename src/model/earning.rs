use crate::model::{Amount, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row from the `earnings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earning {
    pub id: i64,
    /// `None` when the stored value is missing or not a number.
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
}

impl Record for Earning {
    fn id(&self) -> i64 {
        self.id
    }

    fn amount(&self) -> Option<Amount> {
        self.amount
    }
}

/// A validated earning that is ready to be inserted. The store assigns `id` and `date`.
///
/// Construct one with `EarningForm::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEarning {
    pub(crate) amount: Amount,
    pub(crate) description: Option<String>,
}

impl NewEarning {
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
