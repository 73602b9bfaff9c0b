//! Types that represent the core data model: `Earning`, `Expense` and the values they hold.
mod amount;
mod category;
mod earning;
mod expense;

pub use amount::{format_decimal, Amount, AmountError};
pub use category::Category;
pub use earning::{Earning, NewEarning};
pub use expense::{Expense, NewExpense};

/// Behavior shared by stored records of both kinds.
pub trait Record {
    /// The store-assigned, never reused, identifier.
    fn id(&self) -> i64;

    /// The stored amount, or `None` if the row holds something that is not a number.
    fn amount(&self) -> Option<Amount>;
}
