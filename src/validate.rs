//! The validation boundary. Raw user input enters the crate as an `EarningForm` or an
//! `ExpenseForm` and leaves as a `NewEarning` or `NewExpense`; the store only accepts the latter.

use crate::model::{format_decimal, Amount, Category, NewEarning, NewExpense};
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Amounts are stored in a `REAL` column, which holds 15 significant digits exactly. Two decimal
/// places leave 13 for the whole part.
const MAX_DECIMAL_PLACES: u32 = 2;
const MAX_AMOUNT: Decimal = Decimal::from_parts(1316134912, 2328, 0, false, 0);

/// The pending input fields of the earnings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningForm {
    pub amount: String,
    pub description: String,
}

impl EarningForm {
    pub fn new(amount: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<NewEarning> {
        Ok(NewEarning {
            amount: validate_amount(&self.amount)?,
            description: Some(validate_description(&self.description)?),
        })
    }
}

/// The pending input fields of the expenses screen. `category` starts out as `Compulsory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            category: Category::default().to_string(),
            description: String::new(),
        }
    }
}

impl ExpenseForm {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<NewExpense> {
        Ok(NewExpense {
            amount: validate_amount(&self.amount)?,
            category: validate_category(&self.category)?,
            description: Some(validate_description(&self.description)?),
        })
    }
}

/// Requires a strictly positive number with at most two decimal places that is below `MAX_AMOUNT`.
/// The kind of record carries the direction of the money, so a sign on the amount is meaningless
/// and is rejected.
pub fn validate_amount(input: &str) -> Result<Amount> {
    if input.trim().is_empty() {
        return Err(Error::validation("Please enter an amount"));
    }
    let amount = Amount::from_str(input).map_err(Error::validation)?;
    if !amount.is_positive() {
        return Err(Error::validation("The amount must be greater than zero"));
    }
    let value = amount.value().normalize();
    if value.scale() > MAX_DECIMAL_PLACES {
        return Err(Error::validation(format!(
            "The amount can have at most {MAX_DECIMAL_PLACES} decimal places"
        )));
    }
    if value >= MAX_AMOUNT {
        return Err(Error::validation(format!(
            "The amount must be less than {}",
            format_decimal(MAX_AMOUNT, "")
        )));
    }
    Ok(Amount::new(value))
}

pub fn validate_description(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Please enter a description"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_category(input: &str) -> Result<Category> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Please select a category"));
    }
    Category::from_str(trimmed).map_err(|_| {
        let allowed = Category::ALL.map(|c| c.to_string()).join(", ");
        Error::validation(format!(
            "Invalid category '{trimmed}', expected one of: {allowed}"
        ))
    })
}
