//! Pure functions that turn record lists into totals.

use crate::model::{Category, Earning, Expense, Record};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sums the amounts of `records`. An empty list sums to zero and a record whose amount is missing
/// contributes zero. A sum beyond the range of `Decimal` saturates.
pub fn sum_amounts<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Decimal
where
    R: Record + 'a,
{
    records
        .into_iter()
        .map(|r| r.amount().map(|a| a.value()).unwrap_or_default())
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Earnings minus expenses. There is no floor, the balance can be negative.
pub fn compute_balance(earnings_total: Decimal, expenses_total: Decimal) -> Decimal {
    earnings_total.saturating_sub(expenses_total)
}

/// The balance as a whole percentage of the earnings, rounded half away from zero. Zero when
/// there are no earnings. Values beyond the range of `i64` saturate.
pub fn compute_savings_percentage(earnings_total: Decimal, expenses_total: Decimal) -> i64 {
    if earnings_total <= Decimal::ZERO {
        return 0;
    }
    let balance = compute_balance(earnings_total, expenses_total);
    let percentage = balance
        .checked_div(earnings_total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    match percentage {
        Some(p) => {
            let rounded = p.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
                i64::MIN
            } else {
                i64::MAX
            })
        }
        None if balance.is_sign_negative() => i64::MIN,
        None => i64::MAX,
    }
}

/// Sums expenses per category. Every category is present in the result, unused ones with zero.
pub fn totals_by_category<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> BTreeMap<Category, Decimal> {
    let mut totals: BTreeMap<Category, Decimal> =
        Category::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();
    for expense in expenses {
        let amount = expense.amount.map(|a| a.value()).unwrap_or_default();
        let total = totals.entry(expense.category).or_default();
        *total = total.saturating_add(amount);
    }
    totals
}

/// The headline numbers shown on the summary screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_earnings: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub savings_percentage: i64,
}

impl Totals {
    /// Computes all totals from one snapshot of both tables.
    pub fn compute(earnings: &[Earning], expenses: &[Expense]) -> Self {
        let total_earnings = sum_amounts(earnings);
        let total_expenses = sum_amounts(expenses);
        Self {
            total_earnings,
            total_expenses,
            balance: compute_balance(total_earnings, total_expenses),
            savings_percentage: compute_savings_percentage(total_earnings, total_expenses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn earning(id: i64, amount: Option<&str>) -> Earning {
        Earning {
            id,
            amount: amount.map(|a| Amount::new(dec(a))),
            description: None,
            date: Utc::now(),
        }
    }

    fn expense(id: i64, amount: &str, category: Category) -> Expense {
        Expense {
            id,
            amount: Some(Amount::new(dec(amount))),
            category,
            description: None,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_sum_amounts() {
        let earnings = vec![
            earning(1, Some("100.25")),
            earning(2, Some("0.75")),
            earning(3, Some("49")),
        ];
        assert_eq!(sum_amounts(&earnings), dec("150"));
    }

    #[test]
    fn test_sum_amounts_empty() {
        let earnings: Vec<Earning> = Vec::new();
        assert_eq!(sum_amounts(&earnings), Decimal::ZERO);
    }

    #[test]
    fn test_sum_amounts_missing_amount_counts_as_zero() {
        let earnings = vec![earning(1, Some("10")), earning(2, None), earning(3, Some("5"))];
        assert_eq!(sum_amounts(&earnings), dec("15"));
        assert_eq!(sum_amounts(&[earning(1, None)]), Decimal::ZERO);
    }

    #[test]
    fn test_sum_amounts_saturates_instead_of_overflowing() {
        let earnings = vec![
            Earning {
                amount: Some(Amount::new(Decimal::MAX)),
                ..earning(1, None)
            },
            Earning {
                amount: Some(Amount::new(Decimal::MAX)),
                ..earning(2, None)
            },
        ];
        assert_eq!(sum_amounts(&earnings), Decimal::MAX);

        let expenses = vec![
            Expense {
                amount: Some(Amount::new(Decimal::MAX)),
                ..expense(1, "0", Category::Food)
            },
            Expense {
                amount: Some(Amount::new(Decimal::MAX)),
                ..expense(2, "0", Category::Food)
            },
        ];
        assert_eq!(totals_by_category(&expenses)[&Category::Food], Decimal::MAX);
        assert_eq!(compute_balance(Decimal::MIN, Decimal::MAX), Decimal::MIN);
    }

    #[test]
    fn test_compute_balance() {
        assert_eq!(compute_balance(dec("1000"), dec("200")), dec("800"));
        assert_eq!(compute_balance(dec("100"), dec("250.5")), dec("-150.5"));
        assert_eq!(compute_balance(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_savings_percentage() {
        assert_eq!(compute_savings_percentage(dec("1000"), dec("200")), 80);
        assert_eq!(compute_savings_percentage(dec("1000"), dec("1000")), 0);
        assert_eq!(compute_savings_percentage(dec("100"), dec("250")), -150);
    }

    #[test]
    fn test_savings_percentage_rounding() {
        // 2/3 saved -> 66.67%
        assert_eq!(compute_savings_percentage(dec("3"), dec("1")), 67);
        // 12.5% rounds away from zero
        assert_eq!(compute_savings_percentage(dec("8"), dec("7")), 13);
        assert_eq!(compute_savings_percentage(dec("8"), dec("9")), -13);
    }

    #[test]
    fn test_savings_percentage_zero_earnings() {
        assert_eq!(compute_savings_percentage(Decimal::ZERO, dec("500")), 0);
        assert_eq!(compute_savings_percentage(Decimal::ZERO, Decimal::ZERO), 0);
    }

    #[test]
    fn test_savings_percentage_saturates() {
        let p = compute_savings_percentage(dec("0.0000001"), Decimal::MAX);
        assert_eq!(p, i64::MIN);
    }

    #[test]
    fn test_totals_by_category() {
        let expenses = vec![
            expense(1, "10", Category::Food),
            expense(2, "5.5", Category::Food),
            expense(3, "100", Category::Compulsory),
        ];
        let totals = totals_by_category(&expenses);
        assert_eq!(totals.len(), 4);
        assert_eq!(totals[&Category::Food], dec("15.5"));
        assert_eq!(totals[&Category::Compulsory], dec("100"));
        assert_eq!(totals[&Category::Grocery], Decimal::ZERO);
        assert_eq!(totals[&Category::Miscellaneous], Decimal::ZERO);
    }

    #[test]
    fn test_totals_compute() {
        let earnings = vec![earning(1, Some("1000"))];
        let expenses = vec![expense(1, "200", Category::Food)];
        let totals = Totals::compute(&earnings, &expenses);
        assert_eq!(
            totals,
            Totals {
                total_earnings: dec("1000"),
                total_expenses: dec("200"),
                balance: dec("800"),
                savings_percentage: 80,
            }
        );
    }
}
