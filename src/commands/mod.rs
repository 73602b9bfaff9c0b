//! Command handlers for the finance CLI.
//!
//! Each handler drives a screen view-model the same way an interactive front end would: it
//! mounts the screen, sets the form, submits or removes, and renders the screen's snapshot as the
//! command's message.

mod init;
mod records;
mod summary;

use crate::model::{format_decimal, Earning, Expense};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use init::init;
pub use records::{add_earning, add_expense, delete, list};
pub use summary::summary;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// A record that can be printed as a row of a markdown table.
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self, currency_symbol: &str) -> Vec<String>;
}

impl TableRow for Earning {
    const HEADERS: &'static [&'static str] = &["Id", "Date", "Amount", "Description"];

    fn cells(&self, currency_symbol: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_date(&self.date),
            format_amount(self.amount.map(|a| a.value()), currency_symbol),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for Expense {
    const HEADERS: &'static [&'static str] = &["Id", "Date", "Amount", "Category", "Description"];

    fn cells(&self, currency_symbol: &str) -> Vec<String> {
        vec![
            self.id.to_string(),
            format_date(&self.date),
            format_amount(self.amount.map(|a| a.value()), currency_symbol),
            self.category.to_string(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

fn format_amount(value: Option<rust_decimal::Decimal>, currency_symbol: &str) -> String {
    match value {
        Some(v) => format_decimal(v, currency_symbol),
        None => "(invalid)".to_string(),
    }
}

/// Renders `rows` as a markdown table with padded columns.
pub(crate) fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(table_line(headers.iter().copied(), &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push(format!("| {} |", rule.join(" | ")));
    for row in rows {
        out.push(table_line(row.iter().map(String::as_str), &widths));
    }
    out.join("\n")
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, w)| format!("{c}{}", " ".repeat(w.saturating_sub(c.chars().count()))))
        .collect();
    format!("| {} |", padded.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Category};
    use rust_decimal::Decimal;

    #[test]
    fn test_markdown_table() {
        let table = markdown_table(
            &["Id", "Name"],
            &[
                vec!["1".to_string(), "a".to_string()],
                vec!["10".to_string(), "longer".to_string()],
            ],
        );
        let expected = "\
| Id | Name   |
| -- | ------ |
| 1  | a      |
| 10 | longer |";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_expense_cells() {
        let expense = Expense {
            id: 4,
            amount: Some(Amount::new(Decimal::new(123456, 2))),
            category: Category::Grocery,
            description: Some("milk".to_string()),
            date: DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        assert_eq!(
            expense.cells("₹"),
            vec!["4", "2026-01-02 03:04", "₹1,234.56", "Grocery", "milk"]
        );
    }

    #[test]
    fn test_malformed_amount_cell() {
        let earning = Earning {
            id: 1,
            amount: None,
            description: None,
            date: Utc::now(),
        };
        assert_eq!(earning.cells("$")[2], "(invalid)");
        assert_eq!(earning.cells("$")[3], "");
    }
}
