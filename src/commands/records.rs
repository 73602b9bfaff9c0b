use crate::args::{AddEarningArgs, AddExpenseArgs};
use crate::commands::{markdown_table, Out, TableRow};
use crate::model::format_decimal;
use crate::screen::{Earnings, EarningsScreen, Expenses, ExpensesScreen, RecordKind, Screen};
use crate::validate::{EarningForm, ExpenseForm};
use crate::{Config, Result};

/// Prints every record of kind `K`, newest first, followed by the total.
pub async fn list<K>(config: Config) -> Result<Out<Vec<K::Record>>>
where
    K: RecordKind,
    K::Record: TableRow,
{
    let mut screen = Screen::<K>::new(config.store());
    screen.on_mount().await?;
    let message = render(&screen, config.currency_symbol());
    Ok(Out::new(message, screen.records().to_vec()))
}

/// Records an earning and prints the new total.
pub async fn add_earning(config: Config, args: &AddEarningArgs) -> Result<Out<i64>> {
    let mut screen = EarningsScreen::new(config.store());
    screen.on_mount().await?;
    screen.set_form(EarningForm::new(args.amount(), args.description()));
    let id = screen.submit().await?;
    Ok(added::<Earnings>(&screen, id, config.currency_symbol()))
}

/// Records an expense and prints the new total.
pub async fn add_expense(config: Config, args: &AddExpenseArgs) -> Result<Out<i64>> {
    let mut screen = ExpensesScreen::new(config.store());
    screen.on_mount().await?;
    screen.set_form(ExpenseForm::new(
        args.amount(),
        args.category(),
        args.description(),
    ));
    let id = screen.submit().await?;
    Ok(added::<Expenses>(&screen, id, config.currency_symbol()))
}

/// Deletes the record of kind `K` with `id`. A missing id is reported but is not an error.
pub async fn delete<K: RecordKind>(config: Config, id: i64) -> Result<Out<bool>> {
    let mut screen = Screen::<K>::new(config.store());
    screen.on_mount().await?;
    let deleted = screen.remove(id).await?;
    let total = format_decimal(screen.total(), config.currency_symbol());
    let message = if deleted && screen.is_stale() {
        format!("Deleted {} {id}{}", K::NAME, stale_suffix(&screen))
    } else if deleted {
        format!("Deleted {} {id}, the total is now {total}", K::NAME)
    } else {
        format!("There is no {} with id {id}, nothing was deleted", K::NAME)
    };
    Ok(Out::new(message, deleted))
}

fn added<K: RecordKind>(screen: &Screen<K>, id: i64, currency_symbol: &str) -> Out<i64> {
    if screen.is_stale() {
        return Out::new(format!("Added {} {id}{}", K::NAME, stale_suffix(screen)), id);
    }
    let total = format_decimal(screen.total(), currency_symbol);
    Out::new(
        format!("Added {} {id}, the total is now {total}", K::NAME),
        id,
    )
}

/// The change was saved but the list could not be read back.
fn stale_suffix<K: RecordKind>(screen: &Screen<K>) -> String {
    let reason = screen.notice().map(|n| n.message()).unwrap_or_default();
    format!(", but the new total could not be loaded: {reason}")
}

fn render<K>(screen: &Screen<K>, currency_symbol: &str) -> String
where
    K: RecordKind,
    K::Record: TableRow,
{
    let total = format_decimal(screen.total(), currency_symbol);
    if screen.records().is_empty() {
        return format!("There are no {}s yet, the total is {total}", K::NAME);
    }
    let rows: Vec<Vec<String>> = screen
        .records()
        .iter()
        .map(|r| r.cells(currency_symbol))
        .collect();
    format!(
        "\n{}\n\nTotal: {total}",
        markdown_table(<K::Record as TableRow>::HEADERS, &rows)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_add_and_list_earnings() {
        let env = TestEnv::new().await;
        let args = AddEarningArgs::new("150.5", "freelance");

        let out = add_earning(env.config(), &args).await.unwrap();
        assert_eq!(out.structure(), Some(&1));
        assert_eq!(out.message(), "Added earning 1, the total is now ₹150.50");

        let out = list::<Earnings>(env.config()).await.unwrap();
        let records = out.structure().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description.as_deref(), Some("freelance"));
        assert!(out.message().contains("| 1  |"));
        assert!(out.message().contains("₹150.50"));
        assert!(out.message().ends_with("Total: ₹150.50"));
    }

    #[tokio::test]
    async fn test_list_empty() {
        let env = TestEnv::new().await;
        let out = list::<Expenses>(env.config()).await.unwrap();
        assert_eq!(out.structure().map(Vec::len), Some(0));
        assert_eq!(
            out.message(),
            "There are no expenses yet, the total is ₹0.00"
        );
    }

    #[tokio::test]
    async fn test_add_expense_invalid_category() {
        let env = TestEnv::new().await;
        let args = AddExpenseArgs::new("200", "Invalid", "lunch");

        let err = add_expense(env.config(), &args).await.unwrap_err();

        assert_eq!(err.error_type(), ErrorType::Validation);
        assert_eq!(env.count_rows("expenses").await, 0);
    }

    #[tokio::test]
    async fn test_add_earning_beyond_the_largest_amount() {
        let env = TestEnv::new().await;
        let args = AddEarningArgs::new("79228162514264337593543950335", "huge");

        for _ in 0..2 {
            let err = add_earning(env.config(), &args).await.unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Validation);
        }

        assert_eq!(env.count_rows("earnings").await, 0);
        assert!(list::<Earnings>(env.config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_expense() {
        let env = TestEnv::new().await;
        add_expense(env.config(), &AddExpenseArgs::new("10", "Food", "snack"))
            .await
            .unwrap();

        let out = delete::<Expenses>(env.config(), 99).await.unwrap();

        assert_eq!(out.structure(), Some(&false));
        assert_eq!(
            out.message(),
            "There is no expense with id 99, nothing was deleted"
        );
        assert_eq!(env.count_rows("expenses").await, 1);
    }

    #[tokio::test]
    async fn test_delete_expense() {
        let env = TestEnv::new().await;
        add_expense(env.config(), &AddExpenseArgs::new("10", "Food", "snack"))
            .await
            .unwrap();
        add_expense(env.config(), &AddExpenseArgs::new("5", "Grocery", "eggs"))
            .await
            .unwrap();

        let out = delete::<Expenses>(env.config(), 1).await.unwrap();

        assert_eq!(out.structure(), Some(&true));
        assert_eq!(out.message(), "Deleted expense 1, the total is now ₹5.00");
    }
}
