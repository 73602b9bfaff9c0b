use crate::commands::{markdown_table, Out};
use crate::model::format_decimal;
use crate::screen::{Summary, SummaryScreen};
use crate::{Config, Result};

/// Prints the totals, the balance, the savings percentage and the expenses per category.
pub async fn summary(config: Config) -> Result<Out<Summary>> {
    let mut screen = SummaryScreen::new(config.store());
    screen.on_mount().await?;
    let Some(summary) = screen.summary().cloned() else {
        return Ok(Out::new_message("The summary has not been loaded"));
    };
    Ok(Out::new(render(&summary, config.currency_symbol()), summary))
}

fn render(summary: &Summary, symbol: &str) -> String {
    let totals = &summary.totals;
    let headline = markdown_table(
        &["", "Amount"],
        &[
            vec![
                "Total earnings".to_string(),
                format_decimal(totals.total_earnings, symbol),
            ],
            vec![
                "Total expenses".to_string(),
                format_decimal(totals.total_expenses, symbol),
            ],
            vec!["Balance".to_string(), format_decimal(totals.balance, symbol)],
            vec![
                "Savings".to_string(),
                format!("{}%", totals.savings_percentage),
            ],
        ],
    );
    let rows: Vec<Vec<String>> = summary
        .by_category
        .iter()
        .map(|(category, total)| vec![category.to_string(), format_decimal(*total, symbol)])
        .collect();
    let by_category = markdown_table(&["Category", "Expenses"], &rows);
    format!("\n{headline}\n\n{by_category}")
}
