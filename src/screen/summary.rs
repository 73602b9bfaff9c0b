use crate::model::{Category, Earning, Expense};
use crate::screen::{Notice, ScreenState};
use crate::store::Store;
use crate::totals::{totals_by_category, Totals};
use crate::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Everything the summary screen shows, computed from a single snapshot of both tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub earnings: Vec<Earning>,
    pub expenses: Vec<Expense>,
    pub totals: Totals,
    pub by_category: BTreeMap<Category, Decimal>,
}

impl Summary {
    fn new(mut earnings: Vec<Earning>, mut expenses: Vec<Expense>) -> Self {
        earnings.sort_by_key(|e| std::cmp::Reverse(e.id));
        expenses.sort_by_key(|e| std::cmp::Reverse(e.id));
        let totals = Totals::compute(&earnings, &expenses);
        let by_category = totals_by_category(&expenses);
        Self {
            earnings,
            expenses,
            totals,
            by_category,
        }
    }
}

/// The read-only summary screen.
pub struct SummaryScreen {
    store: Arc<dyn Store>,
    state: ScreenState<Summary>,
    notice: Option<Notice>,
}

impl SummaryScreen {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            state: ScreenState::Loading,
            notice: None,
        }
    }

    pub async fn on_mount(&mut self) -> Result<()> {
        let res = self.store.ensure_schema().await;
        self.publish(res)?;
        self.load().await
    }

    /// Fetches both tables and recomputes every figure. If either fetch fails nothing is replaced.
    pub async fn load(&mut self) -> Result<()> {
        let res = self.store.list_earnings().await;
        let earnings = self.publish(res)?;
        let res = self.store.list_expenses().await;
        let expenses = self.publish(res)?;
        debug!(
            "Loaded summary of {} earnings and {} expenses",
            earnings.len(),
            expenses.len()
        );
        self.state = ScreenState::Ready(Summary::new(earnings, expenses));
        self.notice = None;
        Ok(())
    }

    pub fn state(&self) -> &ScreenState<Summary> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScreenState::Loading)
    }

    /// The loaded summary, `None` while loading.
    pub fn summary(&self) -> Option<&Summary> {
        match &self.state {
            ScreenState::Loading => None,
            ScreenState::Ready(summary) => Some(summary),
        }
    }

    /// The totals on screen. All zero while loading.
    pub fn totals(&self) -> Totals {
        self.summary().map(|s| s.totals).unwrap_or_default()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn publish<T>(&mut self, res: Result<T>) -> Result<T> {
        res.map_err(|e| {
            error!("The summary screen hit a storage error: {e}");
            self.notice = Some(Notice::Storage(e.to_string()));
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{EarningsScreen, ExpensesScreen};
    use crate::store::MemoryStore;
    use crate::validate::{EarningForm, ExpenseForm};

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let mut screen = SummaryScreen::new(Arc::new(MemoryStore::new()));
        assert!(screen.is_loading());
        assert_eq!(screen.totals(), Totals::default());

        screen.on_mount().await.unwrap();

        let summary = screen.summary().unwrap();
        assert!(summary.earnings.is_empty());
        assert!(summary.expenses.is_empty());
        assert_eq!(summary.totals, Totals::default());
        assert_eq!(summary.by_category.len(), Category::ALL.len());
    }

    #[tokio::test]
    async fn test_summary_reflects_other_screens() {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());

        let mut earnings = EarningsScreen::new(store.clone());
        earnings.on_mount().await.unwrap();
        earnings.set_form(EarningForm::new("1000", "salary"));
        earnings.submit().await.unwrap();

        let mut expenses = ExpensesScreen::new(store.clone());
        expenses.on_mount().await.unwrap();
        expenses.set_form(ExpenseForm::new("200", "Food", "lunch"));
        expenses.submit().await.unwrap();

        let mut summary = SummaryScreen::new(store.clone());
        summary.on_mount().await.unwrap();

        let totals = summary.totals();
        assert_eq!(totals.total_earnings, dec(1000));
        assert_eq!(totals.total_expenses, dec(200));
        assert_eq!(totals.balance, dec(800));
        assert_eq!(totals.savings_percentage, 80);
        let by_category = &summary.summary().unwrap().by_category;
        assert_eq!(by_category[&Category::Food], dec(200));
        assert_eq!(by_category[&Category::Grocery], Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_summary() {
        let store = Arc::new(MemoryStore::new());
        let mut earnings = EarningsScreen::new(store.clone());
        earnings.on_mount().await.unwrap();
        earnings.set_form(EarningForm::new("50", "gift"));
        earnings.submit().await.unwrap();

        let mut summary = SummaryScreen::new(store.clone());
        summary.on_mount().await.unwrap();

        store.set_unavailable(true);
        assert!(summary.load().await.is_err());
        assert!(matches!(summary.notice(), Some(Notice::Storage(_))));
        assert_eq!(summary.totals().total_earnings, dec(50));

        store.set_unavailable(false);
        summary.load().await.unwrap();
        assert!(summary.notice().is_none());
    }
}
