//! View-models for the earnings, expenses and summary screens.
//!
//! A screen owns its state explicitly: it starts out `Loading`, becomes `Ready` once a snapshot of
//! the store has been loaded, and is re-loaded after every mutation. Problems that the user needs
//! to see are published through `Notice` instead of being swallowed.

mod kind;
mod summary;

use crate::model::Record;
use crate::store::Store;
use crate::totals::sum_amounts;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub use kind::{Earnings, Expenses, RecordKind};
pub use summary::{Summary, SummaryScreen};

/// The earnings screen.
pub type EarningsScreen = Screen<Earnings>;

/// The expenses screen.
pub type ExpensesScreen = Screen<Expenses>;

/// A message for the user, rendered by the presentation layer as a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The input was rejected and nothing was saved.
    Validation(String),
    /// The store failed. Whatever is on screen may be stale; the action can be retried.
    Storage(String),
}

impl Notice {
    fn from_error(e: &Error) -> Self {
        if e.is_validation() {
            Notice::Validation(e.to_string())
        } else {
            Notice::Storage(e.to_string())
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(m) | Notice::Storage(m) => m,
        }
    }
}

/// A list of records, newest first, and the total of their amounts. Both come from the same
/// fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<R> {
    records: Vec<R>,
    total: Decimal,
}

impl<R: Record> Listing<R> {
    fn new(mut records: Vec<R>) -> Self {
        records.sort_by_key(|r| std::cmp::Reverse(r.id()));
        let total = sum_amounts(&records);
        Self { records, total }
    }
}

impl<R> Listing<R> {
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenState<T> {
    Loading,
    Ready(T),
}

/// The view-model shared by the earnings and expenses screens.
pub struct Screen<K: RecordKind> {
    store: Arc<dyn Store>,
    state: ScreenState<Listing<K::Record>>,
    form: K::Form,
    notice: Option<Notice>,
}

impl<K: RecordKind> Screen<K> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            state: ScreenState::Loading,
            form: K::Form::default(),
            notice: None,
        }
    }

    /// Makes sure the schema exists, then loads.
    pub async fn on_mount(&mut self) -> Result<()> {
        let res = self.store.ensure_schema().await;
        self.publish(res)?;
        self.load().await
    }

    /// Replaces the list and total with a fresh snapshot. On failure the previous state is kept
    /// and a `Notice::Storage` is raised.
    pub async fn load(&mut self) -> Result<()> {
        let res = K::list(self.store.as_ref()).await;
        let records = self.publish(res)?;
        debug!("Loaded {} {} records", records.len(), K::NAME);
        self.state = ScreenState::Ready(Listing::new(records));
        if matches!(self.notice, Some(Notice::Storage(_))) {
            self.notice = None;
        }
        Ok(())
    }

    /// Validates the form and saves it. On success the form is reset and the list reloaded. On
    /// failure the form is left as-is so the user can correct it or retry.
    ///
    /// Once the insert has succeeded the new id is returned even if the reload fails. In that case
    /// the list on screen is stale and a `Notice::Storage` is raised.
    pub async fn submit(&mut self) -> Result<i64> {
        let res = K::validate(&self.form);
        let new = self.publish(res)?;
        let res = K::insert(self.store.as_ref(), &new).await;
        let id = self.publish(res)?;
        debug!("Added {} {id}", K::NAME);
        self.form = K::Form::default();
        self.notice = None;
        self.reload_after_mutation().await;
        Ok(id)
    }

    /// Deletes the record with `id` and reloads. Returns false if there was no such record. As with
    /// `submit`, a failed reload after a successful delete only raises a `Notice::Storage`.
    pub async fn remove(&mut self, id: i64) -> Result<bool> {
        let res = K::delete(self.store.as_ref(), id).await;
        let deleted = self.publish(res)?;
        debug!("Removed {} {id}: deleted={deleted}", K::NAME);
        self.reload_after_mutation().await;
        Ok(deleted)
    }

    /// True when the last reload failed and the records on screen may be out of date.
    pub fn is_stale(&self) -> bool {
        matches!(self.notice, Some(Notice::Storage(_)))
    }

    async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.load().await {
            warn!("The {} list is stale until the next load: {e}", K::NAME);
        }
    }

    pub fn state(&self) -> &ScreenState<Listing<K::Record>> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScreenState::Loading)
    }

    /// The records on screen, newest first. Empty while loading.
    pub fn records(&self) -> &[K::Record] {
        match &self.state {
            ScreenState::Loading => &[],
            ScreenState::Ready(listing) => listing.records(),
        }
    }

    /// The total of the records on screen. Zero while loading.
    pub fn total(&self) -> Decimal {
        match &self.state {
            ScreenState::Loading => Decimal::ZERO,
            ScreenState::Ready(listing) => listing.total(),
        }
    }

    pub fn form(&self) -> &K::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut K::Form {
        &mut self.form
    }

    pub fn set_form(&mut self, form: K::Form) {
        self.form = form;
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Raises a notice for an error before handing it back to the caller.
    fn publish<T>(&mut self, res: Result<T>) -> Result<T> {
        res.map_err(|e| {
            if e.is_storage() {
                error!("The {} screen hit a storage error: {e}", K::NAME);
            }
            self.notice = Some(Notice::from_error(&e));
            e
        })
    }
}
