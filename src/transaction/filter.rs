//! Filtering and ordering of the transaction ledger.

use std::cmp::Ordering;

use time::Date;

use crate::category::{CategoryFilter, CustomCategory, resolve_category};

use super::{core::Transaction, edit::parse_date};

/// The order to sort transactions by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// The filters applied to the transaction ledger.
///
/// Date bounds are kept as typed so the backend sees exactly what the user
/// entered; an empty or unparseable bound does not restrict that side.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionFilter {
    /// Case-insensitive search term. Empty matches everything.
    pub search: String,
    /// Inclusive lower date bound as an ISO 8601 date.
    pub start: String,
    /// Inclusive upper date bound as an ISO 8601 date.
    pub end: String,
    /// Keep only transactions whose absolute amount is at least this much.
    /// Zero or less disables the filter.
    pub min_amount: f64,
    /// The selected category.
    pub category: CategoryFilter,
}

/// Changes to some of the fields of a [TransactionFilter].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    /// The new search term.
    pub search: Option<String>,
    /// The new lower date bound.
    pub start: Option<String>,
    /// The new upper date bound.
    pub end: Option<String>,
    /// The new amount threshold.
    pub min_amount: Option<f64>,
    /// The new category selection.
    pub category: Option<CategoryFilter>,
}

impl FilterUpdate {
    /// Set the search term.
    pub fn search(mut self, search: &str) -> Self {
        self.search = Some(search.to_owned());
        self
    }

    /// Set the date range.
    pub fn date_range(mut self, start: &str, end: &str) -> Self {
        self.start = Some(start.to_owned());
        self.end = Some(end.to_owned());
        self
    }

    /// Set the amount threshold.
    pub fn min_amount(mut self, min_amount: f64) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    /// Set the category selection.
    pub fn category(mut self, category: CategoryFilter) -> Self {
        self.category = Some(category);
        self
    }
}

impl TransactionFilter {
    /// Replace the fields set in `update`, returning whether anything changed.
    pub fn update(&mut self, update: FilterUpdate) -> bool {
        let before = self.clone();

        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(start) = update.start {
            self.start = start;
        }
        if let Some(end) = update.end {
            self.end = end;
        }
        if let Some(min_amount) = update.min_amount {
            self.min_amount = min_amount;
        }
        if let Some(category) = update.category {
            self.category = category;
        }

        *self != before
    }

    /// Prepare the filter for matching many transactions.
    pub(crate) fn matcher<'a>(&'a self, custom_categories: &'a [CustomCategory]) -> Matcher<'a> {
        Matcher {
            filter: self,
            search: self.search.to_lowercase(),
            start: parse_bound(&self.start),
            end: parse_bound(&self.end),
            custom_categories,
        }
    }
}

fn parse_bound(text: &str) -> Option<Date> {
    if text.trim().is_empty() {
        return None;
    }

    match parse_date(text) {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::debug!("Ignoring date bound: {error}");
            None
        }
    }
}

/// A [TransactionFilter] with its search term and date bounds pre-parsed.
pub(crate) struct Matcher<'a> {
    filter: &'a TransactionFilter,
    search: String,
    start: Option<Date>,
    end: Option<Date>,
    custom_categories: &'a [CustomCategory],
}

impl Matcher<'_> {
    /// Whether `transaction` passes every filter.
    pub(crate) fn matches(&self, transaction: &Transaction) -> bool {
        self.filter.category.matches(&transaction.categories)
            && self.matches_search(transaction)
            && self.matches_date(transaction.date)
            && self.matches_amount(transaction.amount)
    }

    fn matches_search(&self, transaction: &Transaction) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let contains = |text: &str| text.to_lowercase().contains(&self.search);

        contains(&transaction.description)
            || contains(&transaction.notes)
            || contains(&transaction.institution_name)
            || transaction
                .categories
                .iter()
                .any(|category| contains(resolve_category(*category, self.custom_categories).name))
    }

    fn matches_date(&self, date: Date) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    fn matches_amount(&self, amount: f64) -> bool {
        let threshold = self.filter.min_amount;
        !threshold.is_finite() || threshold <= 0.0 || amount.abs() >= threshold
    }
}

/// Sort by date in `order`, breaking ties by ascending ID so rows sharing a
/// date never swap places.
pub(crate) fn sort_transactions(transactions: &mut [Transaction], order: SortOrder) {
    transactions.sort_by(|a, b| {
        let by_date = match order {
            SortOrder::Ascending => a.date.cmp(&b.date),
            SortOrder::Descending => b.date.cmp(&a.date),
        };

        match by_date {
            Ordering::Equal => a.id.cmp(&b.id),
            ordering => ordering,
        }
    });
}
