//! Defines the transaction record mirrored from the backend.

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{category::Category, database_id::TransactionId};

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The backend owns transactions; the client holds a cached copy. To create
/// a new `Transaction` locally, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction. Negative for rows not yet saved.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Free-form notes added by the user.
    #[serde(default)]
    pub notes: String,
    /// The name of the bank the transaction came from.
    #[serde(default)]
    pub institution_name: String,
    /// The amount of money spent (negative) or earned (positive).
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// Short form of the date used in tables, e.g. "1/15".
    #[serde(default)]
    pub date_display: String,
    /// The categories of the transaction.
    ///
    /// Older payloads send a single `category` code instead of a list.
    #[serde(default, alias = "category", deserialize_with = "one_or_many")]
    pub categories: Vec<Category>,
    /// Whether the bank has not settled the transaction yet.
    #[serde(default)]
    pub pending: bool,
    /// Whether the user flagged the transaction for attention.
    #[serde(default)]
    pub highlighted: bool,
    /// Whether the transaction is excluded from spending totals.
    #[serde(default)]
    pub ignored: bool,
    /// A logo for the merchant, if the bank provided one.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// The ISO 4217 currency code of `amount`.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,
}

fn default_currency_code() -> String {
    "USD".to_owned()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Category),
    Many(Vec<Category>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(category) => vec![category],
        OneOrMany::Many(categories) => categories,
    })
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            notes: String::new(),
            institution_name: String::new(),
            categories: Vec::new(),
            pending: false,
            currency_code: default_currency_code(),
        }
    }

    /// The primary category, used for icons and quick edits.
    pub fn primary_category(&self) -> Category {
        self.categories
            .first()
            .copied()
            .unwrap_or(Category::Uncategorized)
    }

    /// The short display date, computed from `date` when the backend sent none.
    pub fn display_date(&self) -> String {
        if self.date_display.is_empty() {
            format_date_display(self.date)
        } else {
            self.date_display.clone()
        }
    }
}

/// Format `date` as month and day without padding, e.g. "1/15".
pub fn format_date_display(date: Date) -> String {
    format!("{}/{}", u8::from(date.month()), date.day())
}

/// A builder for creating [Transaction] instances.
///
/// Optional fields start empty; call [TransactionBuilder::finalize] with an
/// ID to get the [Transaction].
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::Transaction;
///
/// let transaction = Transaction::build(-45.99, date!(2025-01-15), "Coffee shop purchase")
///     .notes("with Sam")
///     .finalize(-1);
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income/credits, negative values represent
    /// expenses/debits.
    pub amount: f64,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// Free-form notes.
    pub notes: String,

    /// The bank the transaction belongs to. Empty for manual entries.
    pub institution_name: String,

    /// The categories of the transaction. Empty means uncategorized.
    pub categories: Vec<Category>,

    /// Whether the transaction has not settled yet.
    pub pending: bool,

    /// The ISO 4217 currency code, "USD" unless set.
    pub currency_code: String,
}

impl TransactionBuilder {
    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = notes.to_owned();
        self
    }

    /// Set the institution name for the transaction.
    pub fn institution_name(mut self, institution_name: &str) -> Self {
        self.institution_name = institution_name.to_owned();
        self
    }

    /// Set the categories for the transaction.
    pub fn categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Mark the transaction as pending.
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    /// Set the currency code for the transaction.
    pub fn currency_code(mut self, currency_code: &str) -> Self {
        self.currency_code = currency_code.to_owned();
        self
    }

    /// Create the [Transaction] with the given `id`.
    pub fn finalize(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date_display: format_date_display(self.date),
            description: self.description,
            notes: self.notes,
            institution_name: self.institution_name,
            amount: self.amount,
            date: self.date,
            categories: self.categories,
            pending: self.pending,
            highlighted: false,
            ignored: false,
            logo_url: None,
            currency_code: self.currency_code,
        }
    }
}
