//! Partial updates to transactions and validation of user input.

use time::{Date, macros::format_description};

use crate::{Error, category::Category};

use super::core::{Transaction, format_date_display};

/// A change to some fields of a transaction.
///
/// Fields set to `None` are left untouched. To clear the notes, set them to
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionEdit {
    /// The new description.
    pub description: Option<String>,
    /// The new notes.
    pub notes: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date. Also updates the display date.
    pub date: Option<Date>,
    /// The new categories.
    pub categories: Option<Vec<Category>>,
}

impl TransactionEdit {
    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Set the notes.
    pub fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_owned());
        self
    }

    /// Set the amount.
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the date.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Replace the categories with the single `category`.
    pub fn category(mut self, category: Category) -> Self {
        self.categories = Some(vec![category]);
        self
    }

    /// Whether the edit changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &TransactionEdit::default()
    }

    /// Check the fields a user could have typed in.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is NaN or infinite.
    pub fn validate(&self) -> Result<(), Error> {
        match self.amount {
            Some(amount) if !amount.is_finite() => Err(Error::InvalidAmount(amount.to_string())),
            _ => Ok(()),
        }
    }

    /// Write the set fields onto `transaction`.
    pub fn apply_to(&self, transaction: &mut Transaction) {
        if let Some(description) = &self.description {
            transaction.description.clone_from(description);
        }

        if let Some(notes) = &self.notes {
            transaction.notes.clone_from(notes);
        }

        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }

        if let Some(date) = self.date {
            transaction.date = date;
            transaction.date_display = format_date_display(date);
        }

        if let Some(categories) = &self.categories {
            transaction.categories.clone_from(categories);
        }
    }
}

/// Parse an amount typed by the user.
///
/// Leading/trailing whitespace is ignored.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `text` is not a number or is NaN or
/// infinite, so bad input never reaches the cache.
pub fn parse_amount(text: &str) -> Result<f64, Error> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| Error::InvalidAmount(text.to_owned()))
}

/// Parse an ISO 8601 calendar date, e.g. "2024-03-07".
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}
