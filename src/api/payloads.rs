//! Request and response bodies exchanged with the backend.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
    account::{Account, AccountSubType},
    category::{Category, CategoryFilter},
    database_id::{AccountId, TransactionId},
    transaction::Transaction,
};

/// Body of `POST /load-transactions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadTransactionsRequest {
    /// Index of the first row wanted, in the backend's ordering.
    pub start_i: usize,
    /// Index one past the last row wanted.
    pub end_i: usize,
    /// The search term.
    pub search: String,
    /// The lower date bound as entered.
    pub start: String,
    /// The upper date bound as entered.
    pub end: String,
    /// The category filter, `null` for any category.
    pub category: CategoryFilter,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoadTransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// Body of `POST /edit-transactions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditTransactionsRequest {
    /// The edited transactions.
    pub transactions: Vec<Transaction>,
    /// Whether the backend should remember the description to category
    /// mapping as a rule.
    pub create_rule: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddTransactionsRequest<'a> {
    pub transactions: &'a [Transaction],
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddTransactionsResponse {
    pub success: bool,
    #[serde(default)]
    pub ids: Vec<TransactionId>,
}

#[derive(Debug, Serialize)]
pub(crate) struct IdsRequest<'a> {
    pub ids: &'a [i64],
}

#[derive(Debug, Serialize)]
pub(crate) struct IdRequest {
    pub id: i64,
}

/// The `{success}` body most write endpoints answer with.
#[derive(Debug, Deserialize)]
pub(crate) struct SuccessResponse {
    pub success: bool,
}

/// Body of `POST /edit-accounts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditAccountsRequest {
    /// The edited accounts.
    pub accounts: Vec<Account>,
}

/// Body of `POST /add-account-manual`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewManualAccount {
    /// The account name.
    pub name: String,
    /// The kind of account.
    pub sub_type: AccountSubType,
    /// The current value.
    pub current: f64,
    /// The ISO 4217 currency code.
    pub iso_currency_code: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddManualAccountResponse {
    pub account: Account,
}

/// The state the backend recomputes after the dashboard loads, returned by
/// `GET /post-dash-load`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardSnapshot {
    /// Refreshed accounts.
    #[serde(default)]
    pub sub_accs: Vec<Account>,
    /// Refreshed transactions.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// For each linked account, whether the bank connection needs the user
    /// to log in again.
    #[serde(default)]
    pub acc_health: BTreeMap<AccountId, bool>,
    /// Totals computed by the backend, keyed by name.
    #[serde(default)]
    pub totals: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkTokenResponse {
    pub link_token: String,
}

/// The metadata the bank-link widget hands over with a public token. It is
/// passed to the backend untouched.
pub type LinkMetadata = serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct ExchangePublicTokenRequest<'a> {
    pub public_token: &'a str,
    pub metadata: &'a LinkMetadata,
}

/// Body of `POST /load-spending-data`, a range in days before today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpendingRange {
    /// Days back to the start of the range.
    pub start: u32,
    /// Days back to the end of the range.
    pub end: u32,
}

/// A large single purchase in the spending period.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LargePurchase {
    /// The transaction description.
    pub description: String,
    /// The amount spent.
    pub amount: f64,
}

/// Spending highlights for a period.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Highlights {
    /// Per category: the number of transactions and their total amount.
    #[serde(default)]
    pub by_cat: Vec<(Category, (u32, f64))>,
    /// Per category: the change in spending from the previous period.
    #[serde(default)]
    pub cat_changes: Vec<(Category, f64)>,
    /// The largest purchases.
    #[serde(default)]
    pub large_purchases: Vec<LargePurchase>,
    /// Total spending.
    #[serde(default)]
    pub total: f64,
    /// Change in total spending from the previous period.
    #[serde(default)]
    pub total_change: f64,
}

/// Analytics for a period, returned by `POST /load-spending-data`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpendingData {
    /// Spending highlights.
    #[serde(default)]
    pub highlights: Highlights,
    /// Total income.
    #[serde(default)]
    pub income_total: f64,
    /// Total expenses, negative.
    #[serde(default)]
    pub expenses_total: f64,
    /// Discretionary expenses, negative.
    #[serde(default)]
    pub expenses_discretionary: f64,
    /// Non-discretionary expenses, negative.
    #[serde(default)]
    pub expenses_nondiscret: f64,
    /// Spending per time bucket as `(label, amount)`, amounts negative.
    #[serde(default)]
    pub spending_over_time: Vec<(String, f64)>,
    /// Income per time bucket as `(label, amount)`.
    #[serde(default)]
    pub income_over_time: Vec<(String, f64)>,
    /// Merchants first seen in the period as `(name, logo URL)`.
    #[serde(default)]
    pub merchants_new: Vec<(String, Option<String>)>,
}
