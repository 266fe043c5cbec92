//! Finboard is the client side of a personal-finance dashboard.
//!
//! It keeps account balances and a paginated, filterable ledger of
//! transactions in sync with a JSON backend, supports inline editing of
//! transactions and accounts, and charts spending trends.
//!
//! The heart of the crate is [TransactionViewModel], which owns the cached
//! transactions and local edits and decides when more rows must be fetched.
//! [Dashboard] drives the view-models against a [Backend] and renders the
//! result as HTML.

#![warn(missing_docs)]

mod account;
mod alert;
mod api;
mod category;
mod config;
mod dashboard;
mod database_id;
mod endpoints;
mod html;
mod logging;
mod pagination;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{
    Account, AccountEdit, AccountGroup, AccountGroupSummary, AccountSubType, AccountsViewModel,
    render_account_groups,
};
pub use alert::{Alert, AlertType};
pub use api::{
    Backend, DashboardSnapshot, EditAccountsRequest, EditTransactionsRequest, Highlights,
    HttpBackend, LargePurchase, LinkMetadata, LoadTransactionsRequest, NewManualAccount,
    SpendingData, SpendingRange,
};
pub use category::{
    BuiltInCategory, CUSTOM_CATEGORY_OFFSET, Category, CategoryFilter, CategoryOption,
    CustomCategory, ResolvedCategory, category_options, resolve_category,
};
pub use config::{ClientConfig, SaveFailurePolicy};
pub use dashboard::{Dashboard, DashboardChart, render_dashboard, spending_charts};
pub use database_id::{AccountId, CustomCategoryId, TransactionId};
pub use logging::{LOG_BODY_LENGTH_LIMIT, init_logging};
pub use pagination::PaginationConfig;
pub use transaction::{
    DraftStatus, FetchRequest, FetchState, FetchTicket, FilterUpdate, MergeOutcome, PageDirection,
    SaveBatch, SortOrder, Transaction, TransactionBuilder, TransactionEdit, TransactionFilter,
    TransactionViewModel, VisiblePage, parse_amount, parse_date, render_pagination,
    render_transaction_table,
};

/// The errors that may occur in the client.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request could not be sent or the connection failed.
    ///
    /// Holds the underlying error message since [reqwest::Error] is not
    /// comparable.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The backend answered with a non-success status code.
    #[error("{path} returned unexpected status {status}")]
    UnexpectedStatus {
        /// The endpoint that was called.
        path: String,
        /// The HTTP status code of the response.
        status: u16,
    },

    /// The response body could not be decoded.
    #[error("could not decode the response from {path}: {message}")]
    InvalidResponse {
        /// The endpoint that was called.
        path: String,
        /// The decoding error.
        message: String,
    },

    /// The backend reported `success: false` for an operation.
    #[error("the backend rejected the request to {0}")]
    BackendRejected(&'static str),

    /// No transaction with the given ID is known to the client.
    #[error("transaction {0} could not be found")]
    TransactionNotFound(TransactionId),

    /// No account with the given ID is known to the client.
    #[error("account {0} could not be found")]
    AccountNotFound(AccountId),

    /// The text could not be parsed as a finite amount of money.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The text could not be parsed as an ISO 8601 date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The backend returned a different number of IDs than rows were sent.
    #[error("expected {expected} IDs from the backend but got {got}")]
    MismatchedIds {
        /// The number of rows that were sent.
        expected: usize,
        /// The number of IDs that came back.
        got: usize,
    },

    /// Tried to change a field of a linked account that only the bank may set.
    #[error("only the nickname of a linked account can be changed")]
    ReadOnlyAccountField,

    /// The client configuration is invalid, e.g. a malformed base URL.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        tracing::error!("HTTP request failed: {error}");
        Error::Http(error.to_string())
    }
}
