//! The JSON backend the dashboard talks to.
//!
//! [Backend] lists every operation the dashboard needs. [HttpBackend] is the
//! implementation that speaks to the real server over HTTP.

mod http;
mod payloads;

pub use http::HttpBackend;
pub use payloads::{
    DashboardSnapshot, EditAccountsRequest, EditTransactionsRequest, Highlights, LargePurchase,
    LinkMetadata, LoadTransactionsRequest, NewManualAccount, SpendingData, SpendingRange,
};

use async_trait::async_trait;

use crate::{
    Error,
    account::Account,
    database_id::{AccountId, TransactionId},
    transaction::Transaction,
};

/// The operations the backend supports.
///
/// Operations that answer with `{"success": false}` fail with
/// [Error::BackendRejected].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch a window of transactions matching the request's filters.
    async fn load_transactions(
        &self,
        request: &LoadTransactionsRequest,
    ) -> Result<Vec<Transaction>, Error>;

    /// Save edited transactions.
    async fn edit_transactions(&self, request: &EditTransactionsRequest) -> Result<(), Error>;

    /// Create transactions and return their IDs in the order they were sent.
    async fn add_transactions(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<TransactionId>, Error>;

    /// Delete transactions.
    async fn delete_transactions(&self, ids: &[TransactionId]) -> Result<(), Error>;

    /// Flip the highlighted flag of a transaction.
    async fn toggle_highlight(&self, id: TransactionId) -> Result<(), Error>;

    /// Flip the ignored flag of a transaction.
    async fn toggle_ignore(&self, id: TransactionId) -> Result<(), Error>;

    /// Save edited accounts.
    async fn edit_accounts(&self, request: &EditAccountsRequest) -> Result<(), Error>;

    /// Delete accounts.
    async fn delete_accounts(&self, ids: &[AccountId]) -> Result<(), Error>;

    /// Create a manually tracked account.
    async fn add_manual_account(&self, account: &NewManualAccount) -> Result<Account, Error>;

    /// Fetch the state the backend recomputes after the dashboard loads.
    async fn post_dash_load(&self) -> Result<DashboardSnapshot, Error>;

    /// Get a token to start linking a new bank.
    async fn create_link_token(&self) -> Result<String, Error>;

    /// Get a token to repair the bank connection of an existing account.
    async fn create_link_token_update(&self, account_id: AccountId) -> Result<String, Error>;

    /// Hand the public token from a finished bank link to the backend.
    async fn exchange_public_token(
        &self,
        public_token: &str,
        metadata: &LinkMetadata,
    ) -> Result<(), Error>;

    /// Fetch spending analytics for a range of days before today.
    async fn load_spending_data(&self, range: SpendingRange) -> Result<SpendingData, Error>;
}
