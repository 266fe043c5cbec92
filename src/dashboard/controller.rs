//! Drives the view-models against a [Backend].
//!
//! Every operation awaits its backend calls in turn. Failures are logged,
//! queued as [Alert]s for the user and returned to the caller.

use std::collections::HashMap;

use time::{Date, OffsetDateTime};

use crate::{
    Error,
    account::{Account, AccountEdit, AccountsViewModel},
    alert::Alert,
    api::{Backend, LinkMetadata, NewManualAccount, SpendingData, SpendingRange},
    category::{Category, CustomCategory},
    config::ClientConfig,
    database_id::{AccountId, TransactionId},
    transaction::{
        FilterUpdate, MergeOutcome, PageDirection, Transaction, TransactionEdit,
        TransactionViewModel,
    },
};

/// The dashboard: accounts, the transaction ledger and spending analytics,
/// kept in sync with a [Backend].
pub struct Dashboard<B> {
    backend: B,
    transactions: TransactionViewModel,
    accounts: AccountsViewModel,
    link_token: Option<String>,
    spending: Option<SpendingData>,
    totals: HashMap<String, f64>,
    alerts: Vec<Alert>,
}

impl<B: Backend> Dashboard<B> {
    /// Create a dashboard with no data yet, talking to `backend`.
    pub fn new(backend: B, config: &ClientConfig) -> Self {
        Self {
            backend,
            transactions: TransactionViewModel::from_config(config),
            accounts: AccountsViewModel::default()
                .with_save_failure_policy(config.save_failure_policy),
            link_token: None,
            spending: None,
            totals: HashMap::new(),
            alerts: Vec::new(),
        }
    }

    /// Use `custom_categories` to name custom category codes.
    pub fn with_custom_categories(mut self, custom_categories: Vec<CustomCategory>) -> Self {
        self.transactions.set_custom_categories(custom_categories);
        self
    }

    /// Start with `accounts`, e.g. those embedded in the first page load.
    pub fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts.reconcile(accounts);
        self
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The transaction ledger.
    pub fn transactions(&self) -> &TransactionViewModel {
        &self.transactions
    }

    /// The accounts.
    pub fn accounts(&self) -> &AccountsViewModel {
        &self.accounts
    }

    /// The user's custom categories.
    pub fn custom_categories(&self) -> &[CustomCategory] {
        self.transactions.custom_categories()
    }

    /// The token for the bank-link widget, once one was requested.
    pub fn link_token(&self) -> Option<&str> {
        self.link_token.as_deref()
    }

    /// The spending analytics, once loaded.
    pub fn spending_data(&self) -> Option<&SpendingData> {
        self.spending.as_ref()
    }

    /// The totals from the last `/post-dash-load`.
    pub fn totals(&self) -> &HashMap<String, f64> {
        &self.totals
    }

    /// Alerts not yet shown to the user.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Take the queued alerts, leaving none.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }

    fn report(&mut self, action: &str, error: &Error) {
        tracing::error!("{action}: {error}");
        self.alerts.push(Alert::error(action, error.to_string()));
    }

    /// Compute the current page, fetching more rows first if it is short.
    ///
    /// A failed fetch is reported and the cached rows are returned; it is
    /// not retried until the filters or page change.
    pub async fn refresh(&mut self) -> Vec<Transaction> {
        let page = self.transactions.compute_visible_page();

        let Some(fetch) = page.fetch else {
            return page.transactions;
        };

        match self.backend.load_transactions(&fetch.body).await {
            Ok(rows) => {
                if let MergeOutcome::Stale = self.transactions.merge_fetched(fetch.ticket, rows) {
                    tracing::debug!("Fetched rows arrived after the filters changed");
                }
            }
            Err(error) => {
                self.transactions.fetch_failed(fetch.ticket);
                self.report("Could not load transactions", &error);
            }
        }

        self.transactions.compute_visible_page().transactions
    }

    /// Change the filters and show the first page of matches.
    pub async fn set_filter(&mut self, update: FilterUpdate) -> Vec<Transaction> {
        self.transactions.set_filter(update);
        self.refresh().await
    }

    /// Move one page back or forward.
    pub async fn change_page(&mut self, direction: PageDirection) -> Vec<Transaction> {
        self.transactions.change_page(direction);
        self.refresh().await
    }

    /// Edit a transaction locally. The edit is sent by [Dashboard::save_edits].
    pub fn apply_edit(&mut self, id: TransactionId, edit: TransactionEdit) -> Result<(), Error> {
        self.transactions
            .apply_edit(id, edit)
            .inspect_err(|error| self.alerts.push(Alert::error("Could not edit", error.to_string())))
    }

    /// Send all unsaved transaction edits.
    pub async fn save_edits(&mut self) -> Result<(), Error> {
        self.save(false).await
    }

    async fn save(&mut self, create_rule: bool) -> Result<(), Error> {
        let Some(batch) = self.transactions.begin_save(create_rule) else {
            return Ok(());
        };

        let result = self.backend.edit_transactions(&batch.request()).await;
        self.transactions.complete_save(&batch, result.is_ok());

        if let Err(error) = &result {
            self.report("Could not save transactions", error);
        }

        result
    }

    /// Change the category of a transaction and save it right away.
    ///
    /// With `always` set, the backend also remembers the category for
    /// future transactions with the same description.
    pub async fn quick_categorize(
        &mut self,
        id: TransactionId,
        category: Category,
        always: bool,
    ) -> Result<(), Error> {
        self.apply_edit(id, TransactionEdit::default().category(category))?;
        self.save(always).await
    }

    /// Add a blank, uncategorized transaction dated today and save it.
    ///
    /// The row appears right away with a temporary ID, which is replaced by
    /// the backend's ID once it is saved. The row is removed again if the
    /// save fails.
    pub async fn add_transaction(&mut self) -> Result<TransactionId, Error> {
        let builder = Transaction::build(0.0, today(), &self.transactions.next_new_description())
            .categories(vec![Category::Uncategorized]);
        let temp_id = self.transactions.insert_local(builder);

        let Some(transaction) = self.transactions.get(temp_id).cloned() else {
            return Err(Error::TransactionNotFound(temp_id));
        };

        let result = self
            .backend
            .add_transactions(std::slice::from_ref(&transaction))
            .await
            .and_then(|ids| {
                self.transactions.assign_ids(&[temp_id], &ids)?;
                ids.first().copied().ok_or(Error::MismatchedIds {
                    expected: 1,
                    got: 0,
                })
            });

        if let Err(error) = &result {
            self.transactions.remove(&[temp_id]);
            self.report("Could not add transaction", error);
        }

        result
    }

    /// Delete a transaction. Rows that were never saved are only removed
    /// locally.
    pub async fn delete_transaction(&mut self, id: TransactionId) -> Result<(), Error> {
        if id >= 0 {
            if let Err(error) = self.backend.delete_transactions(&[id]).await {
                self.report("Could not delete transaction", &error);
                return Err(error);
            }
        }

        self.transactions.remove(&[id]);
        Ok(())
    }

    /// Flip the highlighted flag, undoing the change if the backend fails.
    pub async fn toggle_highlight(&mut self, id: TransactionId) -> Result<bool, Error> {
        let highlighted = self.transactions.toggle_highlight(id)?;

        if let Err(error) = self.backend.toggle_highlight(id).await {
            self.transactions.toggle_highlight(id)?;
            self.report("Could not highlight transaction", &error);
            return Err(error);
        }

        Ok(highlighted)
    }

    /// Flip the ignored flag, undoing the change if the backend fails.
    pub async fn toggle_ignore(&mut self, id: TransactionId) -> Result<bool, Error> {
        let ignored = self.transactions.toggle_ignore(id)?;

        if let Err(error) = self.backend.toggle_ignore(id).await {
            self.transactions.toggle_ignore(id)?;
            self.report("Could not ignore transaction", &error);
            return Err(error);
        }

        Ok(ignored)
    }

    /// Pull the state the backend recomputes after the dashboard loads:
    /// refreshed accounts and transactions, bank connection health and
    /// totals.
    pub async fn post_dash_load(&mut self) -> Result<(), Error> {
        let snapshot = match self.backend.post_dash_load().await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                self.report("Could not refresh the dashboard", &error);
                return Err(error);
            }
        };

        tracing::debug!(
            "Reconciling {} accounts and {} transactions",
            snapshot.sub_accs.len(),
            snapshot.transactions.len()
        );
        self.accounts.reconcile(snapshot.sub_accs);
        self.accounts.set_health(snapshot.acc_health);
        self.transactions.reconcile(snapshot.transactions);
        self.totals = snapshot.totals;

        Ok(())
    }

    /// Edit an account locally. The edit is sent by
    /// [Dashboard::save_account_edits].
    pub fn apply_account_edit(&mut self, id: AccountId, edit: AccountEdit) -> Result<(), Error> {
        self.accounts
            .apply_edit(id, edit)
            .inspect_err(|error| self.alerts.push(Alert::error("Could not edit", error.to_string())))
    }

    /// Send all unsaved account edits.
    pub async fn save_account_edits(&mut self) -> Result<(), Error> {
        let Some(request) = self.accounts.save_batch() else {
            return Ok(());
        };

        let result = self.backend.edit_accounts(&request).await;
        self.accounts.complete_save(&request, result.is_ok());

        if let Err(error) = &result {
            self.report("Could not save accounts", error);
        }

        result
    }

    /// Delete an account.
    pub async fn delete_account(&mut self, id: AccountId) -> Result<(), Error> {
        if let Err(error) = self.backend.delete_accounts(&[id]).await {
            self.report("Could not delete account", &error);
            return Err(error);
        }

        self.accounts.remove(&[id]);
        Ok(())
    }

    /// Create a manually tracked account.
    pub async fn add_manual_account(
        &mut self,
        account: NewManualAccount,
    ) -> Result<AccountId, Error> {
        match self.backend.add_manual_account(&account).await {
            Ok(created) => {
                let id = created.id;
                self.accounts.insert(created);
                self.alerts
                    .push(Alert::success("Account added", account.name.clone()));
                Ok(id)
            }
            Err(error) => {
                self.report("Could not add account", &error);
                Err(error)
            }
        }
    }

    /// Get a token to open the bank-link widget with.
    pub async fn begin_link(&mut self) -> Result<&str, Error> {
        match self.backend.create_link_token().await {
            Ok(token) => Ok(self.link_token.insert(token).as_str()),
            Err(error) => {
                self.report("Could not start linking a bank", &error);
                Err(error)
            }
        }
    }

    /// Get a token to repair the bank connection of an account.
    pub async fn begin_link_update(&mut self, account_id: AccountId) -> Result<&str, Error> {
        match self.backend.create_link_token_update(account_id).await {
            Ok(token) => Ok(self.link_token.insert(token).as_str()),
            Err(error) => {
                self.report("Could not reconnect the bank", &error);
                Err(error)
            }
        }
    }

    /// Finish linking a bank with the widget's public token, then pull the
    /// new accounts.
    pub async fn complete_link(
        &mut self,
        public_token: &str,
        metadata: &LinkMetadata,
    ) -> Result<(), Error> {
        if let Err(error) = self
            .backend
            .exchange_public_token(public_token, metadata)
            .await
        {
            self.report("Could not link the bank", &error);
            return Err(error);
        }

        self.link_token = None;
        self.alerts.push(Alert::success("Bank linked", ""));
        self.post_dash_load().await
    }

    /// Load spending analytics for `range`.
    pub async fn load_spending_data(&mut self, range: SpendingRange) -> Result<&SpendingData, Error> {
        match self.backend.load_spending_data(range).await {
            Ok(data) => Ok(&*self.spending.insert(data)),
            Err(error) => {
                self.report("Could not load spending data", &error);
                Err(error)
            }
        }
    }
}

/// Today's date in the local time zone, falling back to UTC when the offset
/// cannot be determined.
fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
