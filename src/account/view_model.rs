//! Holds the user's accounts and the edits made to them but not yet saved.

use std::collections::BTreeMap;

use crate::{Error, api::EditAccountsRequest, config::SaveFailurePolicy, database_id::AccountId};

use super::core::{Account, AccountGroupSummary, group_accounts, net_worth};

/// Changes to some of the fields of an [Account].
///
/// Fields left as `None` are not changed. Only the nickname of a linked
/// account may be changed; the other fields come from the bank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountEdit {
    /// The new name of a manual account.
    pub name: Option<String>,
    /// The new nickname of a linked account.
    pub nickname: Option<String>,
    /// The new currency of a manual account.
    pub iso_currency_code: Option<String>,
    /// The new value of a manual account.
    pub current: Option<f64>,
}

impl AccountEdit {
    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the nickname.
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Set the currency code.
    pub fn iso_currency_code(mut self, code: impl Into<String>) -> Self {
        self.iso_currency_code = Some(code.into());
        self
    }

    /// Set the current value.
    pub fn current(mut self, current: f64) -> Self {
        self.current = Some(current);
        self
    }

    fn touches_bank_fields(&self) -> bool {
        self.name.is_some() || self.iso_currency_code.is_some() || self.current.is_some()
    }

    fn apply_to(self, account: &mut Account) -> Result<(), Error> {
        if !account.manual && self.touches_bank_fields() {
            return Err(Error::ReadOnlyAccountField);
        }
        if let Some(current) = self.current.filter(|current| !current.is_finite()) {
            return Err(Error::InvalidAmount(current.to_string()));
        }

        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(nickname) = self.nickname {
            account.nickname = nickname;
        }
        if let Some(code) = self.iso_currency_code {
            account.iso_currency_code = code;
        }
        if let Some(current) = self.current {
            account.current = Some(current);
        }

        Ok(())
    }
}

/// The accounts shown on the dashboard.
///
/// Like the transaction ledger, edits are kept as drafts on top of the last
/// saved accounts until the backend confirms them.
#[derive(Debug, Clone, Default)]
pub struct AccountsViewModel {
    accounts: BTreeMap<AccountId, Account>,
    drafts: BTreeMap<AccountId, Account>,
    needs_reauth: BTreeMap<AccountId, bool>,
    save_failure_policy: SaveFailurePolicy,
}

impl AccountsViewModel {
    /// Create a view-model holding `accounts`.
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.id, account))
                .collect(),
            ..Default::default()
        }
    }

    /// Keep or drop edits the backend fails to save according to `policy`.
    pub fn with_save_failure_policy(mut self, policy: SaveFailurePolicy) -> Self {
        self.save_failure_policy = policy;
        self
    }

    /// The account with `id`, with any unsaved edits applied.
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.drafts.get(&id).or_else(|| self.accounts.get(&id))
    }

    /// All accounts in ID order, with unsaved edits applied.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts
            .keys()
            .filter_map(|id| self.get(*id))
    }

    /// The number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Whether any account has unsaved edits.
    pub fn has_edits(&self) -> bool {
        !self.drafts.is_empty()
    }

    /// Apply `edit` to the account with `id`. The edit is shown right away
    /// and sent with the next save.
    ///
    /// # Errors
    /// Returns [Error::AccountNotFound] for an unknown account and
    /// [Error::ReadOnlyAccountField] when `edit` changes a field of a linked
    /// account other than its nickname. A NaN or infinite value is
    /// [Error::InvalidAmount]. Nothing changes on error.
    pub fn apply_edit(&mut self, id: AccountId, edit: AccountEdit) -> Result<(), Error> {
        let mut draft = self.get(id).cloned().ok_or(Error::AccountNotFound(id))?;
        edit.apply_to(&mut draft)?;

        tracing::debug!("Account {id} edited");
        self.drafts.insert(id, draft);
        Ok(())
    }

    /// Throw away all unsaved edits.
    pub fn cancel_edits(&mut self) {
        self.drafts.clear();
    }

    /// The request that saves every edited account, or `None` if nothing was
    /// edited.
    pub fn save_batch(&self) -> Option<EditAccountsRequest> {
        if self.drafts.is_empty() {
            return None;
        }

        Some(EditAccountsRequest {
            accounts: self.drafts.values().cloned().collect(),
        })
    }

    /// Record the outcome of sending `request`.
    ///
    /// On success the sent accounts become the saved versions. A draft is
    /// only dropped if it has not been edited again since the request was
    /// made. On failure the drafts are kept for a retry or dropped, following
    /// the [SaveFailurePolicy].
    pub fn complete_save(&mut self, request: &EditAccountsRequest, success: bool) {
        if !success {
            tracing::warn!(
                "Saving {} account(s) failed, policy {:?}",
                request.accounts.len(),
                self.save_failure_policy
            );
            if self.save_failure_policy == SaveFailurePolicy::Rollback {
                for sent in &request.accounts {
                    if self.drafts.get(&sent.id) == Some(sent) {
                        self.drafts.remove(&sent.id);
                    }
                }
            }
            return;
        }

        for sent in &request.accounts {
            if self.drafts.get(&sent.id) == Some(sent) {
                self.drafts.remove(&sent.id);
            }

            if let Some(account) = self.accounts.get_mut(&sent.id) {
                *account = sent.clone();
            }
        }
    }

    /// Add an account, e.g. one the user just created.
    pub fn insert(&mut self, account: Account) {
        self.drafts.remove(&account.id);
        self.accounts.insert(account.id, account);
    }

    /// Forget the accounts with the given IDs.
    pub fn remove(&mut self, ids: &[AccountId]) {
        for id in ids {
            self.accounts.remove(id);
            self.drafts.remove(id);
        }
    }

    /// Replace all accounts with the list the backend sent.
    ///
    /// Accounts missing from the list were deleted elsewhere and are dropped
    /// together with their drafts. Unsaved edits of the others stay on top.
    pub fn reconcile(&mut self, accounts: Vec<Account>) {
        self.accounts = accounts
            .into_iter()
            .map(|account| (account.id, account))
            .collect();
        let accounts = &self.accounts;
        self.drafts.retain(|id, _| accounts.contains_key(id));
    }

    /// Record which linked accounts need the user to log in to their bank
    /// again.
    pub fn set_health(&mut self, needs_reauth: BTreeMap<AccountId, bool>) {
        self.needs_reauth = needs_reauth;
    }

    /// Whether the bank connection of the account with `id` needs repair.
    pub fn needs_reauth(&self, id: AccountId) -> bool {
        self.needs_reauth.get(&id).copied().unwrap_or(false)
    }

    /// The accounts sorted into groups, with unsaved edits applied.
    pub fn groups(&self) -> Vec<AccountGroupSummary> {
        group_accounts(self.accounts())
    }

    /// The sum of all group totals.
    pub fn net_worth(&self) -> f64 {
        net_worth(&self.groups())
    }
}
