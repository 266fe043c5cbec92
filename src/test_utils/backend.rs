use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    Error,
    account::Account,
    api::{
        Backend, DashboardSnapshot, EditAccountsRequest, EditTransactionsRequest, LinkMetadata,
        LoadTransactionsRequest, NewManualAccount, SpendingData, SpendingRange,
    },
    database_id::{AccountId, TransactionId},
    endpoints,
    transaction::Transaction,
};

/// What the fake backend holds and every request it received.
#[derive(Debug, Default)]
pub(crate) struct FakeState {
    /// Served by `load_transactions` in date order, ignoring filters.
    pub transactions: Vec<Transaction>,
    pub snapshot: DashboardSnapshot,
    pub spending: SpendingData,
    /// Makes every request fail with a 500.
    pub fail: bool,
    pub next_id: TransactionId,

    pub load_requests: Vec<LoadTransactionsRequest>,
    pub edit_requests: Vec<EditTransactionsRequest>,
    pub added: Vec<Transaction>,
    pub deleted_transactions: Vec<TransactionId>,
    pub highlight_toggles: Vec<TransactionId>,
    pub ignore_toggles: Vec<TransactionId>,
    pub account_edits: Vec<EditAccountsRequest>,
    pub deleted_accounts: Vec<AccountId>,
    pub new_accounts: Vec<NewManualAccount>,
    pub exchanged_tokens: Vec<String>,
    pub link_updates: Vec<AccountId>,
    pub spending_ranges: Vec<SpendingRange>,
}

/// An in-memory [Backend] for testing the dashboard.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub(crate) fn with_transactions(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        Self {
            state: Mutex::new(FakeState {
                transactions,
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn set_failing(&self, fail: bool) {
        self.state().fail = fail;
    }

    fn check(&self, path: &'static str) -> Result<MutexGuard<'_, FakeState>, Error> {
        let state = self.state();

        if state.fail {
            Err(Error::UnexpectedStatus {
                path: path.to_owned(),
                status: 500,
            })
        } else {
            Ok(state)
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn load_transactions(
        &self,
        request: &LoadTransactionsRequest,
    ) -> Result<Vec<Transaction>, Error> {
        let mut state = self.check(endpoints::LOAD_TRANSACTIONS)?;
        state.load_requests.push(request.clone());

        let end = request.end_i.min(state.transactions.len());
        let start = request.start_i.min(end);
        Ok(state.transactions[start..end].to_vec())
    }

    async fn edit_transactions(&self, request: &EditTransactionsRequest) -> Result<(), Error> {
        self.check(endpoints::EDIT_TRANSACTIONS)?
            .edit_requests
            .push(request.clone());
        Ok(())
    }

    async fn add_transactions(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<TransactionId>, Error> {
        let mut state = self.check(endpoints::ADD_TRANSACTIONS)?;

        let mut ids = Vec::new();
        for transaction in transactions {
            let id = state.next_id;
            state.next_id += 1;
            state.added.push(transaction.clone());
            ids.push(id);
        }

        Ok(ids)
    }

    async fn delete_transactions(&self, ids: &[TransactionId]) -> Result<(), Error> {
        self.check(endpoints::DELETE_TRANSACTIONS)?
            .deleted_transactions
            .extend_from_slice(ids);
        Ok(())
    }

    async fn toggle_highlight(&self, id: TransactionId) -> Result<(), Error> {
        self.check(endpoints::TOGGLE_HIGHLIGHT)?
            .highlight_toggles
            .push(id);
        Ok(())
    }

    async fn toggle_ignore(&self, id: TransactionId) -> Result<(), Error> {
        self.check(endpoints::TOGGLE_IGNORE)?.ignore_toggles.push(id);
        Ok(())
    }

    async fn edit_accounts(&self, request: &EditAccountsRequest) -> Result<(), Error> {
        self.check(endpoints::EDIT_ACCOUNTS)?
            .account_edits
            .push(request.clone());
        Ok(())
    }

    async fn delete_accounts(&self, ids: &[AccountId]) -> Result<(), Error> {
        self.check(endpoints::DELETE_ACCOUNTS)?
            .deleted_accounts
            .extend_from_slice(ids);
        Ok(())
    }

    async fn add_manual_account(&self, account: &NewManualAccount) -> Result<Account, Error> {
        let mut state = self.check(endpoints::ADD_ACCOUNT_MANUAL)?;
        state.new_accounts.push(account.clone());

        Ok(Account {
            id: 500 + state.new_accounts.len() as AccountId,
            name: account.name.clone(),
            nickname: String::new(),
            name_official: String::new(),
            institution: String::new(),
            current: Some(account.current),
            sub_type: account.sub_type,
            manual: true,
            iso_currency_code: account.iso_currency_code.clone(),
            ignored: false,
        })
    }

    async fn post_dash_load(&self) -> Result<DashboardSnapshot, Error> {
        Ok(self.check(endpoints::POST_DASH_LOAD)?.snapshot.clone())
    }

    async fn create_link_token(&self) -> Result<String, Error> {
        self.check(endpoints::CREATE_LINK_TOKEN)?;
        Ok("link-token".to_owned())
    }

    async fn create_link_token_update(&self, account_id: AccountId) -> Result<String, Error> {
        self.check(endpoints::CREATE_LINK_TOKEN_UPDATE)?
            .link_updates
            .push(account_id);
        Ok(format!("update-token-{account_id}"))
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
        _metadata: &LinkMetadata,
    ) -> Result<(), Error> {
        self.check(endpoints::EXCHANGE_PUBLIC_TOKEN)?
            .exchanged_tokens
            .push(public_token.to_owned());
        Ok(())
    }

    async fn load_spending_data(&self, range: SpendingRange) -> Result<SpendingData, Error> {
        let mut state = self.check(endpoints::LOAD_SPENDING_DATA)?;
        state.spending_ranges.push(range);
        Ok(state.spending.clone())
    }
}
