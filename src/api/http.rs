//! The [Backend] implementation that talks to the server over HTTP.

use async_trait::async_trait;
use reqwest::{
    Client, Method,
    header::{ACCEPT, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error,
    account::Account,
    config::ClientConfig,
    database_id::{AccountId, TransactionId},
    endpoints,
    logging::{log_request, log_response},
    transaction::Transaction,
};

use super::{
    Backend,
    payloads::{
        AddManualAccountResponse, AddTransactionsRequest, AddTransactionsResponse,
        DashboardSnapshot, EditAccountsRequest, EditTransactionsRequest,
        ExchangePublicTokenRequest, IdRequest, IdsRequest, LinkMetadata, LinkTokenResponse,
        LoadTransactionsRequest, LoadTransactionsResponse, NewManualAccount, SpendingData,
        SpendingRange, SuccessResponse,
    },
};

const CSRF_HEADER: &str = "x-csrftoken";

/// A JSON-over-HTTP client for the dashboard backend.
///
/// Every request carries the CSRF token and session cookie from the
/// [ClientConfig] it was created with.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    /// Create a client for the backend described by `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if the CSRF token or session ID cannot
    /// be sent in a header, or [Error::Http] if the HTTP client cannot be
    /// built.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CSRF_HEADER, header_value(&config.csrf_token)?);

        let mut cookie = format!("csrftoken={}", config.csrf_token);
        if let Some(session_id) = &config.session_id {
            cookie.push_str(&format!("; sessionid={session_id}"));
        }
        headers.insert(COOKIE, header_value(&cookie)?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &'static str,
        body: Option<String>,
    ) -> Result<T, Error> {
        let url = self.config.endpoint_url(path)?;
        let mut request = self.client.request(method.clone(), url);

        match body {
            Some(body) => {
                log_request(method.as_str(), path, &body);
                request = request
                    .header(CONTENT_TYPE, "application/json")
                    .body(body);
            }
            None => log_request(method.as_str(), path, ""),
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        log_response(path, status.as_u16(), &text);

        if !status.is_success() {
            tracing::error!("{path} returned {status}");
            return Err(Error::UnexpectedStatus {
                path: path.to_owned(),
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&text).map_err(|error| {
            tracing::error!("Could not decode response from {path}: {error}");
            Error::InvalidResponse {
                path: path.to_owned(),
                message: error.to_string(),
            }
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, Error> {
        self.send(Method::GET, path, None).await
    }

    async fn post<B, T>(&self, path: &'static str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body)
            .map_err(|error| Error::Http(format!("could not encode request to {path}: {error}")))?;

        self.send(Method::POST, path, Some(body)).await
    }

    /// Post `body` to an endpoint that answers with `{"success": bool}`.
    async fn post_expect_success<B>(&self, path: &'static str, body: &B) -> Result<(), Error>
    where
        B: Serialize + ?Sized + Sync,
    {
        let response: SuccessResponse = self.post(path, body).await?;
        check_success(path, response.success)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|error| Error::InvalidConfig(format!("{value:?} cannot be sent in a header: {error}")))
}

fn check_success(path: &'static str, success: bool) -> Result<(), Error> {
    if success {
        Ok(())
    } else {
        tracing::warn!("{path} reported failure");
        Err(Error::BackendRejected(path))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn load_transactions(
        &self,
        request: &LoadTransactionsRequest,
    ) -> Result<Vec<Transaction>, Error> {
        let response: LoadTransactionsResponse =
            self.post(endpoints::LOAD_TRANSACTIONS, request).await?;
        Ok(response.transactions)
    }

    async fn edit_transactions(&self, request: &EditTransactionsRequest) -> Result<(), Error> {
        self.post_expect_success(endpoints::EDIT_TRANSACTIONS, request)
            .await
    }

    async fn add_transactions(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<TransactionId>, Error> {
        let response: AddTransactionsResponse = self
            .post(
                endpoints::ADD_TRANSACTIONS,
                &AddTransactionsRequest { transactions },
            )
            .await?;
        check_success(endpoints::ADD_TRANSACTIONS, response.success)?;

        if response.ids.len() != transactions.len() {
            return Err(Error::MismatchedIds {
                expected: transactions.len(),
                got: response.ids.len(),
            });
        }

        Ok(response.ids)
    }

    async fn delete_transactions(&self, ids: &[TransactionId]) -> Result<(), Error> {
        self.post_expect_success(endpoints::DELETE_TRANSACTIONS, &IdsRequest { ids })
            .await
    }

    async fn toggle_highlight(&self, id: TransactionId) -> Result<(), Error> {
        self.post_expect_success(endpoints::TOGGLE_HIGHLIGHT, &IdRequest { id })
            .await
    }

    async fn toggle_ignore(&self, id: TransactionId) -> Result<(), Error> {
        self.post_expect_success(endpoints::TOGGLE_IGNORE, &IdRequest { id })
            .await
    }

    async fn edit_accounts(&self, request: &EditAccountsRequest) -> Result<(), Error> {
        self.post_expect_success(endpoints::EDIT_ACCOUNTS, request)
            .await
    }

    async fn delete_accounts(&self, ids: &[AccountId]) -> Result<(), Error> {
        self.post_expect_success(endpoints::DELETE_ACCOUNTS, &IdsRequest { ids })
            .await
    }

    async fn add_manual_account(&self, account: &NewManualAccount) -> Result<Account, Error> {
        let response: AddManualAccountResponse =
            self.post(endpoints::ADD_ACCOUNT_MANUAL, account).await?;
        Ok(response.account)
    }

    async fn post_dash_load(&self) -> Result<DashboardSnapshot, Error> {
        self.get(endpoints::POST_DASH_LOAD).await
    }

    async fn create_link_token(&self) -> Result<String, Error> {
        let response: LinkTokenResponse = self.get(endpoints::CREATE_LINK_TOKEN).await?;
        Ok(response.link_token)
    }

    async fn create_link_token_update(&self, account_id: AccountId) -> Result<String, Error> {
        let response: LinkTokenResponse = self
            .post(
                endpoints::CREATE_LINK_TOKEN_UPDATE,
                &IdRequest { id: account_id },
            )
            .await?;
        Ok(response.link_token)
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
        metadata: &LinkMetadata,
    ) -> Result<(), Error> {
        self.post_expect_success(
            endpoints::EXCHANGE_PUBLIC_TOKEN,
            &ExchangePublicTokenRequest {
                public_token,
                metadata,
            },
        )
        .await
    }

    async fn load_spending_data(&self, range: SpendingRange) -> Result<SpendingData, Error> {
        self.post(endpoints::LOAD_SPENDING_DATA, &range).await
    }
}
