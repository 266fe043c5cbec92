//! Settings for talking to the backend and presenting the ledger.

use std::time::Duration;

use reqwest::Url;

use crate::{Error, pagination::PaginationConfig, transaction::SortOrder};

/// What happens to a local edit when saving it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFailurePolicy {
    /// Keep the edit, marked as failed, so the user can retry.
    #[default]
    Retain,
    /// Drop the edit and show the last saved version again.
    Rollback,
}

/// The configuration for a dashboard client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// The backend's root URL.
    pub base_url: Url,
    /// The value of the `csrftoken` cookie, echoed in the `X-CSRFToken`
    /// header.
    pub csrf_token: String,
    /// The session cookie of a logged in user, if any.
    pub session_id: Option<String>,
    /// How long to wait for a backend response.
    pub timeout: Duration,
    /// Page size of the ledger.
    pub pagination: PaginationConfig,
    /// What to do with edits the backend failed to save.
    pub save_failure_policy: SaveFailurePolicy,
    /// The date order of the ledger.
    pub sort_order: SortOrder,
}

impl ClientConfig {
    /// The request timeout used when none is configured.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a config with default settings for the backend at `base_url`.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if `base_url` is not an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: &str, csrf_token: impl Into<String>) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|error| Error::InvalidConfig(format!("base URL {base_url:?}: {error}")))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "base URL must use http or https, got {:?}",
                base_url.scheme()
            )));
        }

        Ok(Self {
            base_url,
            csrf_token: csrf_token.into(),
            session_id: None,
            timeout: Self::DEFAULT_TIMEOUT,
            pagination: PaginationConfig::default(),
            save_failure_policy: SaveFailurePolicy::default(),
            sort_order: SortOrder::default(),
        })
    }

    /// Set the session cookie.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of transactions per page.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] for a page size of zero.
    pub fn page_size(mut self, page_size: usize) -> Result<Self, Error> {
        if page_size == 0 {
            return Err(Error::InvalidConfig("page size must be at least 1".to_owned()));
        }

        self.pagination.page_size = page_size;
        Ok(self)
    }

    /// Set what happens to edits that fail to save.
    pub fn save_failure_policy(mut self, policy: SaveFailurePolicy) -> Self {
        self.save_failure_policy = policy;
        self
    }

    /// Set the date order of the ledger.
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// The full URL of a backend endpoint.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| Error::InvalidConfig(format!("endpoint {path:?}: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, pagination::PaginationConfig};

    use super::{ClientConfig, SaveFailurePolicy};

    #[test]
    fn defaults() {
        let config = ClientConfig::new("http://localhost:8000", "token").unwrap();

        assert_eq!(config.pagination, PaginationConfig { page_size: 60 });
        assert_eq!(config.save_failure_policy, SaveFailurePolicy::Retain);
        assert_eq!(config.session_id, None);
    }

    #[test]
    fn rejects_malformed_base_url() {
        let result = ClientConfig::new("not a url", "token");

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let result = ClientConfig::new("ftp://example.com", "token");

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_page_size() {
        let result = ClientConfig::new("http://localhost", "token")
            .unwrap()
            .page_size(0);

        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn joins_endpoints_under_base_path() {
        let config = ClientConfig::new("https://example.com/budget/", "token").unwrap();

        let url = config.endpoint_url("/load-transactions").unwrap();

        assert_eq!(url.as_str(), "https://example.com/budget/load-transactions");
    }
}
