//! This modules defines the common functionality for paging data.

/// The config for pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The number of transactions shown per page.
    pub page_size: usize,
}

impl PaginationConfig {
    /// The page size used when none is configured.
    pub const DEFAULT_PAGE_SIZE: usize = 60;
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}
