//! The backend endpoints the client calls.
//!
//! All paths are relative to the base URL in the client configuration.

pub const LOAD_TRANSACTIONS: &str = "/load-transactions";
pub const EDIT_TRANSACTIONS: &str = "/edit-transactions";
pub const ADD_TRANSACTIONS: &str = "/add-transactions";
pub const DELETE_TRANSACTIONS: &str = "/delete-transactions";
pub const TOGGLE_HIGHLIGHT: &str = "/toggle-highlight";
pub const TOGGLE_IGNORE: &str = "/toggle-ignore";
pub const EDIT_ACCOUNTS: &str = "/edit-accounts";
pub const DELETE_ACCOUNTS: &str = "/delete-accounts";
pub const ADD_ACCOUNT_MANUAL: &str = "/add-account-manual";
pub const POST_DASH_LOAD: &str = "/post-dash-load";
pub const CREATE_LINK_TOKEN: &str = "/create-link-token";
pub const EXCHANGE_PUBLIC_TOKEN: &str = "/exchange-public-token";
pub const CREATE_LINK_TOKEN_UPDATE: &str = "/create-link-token-update";
pub const LOAD_SPENDING_DATA: &str = "/load-spending-data";

/// The ECharts build the rendered pages load their charts with.
pub const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";
