//! Transactions and the ledger the dashboard shows them in.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Partial edits and input validation
//! - Filtering and sorting of the ledger
//! - The `TransactionViewModel` that pages through the ledger and tracks edits
//! - HTML rendering of the ledger

mod core;
mod edit;
mod filter;
mod view;
mod view_model;

pub use core::{Transaction, TransactionBuilder};
pub use edit::{TransactionEdit, parse_amount, parse_date};
pub use filter::{FilterUpdate, SortOrder, TransactionFilter};
pub use view::{render_pagination, render_transaction_table};
pub use view_model::{
    DraftStatus, FetchRequest, FetchState, FetchTicket, MergeOutcome, PageDirection, SaveBatch,
    TransactionViewModel, VisiblePage,
};
