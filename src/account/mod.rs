//! Bank and manual accounts, their groups and unsaved edits.

mod core;
mod view;
mod view_model;

pub use core::{Account, AccountGroup, AccountGroupSummary, AccountSubType};
pub use view::render_account_groups;
pub use view_model::{AccountEdit, AccountsViewModel};
