#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod html;

pub(crate) use backend::FakeBackend;
pub(crate) use html::{
    assert_valid_html, must_select_text, parse_html_document, parse_html_fragment, select_all,
};

use crate::{
    account::{Account, AccountSubType},
    database_id::AccountId,
};

/// A linked USD account named "account {id}" at "Bank".
pub(crate) fn account(id: AccountId, sub_type: AccountSubType, current: f64) -> Account {
    Account {
        id,
        name: format!("account {id}"),
        nickname: String::new(),
        name_official: String::new(),
        institution: "Bank".to_owned(),
        current: Some(current),
        sub_type,
        manual: false,
        iso_currency_code: "USD".to_owned(),
        ignored: false,
    }
}
