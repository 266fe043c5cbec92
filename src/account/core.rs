//! Bank and manual accounts, and how they add up to net worth.

use serde::{Deserialize, Serialize};

use crate::database_id::AccountId;

/// The kind of an account as reported by the bank or chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum AccountSubType {
    /// A checking account.
    Checking,
    /// A savings account.
    Savings,
    /// A debit card.
    Debit,
    /// A credit card.
    Credit,
    /// A 401(k) retirement account.
    Retirement401K,
    /// A student loan.
    Student,
    /// A mortgage.
    Mortgage,
    /// A certificate of deposit.
    Cd,
    /// A money market account.
    MoneyMarket,
    /// An individual retirement account.
    Ira,
    /// A mutual fund.
    MutualFund,
    /// A crypto wallet.
    Crypto,
    /// Any other asset, e.g. a house or car.
    Asset,
    /// A brokerage account.
    Brokerage,
    /// A Roth IRA.
    Roth,
    /// A single stock holding.
    Stock,
    /// A code this client does not know.
    Other(i64),
}

impl From<i64> for AccountSubType {
    fn from(code: i64) -> Self {
        match code {
            0 => AccountSubType::Checking,
            1 => AccountSubType::Savings,
            2 => AccountSubType::Debit,
            3 => AccountSubType::Credit,
            4 => AccountSubType::Retirement401K,
            5 => AccountSubType::Student,
            6 => AccountSubType::Mortgage,
            7 => AccountSubType::Cd,
            8 => AccountSubType::MoneyMarket,
            9 => AccountSubType::Ira,
            10 => AccountSubType::MutualFund,
            11 => AccountSubType::Crypto,
            12 => AccountSubType::Asset,
            13 => AccountSubType::Brokerage,
            14 => AccountSubType::Roth,
            15 => AccountSubType::Stock,
            other => AccountSubType::Other(other),
        }
    }
}

impl From<AccountSubType> for i64 {
    fn from(sub_type: AccountSubType) -> Self {
        match sub_type {
            AccountSubType::Checking => 0,
            AccountSubType::Savings => 1,
            AccountSubType::Debit => 2,
            AccountSubType::Credit => 3,
            AccountSubType::Retirement401K => 4,
            AccountSubType::Student => 5,
            AccountSubType::Mortgage => 6,
            AccountSubType::Cd => 7,
            AccountSubType::MoneyMarket => 8,
            AccountSubType::Ira => 9,
            AccountSubType::MutualFund => 10,
            AccountSubType::Crypto => 11,
            AccountSubType::Asset => 12,
            AccountSubType::Brokerage => 13,
            AccountSubType::Roth => 14,
            AccountSubType::Stock => 15,
            AccountSubType::Other(code) => code,
        }
    }
}

impl AccountSubType {
    /// The label shown in account forms.
    pub fn label(self) -> &'static str {
        match self {
            AccountSubType::Checking => "Checking",
            AccountSubType::Savings => "Savings",
            AccountSubType::Debit => "Debit card",
            AccountSubType::Credit => "Credit card",
            AccountSubType::Retirement401K => "401K",
            AccountSubType::Student => "Student",
            AccountSubType::Mortgage => "Mortgage",
            AccountSubType::Cd => "CD",
            AccountSubType::MoneyMarket => "Money market",
            AccountSubType::Ira => "IRA",
            AccountSubType::MutualFund => "Mutual fund",
            AccountSubType::Crypto => "Crypto",
            AccountSubType::Asset => "Asset (misc)",
            AccountSubType::Brokerage => "Brokerage",
            AccountSubType::Roth => "Roth",
            AccountSubType::Stock => "Stock",
            AccountSubType::Other(_) => "Other",
        }
    }
}

/// A bank account linked through the bank-link widget, or one the user
/// added by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the (sub-)account.
    pub id: AccountId,
    /// The account name from the bank, or the user's name for manual accounts.
    pub name: String,
    /// A name the user chose for a linked account.
    #[serde(default)]
    pub nickname: String,
    /// The official account name from the bank.
    #[serde(default)]
    pub name_official: String,
    /// The name of the bank.
    #[serde(default)]
    pub institution: String,
    /// The current value. Banks sometimes do not report one.
    #[serde(default)]
    pub current: Option<f64>,
    /// The kind of account.
    pub sub_type: AccountSubType,
    /// Whether the user added this account by hand.
    #[serde(default)]
    pub manual: bool,
    /// The ISO 4217 currency code of `current`.
    #[serde(default)]
    pub iso_currency_code: String,
    /// Whether the account is left out of totals.
    #[serde(default)]
    pub ignored: bool,
}

impl Account {
    /// The name to show for the account.
    ///
    /// Manual accounts use their name. Linked accounts use the nickname if
    /// the user set one, otherwise the bank's name.
    pub fn display_name(&self) -> &str {
        if self.manual || self.nickname.is_empty() {
            &self.name
        } else {
            &self.nickname
        }
    }

    /// Describes where the account comes from, e.g. "Chase: Checking, TOTAL CHECKING".
    pub fn official_description(&self) -> String {
        let mut description = self.institution.clone();

        if !self.manual {
            description.push_str(": ");
            description.push_str(&self.name);

            if !self.name_official.is_empty() {
                description.push_str(", ");
                description.push_str(&self.name_official);
            }
        }

        description
    }

    /// The current value, zero if unknown.
    pub fn value(&self) -> f64 {
        self.current.unwrap_or(0.0)
    }
}

/// The sections accounts are grouped into on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountGroup {
    /// Checking and savings.
    Cash,
    /// Retirement, brokerage and other investment accounts.
    Investment,
    /// Credit and debit cards.
    Credit,
    /// Student loans and mortgages.
    Loan,
    /// Crypto wallets.
    Crypto,
    /// Everything else the user owns.
    Assets,
}

impl AccountGroup {
    /// All groups in display order.
    pub const ALL: [AccountGroup; 6] = [
        AccountGroup::Cash,
        AccountGroup::Investment,
        AccountGroup::Credit,
        AccountGroup::Loan,
        AccountGroup::Crypto,
        AccountGroup::Assets,
    ];

    /// The group `sub_type` belongs to, if any.
    pub fn of(sub_type: AccountSubType) -> Option<AccountGroup> {
        match sub_type {
            AccountSubType::Checking | AccountSubType::Savings => Some(AccountGroup::Cash),
            AccountSubType::Retirement401K
            | AccountSubType::Cd
            | AccountSubType::MoneyMarket
            | AccountSubType::Ira
            | AccountSubType::MutualFund
            | AccountSubType::Brokerage
            | AccountSubType::Roth
            | AccountSubType::Stock => Some(AccountGroup::Investment),
            AccountSubType::Credit | AccountSubType::Debit => Some(AccountGroup::Credit),
            AccountSubType::Student | AccountSubType::Mortgage => Some(AccountGroup::Loan),
            AccountSubType::Crypto => Some(AccountGroup::Crypto),
            AccountSubType::Asset => Some(AccountGroup::Assets),
            AccountSubType::Other(_) => None,
        }
    }

    /// The heading shown for the group.
    pub fn name(self) -> &'static str {
        match self {
            AccountGroup::Cash => "Cash",
            AccountGroup::Investment => "Investment",
            AccountGroup::Credit => "Credit",
            AccountGroup::Loan => "Loan",
            AccountGroup::Crypto => "Crypto",
            AccountGroup::Assets => "Assets",
        }
    }

    /// Whether balances in this group are owed rather than owned.
    pub fn is_debt(self) -> bool {
        matches!(self, AccountGroup::Credit | AccountGroup::Loan)
    }

    /// The value of `account` as it counts towards the group total.
    ///
    /// Debt is subtracted from net worth, so its sign is inverted.
    pub fn signed_value(self, account: &Account) -> f64 {
        if self.is_debt() {
            -account.value()
        } else {
            account.value()
        }
    }
}

/// The accounts in one group and their total.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountGroupSummary {
    /// The group.
    pub group: AccountGroup,
    /// The accounts in the group, ignored ones included.
    pub accounts: Vec<Account>,
    /// The signed sum of the values of the accounts that are not ignored.
    pub total: f64,
}

/// Sort `accounts` into their groups in display order, leaving out empty
/// groups.
pub fn group_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Vec<AccountGroupSummary> {
    let mut summaries: Vec<AccountGroupSummary> = AccountGroup::ALL
        .iter()
        .map(|group| AccountGroupSummary {
            group: *group,
            accounts: Vec::new(),
            total: 0.0,
        })
        .collect();

    for account in accounts {
        let Some(group) = AccountGroup::of(account.sub_type) else {
            tracing::warn!(
                "Account {} has unknown sub-type {:?} and is not shown",
                account.id,
                account.sub_type
            );
            continue;
        };

        // ALL is in the same order as the enum.
        let summary = &mut summaries[group as usize];
        if !account.ignored {
            summary.total += group.signed_value(account);
        }
        summary.accounts.push(account.clone());
    }

    summaries.retain(|summary| !summary.accounts.is_empty());
    summaries
}

/// The sum of the group totals.
pub fn net_worth(groups: &[AccountGroupSummary]) -> f64 {
    groups.iter().map(|summary| summary.total).sum()
}

#[cfg(test)]
mod tests {
    use crate::test_utils::account;

    use super::{Account, AccountGroup, AccountSubType, group_accounts, net_worth};

    #[test]
    fn credit_and_loans_are_subtracted() {
        let accounts = vec![
            account(1, AccountSubType::Checking, 1000.0),
            account(2, AccountSubType::Credit, 250.0),
            account(3, AccountSubType::Mortgage, 500.0),
        ];

        let groups = group_accounts(&accounts);

        let totals: Vec<(AccountGroup, f64)> =
            groups.iter().map(|summary| (summary.group, summary.total)).collect();
        assert_eq!(
            totals,
            vec![
                (AccountGroup::Cash, 1000.0),
                (AccountGroup::Credit, -250.0),
                (AccountGroup::Loan, -500.0),
            ]
        );
        assert_eq!(net_worth(&groups), 250.0);
    }

    #[test]
    fn groups_follow_display_order_and_skip_empty_groups() {
        let accounts = vec![
            account(1, AccountSubType::Asset, 5.0),
            account(2, AccountSubType::Stock, 5.0),
            account(3, AccountSubType::Savings, 5.0),
        ];

        let groups: Vec<AccountGroup> =
            group_accounts(&accounts).iter().map(|summary| summary.group).collect();

        assert_eq!(
            groups,
            vec![AccountGroup::Cash, AccountGroup::Investment, AccountGroup::Assets]
        );
    }

    #[test]
    fn ignored_accounts_are_listed_but_not_totalled() {
        let mut ignored = account(2, AccountSubType::Savings, 300.0);
        ignored.ignored = true;
        let accounts = vec![account(1, AccountSubType::Checking, 100.0), ignored];

        let groups = group_accounts(&accounts);

        assert_eq!(groups[0].accounts.len(), 2);
        assert_eq!(groups[0].total, 100.0);
    }

    #[test]
    fn unknown_sub_type_is_left_out() {
        let accounts = vec![account(1, AccountSubType::from(99), 100.0)];

        assert!(group_accounts(&accounts).is_empty());
    }

    #[test]
    fn display_name_prefers_nickname_for_linked_accounts() {
        let mut linked = account(1, AccountSubType::Checking, 0.0);
        assert_eq!(linked.display_name(), "account 1");

        linked.nickname = "Bills".to_owned();
        assert_eq!(linked.display_name(), "Bills");

        linked.manual = true;
        assert_eq!(linked.display_name(), "account 1");
    }

    #[test]
    fn sub_type_round_trips_through_codes() {
        for code in 0..=15 {
            assert_eq!(i64::from(AccountSubType::from(code)), code);
        }
        assert_eq!(AccountSubType::from(42), AccountSubType::Other(42));
    }

    #[test]
    fn deserializes_backend_account() {
        let json = r#"{"id": 4, "name": "Checking", "nickname": "", "name_official": "TOTAL CHECKING",
            "institution": "Chase", "current": null, "sub_type": 0, "manual": false,
            "iso_currency_code": "USD"}"#;

        let got: Account = serde_json::from_str(json).unwrap();

        assert_eq!(got.sub_type, AccountSubType::Checking);
        assert_eq!(got.value(), 0.0);
        assert_eq!(got.official_description(), "Chase: Checking, TOTAL CHECKING");
    }
}
