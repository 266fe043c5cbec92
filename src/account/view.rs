use maud::{Markup, html};

use crate::html::{
    TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, currency_rounded_with_tooltip,
    format_currency,
};

use super::{core::AccountGroupSummary, view_model::AccountsViewModel};

/// Render the accounts as one section per group followed by net worth.
///
/// Group totals are signed, so debt shows as a negative amount.
pub fn render_account_groups(accounts: &AccountsViewModel) -> Markup {
    let groups = accounts.groups();
    let net_worth: f64 = groups.iter().map(|summary| summary.total).sum();

    html! {
        div id="accounts" class="flex flex-col gap-4 w-full"
        {
            @if groups.is_empty() {
                p data-empty-state="true" class="text-gray-500" { "No accounts yet." }
            }

            @for summary in &groups {
                (group_view(summary, accounts))
            }

            div class="flex justify-between font-semibold px-6"
            {
                span { "Net worth" }
                span data-net-worth=(net_worth) { (format_currency(net_worth)) }
            }
        }
    }
}

fn group_view(summary: &AccountGroupSummary, accounts: &AccountsViewModel) -> Markup {
    html! {
        section data-group=(summary.group.name())
        {
            div class={ "flex justify-between " (TABLE_HEADER_STYLE) " px-6 py-3" }
            {
                h3 { (summary.group.name()) }
                span data-group-total="true" { (currency_rounded_with_tooltip(summary.total)) }
            }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                tbody
                {
                    @for account in &summary.accounts {
                        tr
                            class=(TABLE_ROW_STYLE)
                            data-account-id=(account.id)
                            data-ignored=[account.ignored.then_some("true")]
                        {
                            td class=(TABLE_CELL_STYLE) title=(account.official_description())
                            {
                                (account.display_name())

                                @if accounts.needs_reauth(account.id) {
                                    span
                                        class="ms-2 text-xs text-red-600"
                                        data-needs-reauth="true"
                                    {
                                        "Reconnect"
                                    }
                                }
                            }
                            td class="px-6 py-4 text-right"
                            {
                                (format_currency(summary.group.signed_value(account)))
                            }
                        }
                    }
                }
            }
        }
    }
}
