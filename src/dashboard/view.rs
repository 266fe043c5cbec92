use maud::{Markup, html};

use crate::{
    account::render_account_groups,
    api::Backend,
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    transaction::{render_pagination, render_transaction_table},
};

use super::{
    charts::{charts_script, charts_view, spending_charts},
    controller::Dashboard,
};

/// Render the dashboard as a full HTML page.
///
/// Shows queued alerts, the accounts, the current page of transactions and,
/// once spending data was loaded, the spending charts.
pub fn render_dashboard<B: Backend>(dashboard: &Dashboard<B>) -> Markup {
    let ledger = dashboard.transactions();
    let page = ledger.page_transactions();
    let has_next = page.len() == ledger.page_size();

    let charts = dashboard
        .spending_data()
        .map(|data| spending_charts(data, dashboard.custom_categories()))
        .unwrap_or_default();

    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            @for alert in dashboard.alerts() {
                (alert.view())
            }

            @if !charts.is_empty() {
                (charts_view(&charts))
            }

            section id="accounts-section" class="w-full mb-4"
            {
                h2 class="text-xl font-bold mb-2" { "Accounts" }
                (render_account_groups(dashboard.accounts()))
            }

            section id="transactions-section" class="w-full"
            {
                h2 class="text-xl font-bold mb-2" { "Transactions" }
                (render_transaction_table(&page, dashboard.custom_categories(), true))
                (render_pagination(ledger.page(), has_next))
            }
        }
    };

    let scripts = if charts.is_empty() {
        Vec::new()
    } else {
        vec![
            HeadElement::ScriptLink(endpoints::ECHARTS_SCRIPT.to_owned()),
            charts_script(&charts),
        ]
    };

    base("Dashboard", &scripts, &content)
}
