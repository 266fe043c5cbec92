//! HTML rendering for the transaction ledger.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::{BuiltInCategory, Category, CustomCategory, resolve_category},
    html::{
        BUTTON_DISABLED_STYLE, BUTTON_SECONDARY_STYLE, FEE_ROW_STYLE, HIGHLIGHTED_ROW_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
};

use super::core::Transaction;

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

fn amount_class(amount: f64) -> &'static str {
    if amount < 0.0 {
        "text-red-700 dark:text-red-300"
    } else if amount > 0.0 {
        "text-green-700 dark:text-green-300"
    } else {
        "text-gray-500"
    }
}

fn row_class(transaction: &Transaction) -> &'static str {
    if transaction.highlighted {
        HIGHLIGHTED_ROW_STYLE
    } else if transaction
        .categories
        .contains(&Category::BuiltIn(BuiltInCategory::FEES))
    {
        FEE_ROW_STYLE
    } else {
        TABLE_ROW_STYLE
    }
}

/// Render a page of transactions as a table.
///
/// Category icons are shown when `show_icons` is set, otherwise category
/// names.
pub fn render_transaction_table(
    transactions: &[Transaction],
    custom_categories: &[CustomCategory],
    show_icons: bool,
) -> Markup {
    html! {
        table
            id="transaction-table"
            class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Notes" }
                    th scope="col" class="px-6 py-3 text-right" { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                }
            }

            tbody
            {
                @for transaction in transactions {
                    (transaction_row_view(transaction, custom_categories, show_icons))
                }

                @if transactions.is_empty() {
                    tr
                    {
                        td colspan="5" data-empty-state="true" class="px-6 py-4 text-center"
                        {
                            "No transactions match these filters."
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row_view(
    transaction: &Transaction,
    custom_categories: &[CustomCategory],
    show_icons: bool,
) -> Markup {
    let (description, tooltip) = format_description(&transaction.description);
    let categories: Vec<_> = if transaction.categories.is_empty() {
        vec![resolve_category(Category::Uncategorized, custom_categories)]
    } else {
        transaction
            .categories
            .iter()
            .map(|category| resolve_category(*category, custom_categories))
            .collect()
    };

    html! {
        tr
            class=(row_class(transaction))
            data-transaction-id=(transaction.id)
            data-ignored=[transaction.ignored.then_some("true")]
        {
            td class=(TABLE_CELL_STYLE) data-category="true"
            {
                @for category in &categories {
                    @if show_icons && !category.icon.is_empty() {
                        span title=(category.name) { (category.icon) }
                    } @else {
                        span { (category.name) }
                    }
                }
            }
            td class=(TABLE_CELL_STYLE) title=[tooltip]
            {
                @if let Some(logo_url) = &transaction.logo_url {
                    img src=(logo_url) alt="" class="inline w-4 h-4 me-2";
                }
                (description)
                @if transaction.pending {
                    span class="ms-2 text-xs italic text-gray-400" data-pending="true" { "(pending)" }
                }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.notes) }
            td class={ "px-6 py-4 text-right " (amount_class(transaction.amount)) }
            {
                (format_currency(transaction.amount))
            }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.display_date()) }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

/// Render the previous/next page controls.
///
/// `page` is zero-based. The previous button is disabled on the first page
/// and the next button when the current page is not full.
pub fn render_pagination(page: usize, has_next: bool) -> Markup {
    html! {
        nav class="flex items-center gap-4" aria-label="Pagination"
        {
            @if page == 0 {
                button type="button" class=(BUTTON_DISABLED_STYLE) disabled data-direction="previous"
                { "Previous" }
            } @else {
                button type="button" class=(BUTTON_SECONDARY_STYLE) data-direction="previous"
                { "Previous" }
            }

            span data-page=(page) { "Page " (page + 1) }

            @if has_next {
                button type="button" class=(BUTTON_SECONDARY_STYLE) data-direction="next"
                { "Next" }
            } @else {
                button type="button" class=(BUTTON_DISABLED_STYLE) disabled data-direction="next"
                { "Next" }
            }
        }
    }
}
