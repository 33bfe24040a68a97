//! Table views for dashboard data display.
//!
//! Provides HTML tables for the monthly report, the category ranking and the
//! list of transactions.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    report::{CategoryTotal, MonthlySummary, UNCATEGORIZED_LABEL},
    transaction::{Transaction, TransactionKind},
};

const TABLE_STYLE: &str = "w-full text-sm text-left text-gray-500 dark:text-gray-400";
const TABLE_CONTAINER_STYLE: &str = "overflow-x-auto rounded-lg shadow";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
pub(super) fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// Renders the income, expenses and balance of each month, most recent first.
pub(super) fn monthly_summary_table(monthly: &[MonthlySummary]) -> Markup {
    html! {
        section id="monthly-report" class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Monthly Report" }

            @if monthly.is_empty() {
                p { "Nothing to report yet." }
            } @else {
                div class=(TABLE_CONTAINER_STYLE)
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Income" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                            }
                        }

                        tbody
                        {
                            @for summary in monthly {
                                tr class=(TABLE_ROW_STYLE) data-month=(summary.month)
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE) { (summary.month) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(summary.totals.income)) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(summary.totals.expense)) }
                                    td class={(TABLE_CELL_STYLE) " " (amount_color_class(summary.totals.balance()))}
                                    {
                                        (format_currency(summary.totals.balance()))
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the categories with the most spending this month.
pub(super) fn top_categories_table(categories: &[CategoryTotal]) -> Markup {
    html! {
        section id="top-categories" class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Top Categories This Month" }

            @if categories.is_empty() {
                p { "No expenses this month." }
            } @else {
                div class=(TABLE_CONTAINER_STYLE)
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Spent" }
                            }
                        }

                        tbody
                        {
                            @for category in categories {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    th scope="row" class=(TABLE_CELL_STYLE) { (category.label()) }
                                    td class=(TABLE_CELL_STYLE) { (format_currency(category.total)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let amount_style = match transaction.kind {
        TransactionKind::Income => TABLE_CELL_GREEN_STYLE,
        TransactionKind::Expense => TABLE_CELL_RED_STYLE,
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) {
                (transaction.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL))
            }
            td class={(TABLE_CELL_STYLE) " " (amount_style)} {
                (format_currency(transaction.signed_amount()))
            }
            td class=(TABLE_CELL_STYLE) {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }
            }
        }
    }
}

/// Renders the filtered transactions, most recent first.
pub(super) fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        section id="transactions" class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Transactions" }

            @if transactions.is_empty() {
                p { "No transactions match the filters." }
            } @else {
                div class=(TABLE_CONTAINER_STYLE)
                {
                    table class=(TABLE_STYLE)
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }
            }
        }
    }
}
