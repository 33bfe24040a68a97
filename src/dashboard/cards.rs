//! Card components for the dashboard summary.
//!
//! Provides cards showing:
//! - Total income, expenses and balance of the filtered transactions
//! - This month against last month
//! - The projected spending for this month and progress towards the goal

use maud::{Markup, html};

use crate::{
    dashboard::tables::amount_color_class,
    endpoints,
    html::{LINK_STYLE, format_currency},
    report::{GoalProgress, MonthComparison, SpendForecast, Totals},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col justify-between";
const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-600 dark:text-gray-400 mb-1";
const CARD_VALUE_STYLE: &str = "text-3xl font-bold";
const CARD_DETAIL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";

fn total_card(id: &str, title: &str, amount: f64, value_color: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE)
        {
            h4 class=(CARD_TITLE_STYLE) { (title) }
            div class={(CARD_VALUE_STYLE) " " (value_color)} { (format_currency(amount)) }
        }
    }
}

/// Renders the income, expense and balance totals.
pub(super) fn totals_cards(totals: &Totals) -> Markup {
    let balance = totals.balance();

    html! {
        section id="totals" class="w-full"
        {
            div class="grid grid-cols-1 sm:grid-cols-3 gap-4"
            {
                (total_card("total-income", "Income", totals.income, ""))
                (total_card("total-expense", "Expenses", totals.expense, ""))
                (total_card("balance", "Balance", balance, amount_color_class(balance)))
            }
        }
    }
}

/// Formats the change from last month, e.g. "+$12.30 vs last month".
fn variance_text(variance: f64) -> String {
    let sign = if variance > 0.0 { "+" } else { "" };
    format!("{sign}{} vs last month", format_currency(variance))
}

/// Renders this month's income and expenses next to last month's.
pub(super) fn comparison_card(comparison: &MonthComparison) -> Markup {
    let income_variance = comparison.income_variance();
    let expense_variance = comparison.expense_variance();

    html! {
        div id="month-comparison" class=(CARD_STYLE)
        {
            div
            {
                h4 class="text-lg font-semibold mb-3"
                {
                    (comparison.current_month) " vs " (comparison.previous_month)
                }

                div class="mb-2"
                {
                    div class=(CARD_TITLE_STYLE) { "Income" }
                    div class="text-xl font-bold" { (format_currency(comparison.current.income)) }
                    div class={"text-sm " (amount_color_class(income_variance))}
                    {
                        (variance_text(income_variance))
                    }
                }

                div
                {
                    div class=(CARD_TITLE_STYLE) { "Expenses" }
                    div class="text-xl font-bold" { (format_currency(comparison.current.expense)) }
                    // Spending more than last month is shown in red.
                    div class={"text-sm " (amount_color_class(-expense_variance))}
                    {
                        (variance_text(expense_variance))
                    }
                }
            }
        }
    }
}

/// Renders a horizontal bar showing how much of the goal has been spent.
fn progress_bar(spent: f64, goal: f64) -> Markup {
    let percentage = if goal > 0.0 {
        (spent / goal * 100.0).clamp(0.0, 100.0)
    } else {
        100.0
    };
    let bar_color = if spent > goal {
        "bg-red-600 dark:bg-red-500"
    } else {
        "bg-blue-600 dark:bg-blue-500"
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5 my-2"
            role="progressbar"
            aria-valuenow=(format!("{percentage:.0}"))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if percentage > 0.0 {
                div
                    class={(bar_color) " h-2.5 rounded-full"}
                    style=(format!("width: {percentage:.1}%"))
                {}
            }
        }
    }
}

fn goal_content(goal: &GoalProgress) -> Markup {
    let remaining = goal.remaining();

    html! {
        div id="goal-progress" class="mt-3"
        {
            div class=(CARD_DETAIL_STYLE)
            {
                "Goal: " (format_currency(goal.goal)) " per month"
            }

            (progress_bar(goal.month_to_date_expense, goal.goal))

            @if remaining >= 0.0 {
                div class="text-sm text-green-600 dark:text-green-400"
                {
                    (format_currency(remaining)) " left to spend"
                }
            } @else {
                div class="text-sm text-red-600 dark:text-red-400"
                {
                    (format_currency(-remaining)) " over the goal"
                }
            }

            @if goal.is_forecast_over_goal() {
                div class="text-sm font-medium text-red-600 dark:text-red-400"
                {
                    "At this rate you will spend more than your goal this month."
                }
            }
        }
    }
}

/// Renders the spending forecast for this month and progress towards the
/// monthly goal, if one is set.
pub(super) fn forecast_card(forecast: &SpendForecast, goal: Option<&GoalProgress>) -> Markup {
    html! {
        div id="forecast" class=(CARD_STYLE)
        {
            div
            {
                h4 class="text-lg font-semibold mb-3" { "This Month's Spending" }

                div class=(CARD_TITLE_STYLE) { "Spent so far" }
                div class="text-xl font-bold mb-2" { (format_currency(forecast.month_to_date_expense)) }

                div class=(CARD_DETAIL_STYLE)
                {
                    "Projected: " span id="projected-total" { (format_currency(forecast.projected_total)) }
                }
                div class=(CARD_DETAIL_STYLE)
                {
                    "Average expense: " (format_currency(forecast.average_expense))
                }
            }

            @match goal {
                Some(goal) => { (goal_content(goal)) }
                None => {
                    div class="mt-3 text-sm"
                    {
                        a href=(endpoints::GOAL_VIEW) class=(LINK_STYLE) { "Set a monthly goal" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod cards_tests {
    use scraper::{Html, Selector};
    use time::Month;

    use crate::report::{GoalProgress, MonthComparison, SpendForecast, Totals, YearMonth};

    use super::{comparison_card, forecast_card, totals_cards};

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("could not find {selector}"))
            .text()
            .collect()
    }

    #[test]
    fn totals_cards_show_balance() {
        let totals = Totals {
            income: 100.0,
            expense: 70.0,
        };

        let html = Html::parse_fragment(&totals_cards(&totals).into_string());

        assert!(text_of(&html, "#total-income").contains("$100.00"));
        assert!(text_of(&html, "#total-expense").contains("$70.00"));
        assert!(text_of(&html, "#balance").contains("$30.00"));
    }

    #[test]
    fn comparison_card_shows_change_from_last_month() {
        let comparison = MonthComparison {
            current_month: YearMonth::new(2024, Month::March),
            current: Totals {
                income: 100.0,
                expense: 50.0,
            },
            previous_month: YearMonth::new(2024, Month::February),
            previous: Totals {
                income: 150.0,
                expense: 20.0,
            },
        };

        let html = Html::parse_fragment(&comparison_card(&comparison).into_string());
        let text = text_of(&html, "#month-comparison");

        assert!(text.contains("2024-03 vs 2024-02"), "{text}");
        assert!(text.contains("-$50.00 vs last month"), "{text}");
        assert!(text.contains("+$30.00 vs last month"), "{text}");
    }

    #[test]
    fn forecast_card_links_to_goal_page_without_goal() {
        let forecast = SpendForecast {
            average_expense: 300.0,
            month_to_date_expense: 100.0,
            projected_total: 310.0,
        };

        let html = Html::parse_fragment(&forecast_card(&forecast, None).into_string());

        assert_eq!(text_of(&html, "#projected-total"), "$310.00");
        assert!(
            html.select(&Selector::parse("#goal-progress").unwrap())
                .next()
                .is_none()
        );
        assert_eq!(text_of(&html, "a"), "Set a monthly goal");
    }

    #[test]
    fn forecast_card_warns_when_forecast_exceeds_goal() {
        let forecast = SpendForecast {
            average_expense: 300.0,
            month_to_date_expense: 100.0,
            projected_total: 310.0,
        };
        let goal = GoalProgress::new(250.0, &forecast);

        let html = Html::parse_fragment(&forecast_card(&forecast, Some(&goal)).into_string());
        let text = text_of(&html, "#goal-progress");

        assert!(text.contains("$150.00 left to spend"), "{text}");
        assert!(text.contains("more than your goal"), "{text}");
    }
}
