//! The form for narrowing the dashboard down by date, type, category and description.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE},
    transaction::{
        FilterQuery, TransactionKind,
        filter::{ALL_SENTINEL, UNCATEGORIZED_SENTINEL},
    },
};

fn is_selected(current: Option<&str>, value: &str) -> bool {
    current.is_some_and(|current| current.eq_ignore_ascii_case(value))
}

fn kind_select(current: Option<&str>) -> Markup {
    let current = current.filter(|kind| !kind.is_empty());

    html! {
        select name="kind" id="filter-kind" class=(FORM_TEXT_INPUT_STYLE)
        {
            option value=(ALL_SENTINEL) selected[current.is_none() || is_selected(current, ALL_SENTINEL)] { "All" }

            @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                option value=(kind.as_str()) selected[is_selected(current, kind.as_str())] { (kind) }
            }
        }
    }
}

fn category_select(current: Option<&str>, categories: &[String]) -> Markup {
    let current = current.filter(|category| !category.is_empty());

    html! {
        select name="category" id="filter-category" class=(FORM_TEXT_INPUT_STYLE)
        {
            option value=(ALL_SENTINEL) selected[current.is_none() || is_selected(current, ALL_SENTINEL)] { "All" }
            option value=(UNCATEGORIZED_SENTINEL) selected[is_selected(current, UNCATEGORIZED_SENTINEL)] { "Uncategorized" }

            @for category in categories {
                option value=(category) selected[is_selected(current, category)] { (category) }
            }
        }
    }
}

/// Renders the filter form, prefilled with the values from `query`.
///
/// The form is submitted with GET so that filters end up in the URL.
pub(super) fn filter_form(query: &FilterQuery, categories: &[String]) -> Markup {
    html! {
        section id="filters" class="w-full"
        {
            form
                method="get"
                action=(endpoints::DASHBOARD_VIEW)
                class="bg-gray-50 dark:bg-gray-800 p-4 rounded-lg grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-6 gap-3 items-end"
            {
                div
                {
                    label for="date_from" class=(FORM_LABEL_STYLE) { "From" }
                    input
                        type="date"
                        name="date_from"
                        id="date_from"
                        value=[query.date_from.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="date_to" class=(FORM_LABEL_STYLE) { "To" }
                    input
                        type="date"
                        name="date_to"
                        id="date_to"
                        value=[query.date_to.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="filter-kind" class=(FORM_LABEL_STYLE) { "Type" }
                    (kind_select(query.kind.as_deref()))
                }

                div
                {
                    label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }
                    (category_select(query.category.as_deref(), categories))
                }

                div
                {
                    label for="search" class=(FORM_LABEL_STYLE) { "Description" }
                    input
                        type="search"
                        name="search"
                        id="search"
                        placeholder="Search"
                        value=[query.search.as_deref()]
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex flex-col items-center gap-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
                    a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}

#[cfg(test)]
mod filter_form_tests {
    use scraper::{Html, Selector};

    use crate::transaction::FilterQuery;

    use super::filter_form;

    fn selected_value(html: &Html, select_name: &str) -> Option<String> {
        let selector = Selector::parse(&format!("select[name={select_name}] option[selected]")).unwrap();
        let values = html
            .select(&selector)
            .filter_map(|option| option.value().attr("value"))
            .map(str::to_owned)
            .collect::<Vec<_>>();

        assert!(values.len() <= 1, "more than one option selected: {values:?}");
        values.into_iter().next()
    }

    #[test]
    fn defaults_to_all() {
        let html = Html::parse_fragment(&filter_form(&FilterQuery::default(), &[]).into_string());

        assert_eq!(selected_value(&html, "kind").as_deref(), Some("all"));
        assert_eq!(selected_value(&html, "category").as_deref(), Some("all"));
    }

    #[test]
    fn keeps_submitted_values() {
        let query = FilterQuery {
            date_from: Some("2024-01-01".to_owned()),
            date_to: None,
            kind: Some("expense".to_owned()),
            category: Some("Rent".to_owned()),
            search: Some("bus".to_owned()),
        };
        let categories = vec!["Groceries".to_owned(), "Rent".to_owned()];

        let html = Html::parse_fragment(&filter_form(&query, &categories).into_string());

        assert_eq!(selected_value(&html, "kind").as_deref(), Some("expense"));
        assert_eq!(selected_value(&html, "category").as_deref(), Some("Rent"));

        let date_from = html
            .select(&Selector::parse("input[name=date_from]").unwrap())
            .next()
            .unwrap();
        assert_eq!(date_from.value().attr("value"), Some("2024-01-01"));

        let search = html
            .select(&Selector::parse("input[name=search]").unwrap())
            .next()
            .unwrap();
        assert_eq!(search.value().attr("value"), Some("bus"));
    }
}
