//! The form shared by the pages for creating and editing transactions.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::UserID,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, alert_slot, base,
        dollar_input_styles,
    },
    navigation::NavBar,
    report::distinct_categories,
    transaction::{
        Transaction, TransactionBuilder, TransactionKind, filter::format_date,
        filter::parse_date, query_transactions,
    },
};

/// The state needed by the transaction pages and endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or updating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction occurred, formatted as "YYYY-MM-DD".
    pub date: String,
    /// Text detailing the transaction.
    pub description: String,
    /// The optional category, e.g. "Groceries".
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionForm {
    /// Convert the submitted values into a validated [TransactionBuilder].
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if the date could not be parsed, or the
    /// errors from [TransactionBuilder::validate].
    pub fn to_builder(&self) -> Result<TransactionBuilder, Error> {
        let date = parse_date(&self.date).ok_or_else(|| Error::InvalidDate(self.date.clone()))?;

        let builder = Transaction::build(self.amount, self.kind, date, &self.description)
            .category(self.category.as_deref());
        builder.validate()?;

        Ok(builder)
    }
}

/// The values the form fields start with.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFormDefaults {
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    /// The raw date so that an invalid submission is shown as it was typed.
    pub date: String,
    pub description: String,
    pub category: String,
}

impl TransactionFormDefaults {
    /// An empty expense dated `today`.
    pub fn new(today: Date) -> Self {
        Self {
            kind: TransactionKind::Expense,
            amount: None,
            date: format_date(today),
            description: String::new(),
            category: String::new(),
        }
    }
}

impl From<&Transaction> for TransactionFormDefaults {
    fn from(transaction: &Transaction) -> Self {
        Self {
            kind: transaction.kind,
            amount: Some(transaction.amount),
            date: format_date(transaction.date),
            description: transaction.description.clone(),
            category: transaction.category.clone().unwrap_or_default(),
        }
    }
}

impl From<TransactionForm> for TransactionFormDefaults {
    fn from(form: TransactionForm) -> Self {
        Self {
            kind: form.kind,
            amount: Some(form.amount),
            date: form.date,
            description: form.description,
            category: form.category.unwrap_or_default(),
        }
    }
}

fn kind_radio(kind: TransactionKind, checked: bool) -> Markup {
    let id = format!("transaction-kind-{}", kind.as_str());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="kind"
                id=(id)
                type="radio"
                value=(kind.as_str())
                checked[checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind) }
        }
    }
}

pub fn transaction_form_fields(defaults: &TransactionFormDefaults, categories: &[String]) -> Markup {
    let amount = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (kind_radio(TransactionKind::Expense, defaults.kind == TransactionKind::Expense))
                (kind_radio(TransactionKind::Income, defaults.kind == TransactionKind::Income))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    autofocus
                    value=[amount]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                required
                value=(defaults.date)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                required
                value=(defaults.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            input
                name="category"
                id="category"
                type="text"
                list="category-options"
                placeholder="Uncategorized"
                value=(defaults.category)
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-options"
            {
                @for category in categories {
                    option value=(category) {}
                }
            }
        }
    }
}

/// Everything needed to render a page with a transaction form.
pub struct TransactionFormPage<'a> {
    pub title: &'a str,
    /// The page the navigation bar marks as active.
    pub nav_endpoint: &'a str,
    /// Where the form is posted to.
    pub action: &'a str,
    pub submit_label: &'a str,
    pub defaults: TransactionFormDefaults,
    pub categories: &'a [String],
    pub alert: Option<Alert>,
    /// Extra content shown below the form, e.g. a delete button.
    pub footer: Option<Markup>,
}

impl TransactionFormPage<'_> {
    pub fn into_html(self) -> Markup {
        let nav_bar = NavBar::new(self.nav_endpoint).into_html();
        let fields = transaction_form_fields(&self.defaults, self.categories);

        let content = html! {
            (nav_bar)

            div class=(FORM_CONTAINER_STYLE)
            {
                div class="w-full" { (alert_slot(self.alert)) }

                form
                    method="post"
                    action=(self.action)
                    class="w-full space-y-4 md:space-y-6"
                {
                    h2 class="text-xl font-bold" { (self.title) }

                    (fields)

                    button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                    {
                        (self.submit_label)
                    }
                }

                @if let Some(footer) = self.footer {
                    div class="w-full mt-4" { (footer) }
                }
            }
        };

        base(self.title, &[dollar_input_styles()], &content)
    }
}

/// The categories `user_id` has used so far, for suggesting in the form.
pub fn get_categories(user_id: UserID, connection: &Connection) -> Result<Vec<String>, Error> {
    let transactions = query_transactions(user_id, None, connection)?;

    Ok(distinct_categories(&transactions))
}

#[cfg(test)]
mod transaction_form_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        transaction::{
            Transaction, TransactionKind,
            form::{TransactionForm, TransactionFormDefaults, transaction_form_fields},
        },
    };

    fn form(date: &str, description: &str, category: Option<&str>) -> TransactionForm {
        TransactionForm {
            kind: TransactionKind::Expense,
            amount: 12.5,
            date: date.to_owned(),
            description: description.to_owned(),
            category: category.map(str::to_owned),
        }
    }

    #[test]
    fn to_builder_parses_date_and_trims_category() {
        let builder = form("2024-01-10", "Groceries", Some("  Food "))
            .to_builder()
            .unwrap();

        assert_eq!(
            builder,
            Transaction::build(12.5, TransactionKind::Expense, date!(2024 - 01 - 10), "Groceries")
                .category(Some("Food"))
        );
    }

    #[test]
    fn to_builder_rejects_invalid_date() {
        let result = form("10/01/2024", "Groceries", None).to_builder();

        assert_eq!(result, Err(Error::InvalidDate("10/01/2024".to_owned())));
    }

    #[test]
    fn to_builder_rejects_empty_description() {
        let result = form("2024-01-10", "   ", None).to_builder();

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    fn render_fields(defaults: &TransactionFormDefaults, categories: &[String]) -> Html {
        let markup = maud::html! { form { (transaction_form_fields(defaults, categories)) } };
        Html::parse_fragment(&markup.into_string())
    }

    #[test]
    fn fields_check_selected_kind() {
        for kind in [TransactionKind::Expense, TransactionKind::Income] {
            let defaults = TransactionFormDefaults {
                kind,
                ..TransactionFormDefaults::new(date!(2024 - 01 - 10))
            };
            let html = render_fields(&defaults, &[]);

            let selector = Selector::parse("input[type=radio][name=kind]").unwrap();
            let inputs = html.select(&selector).collect::<Vec<_>>();
            assert_eq!(inputs.len(), 2);

            let checked = inputs
                .iter()
                .find(|input| input.value().attr("checked").is_some())
                .and_then(|input| input.value().attr("value"));
            assert_eq!(checked, Some(kind.as_str()));
        }
    }

    #[test]
    fn fields_suggest_existing_categories() {
        let categories = vec!["Groceries".to_owned(), "Rent".to_owned()];
        let html = render_fields(&TransactionFormDefaults::new(date!(2024 - 01 - 10)), &categories);

        let selector = Selector::parse("datalist#category-options option").unwrap();
        let options = html
            .select(&selector)
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();

        assert_eq!(options, vec!["Groceries", "Rent"]);
    }

    #[test]
    fn defaults_from_transaction_prefill_amount_with_cents() {
        let transaction = Transaction {
            id: 1,
            description: "Rent".to_owned(),
            amount: 30.0,
            kind: TransactionKind::Expense,
            category: None,
            date: date!(2024 - 02 - 01),
            owner_id: crate::auth::UserID::new(1),
        };
        let html = render_fields(&TransactionFormDefaults::from(&transaction), &[]);

        let amount = html
            .select(&Selector::parse("input[name=amount]").unwrap())
            .next()
            .unwrap();
        let date = html
            .select(&Selector::parse("input[name=date]").unwrap())
            .next()
            .unwrap();

        assert_eq!(amount.value().attr("value"), Some("30.00"));
        assert_eq!(date.value().attr("value"), Some("2024-02-01"));
    }
}
