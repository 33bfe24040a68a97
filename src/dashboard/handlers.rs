//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The state used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{UserID, get_user_by_id},
    dashboard::{
        cards::{comparison_card, forecast_card, totals_cards},
        filter_form::filter_form,
        tables::{monthly_summary_table, top_categories_table, transactions_table},
    },
    endpoints,
    html::{alert_slot, base, link},
    navigation::NavBar,
    report::{DashboardReport, ReportMode},
    timezone::get_local_today,
    transaction::{FilterQuery, FilterWarning, parse_filter, query_transactions},
};

/// The state needed for displaying the dashboard page.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and the monthly goal.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display a page with an overview of the user's finances.
///
/// The query string narrows down the transactions, see [FilterQuery]. Invalid
/// filter values are ignored and reported in a warning above the report.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<FilterQuery>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let (transactions, monthly_goal) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let transactions = query_transactions(user_id, None, &connection).inspect_err(|error| {
            tracing::error!("Could not get transactions for user {user_id}: {error}")
        })?;
        let user = get_user_by_id(user_id, &connection)
            .inspect_err(|error| tracing::error!("Could not get user {user_id}: {error}"))?;

        (transactions, user.monthly_goal)
    };

    let (filter, warnings) = parse_filter(&query);

    if transactions.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar, warnings_alert(&warnings)).into_response());
    }

    let today = get_local_today(&state.local_timezone)?;
    let mode = ReportMode::from_filter(&filter);
    let report = DashboardReport::build(transactions, &filter, mode, today, monthly_goal);

    Ok(dashboard_view(nav_bar, &query, &report, warnings_alert(&warnings)).into_response())
}

/// Combine the filter warnings into a single alert, or `None` if there are none.
fn warnings_alert(warnings: &[FilterWarning]) -> Option<Alert> {
    if warnings.is_empty() {
        return None;
    }

    let details = warnings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");

    Some(Alert::Warning {
        message: "Some filters were ignored.".to_owned(),
        details,
    })
}

/// Renders the dashboard page when the user has no transactions.
fn dashboard_no_data_view(nav_bar: NavBar, alert: Option<Alert>) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            (alert_slot(alert))

            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your income, expenses and spending forecast will show up here. "
                "Get started by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Describes the selected date range, e.g. "From 2024-01-01 to 2024-01-31".
fn date_range_label(mode: ReportMode) -> Option<String> {
    match mode {
        ReportMode::DateRange {
            from: Some(from),
            to: Some(to),
        } => Some(format!("From {from} to {to}")),
        ReportMode::DateRange {
            from: Some(from),
            to: None,
        } => Some(format!("From {from} onwards")),
        ReportMode::DateRange {
            from: None,
            to: Some(to),
        } => Some(format!("Up to {to}")),
        ReportMode::DateRange { .. } | ReportMode::MonthlySummary => None,
    }
}

/// Renders the main dashboard page.
fn dashboard_view(
    nav_bar: NavBar,
    query: &FilterQuery,
    report: &DashboardReport,
    alert: Option<Alert>,
) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center gap-6 px-2 lg:px-6 py-4 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="w-full" { (alert_slot(alert)) }

            (filter_form(query, &report.categories))

            @if let Some(label) = date_range_label(report.mode) {
                p id="date-range" class="w-full text-lg font-semibold" { (label) }
            }

            (totals_cards(&report.totals))

            section id="this-month" class="w-full"
            {
                div class="grid grid-cols-1 md:grid-cols-2 gap-4"
                {
                    (comparison_card(&report.comparison))
                    (forecast_card(&report.forecast, report.goal.as_ref()))
                }
            }

            (top_categories_table(&report.top_categories))

            @if report.mode == ReportMode::MonthlySummary {
                (monthly_summary_table(&report.monthly))
            }

            (transactions_table(&report.transactions))
        }
    );

    base("Dashboard", &[], &content)
}
