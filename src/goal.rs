//! The page and endpoint for setting the monthly spending goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{UserID, get_user_by_id, set_monthly_goal},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        alert_slot, base, dollar_input_styles, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for the monthly goal page.
#[derive(Debug, Clone)]
pub struct GoalState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn goal_view(current_goal: Option<f64>, alert: Option<Alert>) -> Markup {
    let nav_bar = NavBar::new(endpoints::GOAL_VIEW).into_html();
    let value = current_goal.map(|goal| format!("{goal:.2}"));

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full" { (alert_slot(alert)) }

            form
                method="post"
                action=(endpoints::GOAL_API)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Monthly Goal" }

                p id="current-goal"
                {
                    @match current_goal {
                        Some(goal) => { "Your goal is to spend at most " (format_currency(goal)) " per month." }
                        None => { "You have not set a monthly goal." }
                    }
                }

                div
                {
                    label for="monthly_goal" class=(FORM_LABEL_STYLE) { "Maximum monthly spending" }

                    div class="input-wrapper w-full"
                    {
                        input
                            name="monthly_goal"
                            id="monthly_goal"
                            type="number"
                            step="0.01"
                            min="0"
                            placeholder="Leave empty to remove the goal"
                            value=[value]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Save Goal"
                }
            }
        }
    };

    base("Monthly Goal", &[dollar_input_styles()], &content)
}

/// Renders the page for setting the monthly goal.
pub async fn get_goal_page(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)?;

    Ok(goal_view(user.monthly_goal, None).into_response())
}

/// The form data for setting the monthly goal.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoalForm {
    /// An empty value removes the goal.
    #[serde(default)]
    pub monthly_goal: Option<String>,
}

impl GoalForm {
    /// Parse the submitted goal, `None` if the field was left empty.
    fn parse_goal(&self) -> Result<Option<f64>, Error> {
        let Some(raw) = self
            .monthly_goal
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
        else {
            return Ok(None);
        };

        match raw.parse::<f64>() {
            Ok(goal) if goal.is_finite() => Ok(Some(goal)),
            _ => Err(Error::InvalidGoal(raw.to_owned())),
        }
    }
}

/// A route handler for setting the monthly goal, redirects to the dashboard on success.
///
/// A negative goal is rejected and the stored goal is left unchanged.
pub async fn set_goal_endpoint(
    State(state): State<GoalState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<GoalForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let result = form
        .parse_goal()
        .and_then(|goal| set_monthly_goal(user_id, goal, &connection));

    match result {
        Ok(()) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error) => {
            tracing::warn!("could not set monthly goal for user {user_id}: {error}");
            let current_goal = get_user_by_id(user_id, &connection)
                .map(|user| user.monthly_goal)
                .unwrap_or_default();
            let (status, alert) = error.into_alert();

            (status, goal_view(current_goal, Some(alert))).into_response()
        }
    }
}
