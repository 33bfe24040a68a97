//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    transaction::{
        create_transaction,
        form::{TransactionForm, TransactionFormPage, TransactionState, get_categories},
    },
};

/// A route handler for creating a new transaction, redirects to the dashboard on success.
///
/// Invalid input is shown as an alert above the submitted form.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let result = form
        .to_builder()
        .and_then(|builder| create_transaction(builder, user_id, &connection));

    match result {
        Ok(transaction) => {
            tracing::info!("User {user_id} created transaction {}", transaction.id);
            Redirect::to(endpoints::DASHBOARD_VIEW).into_response()
        }
        Err(error) => {
            tracing::warn!("could not create transaction: {error}");
            let categories = get_categories(user_id, &connection).unwrap_or_default();
            let (status, alert) = error.into_alert();

            let page = TransactionFormPage {
                title: "New Transaction",
                nav_endpoint: endpoints::NEW_TRANSACTION_VIEW,
                action: endpoints::TRANSACTIONS_API,
                submit_label: "Create Transaction",
                defaults: form.into(),
                categories: &categories,
                alert: Some(alert),
                footer: None,
            };

            (status, page.into_html()).into_response()
        }
    }
}
