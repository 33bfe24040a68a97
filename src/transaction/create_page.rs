//! Defines the route handler for the page for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    timezone::get_local_today,
    transaction::form::{
        TransactionFormDefaults, TransactionFormPage, TransactionState, get_categories,
    },
};

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let categories = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_categories(user_id, &connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve categories for new transaction page: {error}")
        })?
    };

    let today = get_local_today(&state.local_timezone)?;

    Ok(TransactionFormPage {
        title: "New Transaction",
        nav_endpoint: endpoints::NEW_TRANSACTION_VIEW,
        action: endpoints::TRANSACTIONS_API,
        submit_label: "Create Transaction",
        defaults: TransactionFormDefaults::new(today),
        categories: &categories,
        alert: None,
        footer: None,
    }
    .into_html()
    .into_response())
}
