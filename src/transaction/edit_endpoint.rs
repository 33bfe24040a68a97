//! Defines the endpoint for updating a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error,
    auth::UserID,
    endpoints,
    transaction::{
        TransactionId,
        edit_page::edit_transaction_view,
        form::{TransactionForm, TransactionState, get_categories},
        update_transaction,
    },
};

/// A route handler for updating a transaction, redirects to the dashboard on success.
///
/// Only the owner of a transaction may update it, other users get the 403
/// page. Invalid input is shown as an alert above the submitted form.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
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
        .and_then(|builder| update_transaction(transaction_id, builder, user_id, &connection));

    match result {
        Ok(_) => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
        Err(error @ (Error::Forbidden | Error::NotFound)) => error.into_response(),
        Err(error) => {
            tracing::warn!("could not update transaction {transaction_id}: {error}");
            let categories = get_categories(user_id, &connection).unwrap_or_default();
            let (status, alert) = error.into_alert();

            (
                status,
                edit_transaction_view(transaction_id, form.into(), &categories, Some(alert)),
            )
                .into_response()
        }
    }
}
