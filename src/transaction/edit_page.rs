//! Defines the route handler for the page for editing a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    alert::Alert,
    auth::UserID,
    endpoints::{self, format_endpoint},
    html::BUTTON_DELETE_STYLE,
    transaction::{
        TransactionId,
        form::{TransactionFormDefaults, TransactionFormPage, TransactionState, get_categories},
        get_transaction,
    },
};

fn delete_form(transaction_id: TransactionId) -> Markup {
    html! {
        form
            method="post"
            action=(format_endpoint(endpoints::DELETE_TRANSACTION, transaction_id))
            class="text-center"
        {
            button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete Transaction" }
        }
    }
}

/// Render the edit form for `transaction_id` prefilled with `defaults`.
pub(super) fn edit_transaction_view(
    transaction_id: TransactionId,
    defaults: TransactionFormDefaults,
    categories: &[String],
    alert: Option<Alert>,
) -> Markup {
    let action = format_endpoint(endpoints::TRANSACTION, transaction_id);

    TransactionFormPage {
        title: "Edit Transaction",
        nav_endpoint: endpoints::EDIT_TRANSACTION_VIEW,
        action: &action,
        submit_label: "Save Changes",
        defaults,
        categories,
        alert,
        footer: Some(delete_form(transaction_id)),
    }
    .into_html()
}

/// Renders the page for editing a transaction.
///
/// Responds with the 403 page if the transaction belongs to another user and
/// with the 404 page if it does not exist.
pub async fn get_edit_transaction_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, user_id, &connection)?;
    let categories = get_categories(user_id, &connection)?;

    Ok(edit_transaction_view(
        transaction_id,
        TransactionFormDefaults::from(&transaction),
        &categories,
        None,
    )
    .into_response())
}
