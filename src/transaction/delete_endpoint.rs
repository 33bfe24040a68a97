//! Defines the endpoint for deleting a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error,
    auth::UserID,
    endpoints,
    transaction::{TransactionId, delete_transaction, form::TransactionState},
};

/// A route handler for deleting a transaction, redirects to the dashboard on success.
///
/// Responds with the 403 page if the transaction belongs to another user and
/// with the 404 page if it does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, user_id, &connection)?;
    tracing::info!("User {user_id} deleted transaction {transaction_id}");

    Ok(Redirect::to(endpoints::DASHBOARD_VIEW).into_response())
}

#[cfg(test)]
mod delete_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        Error, endpoints,
        test_utils::{assert_redirect, create_test_user, get_test_connection},
        transaction::{
            Transaction, TransactionKind, create_transaction, delete_transaction_endpoint,
            form::TransactionState, get_transaction,
        },
    };

    #[tokio::test]
    async fn owner_can_delete_transaction() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let transaction = create_transaction(
            Transaction::build(1.23, TransactionKind::Expense, date!(2024 - 01 - 10), "Test"),
            user.id,
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_transaction_endpoint(State(state.clone()), Extension(user.id), Path(transaction.id))
                .await
                .into_response();

        assert_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert_eq!(
            get_transaction(transaction.id, user.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn other_user_cannot_delete_transaction() {
        let connection = get_test_connection();
        let owner = create_test_user("owner@example.com", &connection);
        let intruder = create_test_user("intruder@example.com", &connection);
        let transaction = create_transaction(
            Transaction::build(1.23, TransactionKind::Expense, date!(2024 - 01 - 10), "Test"),
            owner.id,
            &connection,
        )
        .unwrap();
        let state = TransactionState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(intruder.id),
            Path(transaction.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(
            get_transaction(transaction.id, owner.id, &state.db_connection.lock().unwrap())
                .is_ok()
        );
    }

    #[tokio::test]
    async fn deleting_unknown_transaction_is_not_found() {
        let connection = get_test_connection();
        let user = create_test_user("test@example.com", &connection);
        let state = TransactionState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let result = delete_transaction_endpoint(State(state), Extension(user.id), Path(999)).await;

        let error = result.err();
        assert_eq!(error, Some(Error::NotFound));
        assert_eq!(
            error.map(|error| error.into_response().status()),
            Some(StatusCode::NOT_FOUND)
        );
    }
}
