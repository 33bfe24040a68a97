//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, auth::UserID, forbidden::ForbiddenError,
    internal_server_error::InternalServerError, not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth cookie was missing, could not be decoded or has expired.
    #[error("invalid auth cookie: {0}")]
    CookieError(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The password and confirmation password did not match.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// The email address is not in a valid format.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// An empty string was used for the user's name.
    #[error("name cannot be empty")]
    EmptyName,

    /// The email address is already used by another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A date string could not be parsed as YYYY-MM-DD.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// A transaction amount was zero, negative or not a finite number.
    ///
    /// The sign of a transaction is given by its kind, so amounts are
    /// always stored as positive numbers.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// An empty string was used for a transaction description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// A monthly goal could not be parsed as a number.
    #[error("\"{0}\" is not a valid monthly goal, enter an amount such as 500.00")]
    InvalidGoal(String),

    /// A monthly goal was negative or not a finite number.
    #[error("{0} is not a valid monthly goal, goals cannot be negative")]
    NegativeGoal(f64),

    /// The user ID used to create a transaction does not refer to a registered user.
    #[error("the user ID {0} does not refer to a registered user")]
    InvalidOwner(UserID),

    /// The requested resource belongs to another user.
    ///
    /// Distinct from [Error::NotFound] so that a request for someone else's
    /// data is rejected rather than reported as missing.
    #[error("the requested resource belongs to another user")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Forbidden => ForbiddenError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into a status code and an alert to show above a form.
    ///
    /// Validation errors keep their message so the user can correct the
    /// input. Internal errors are logged and replaced with a generic message.
    pub fn into_alert(self) -> (StatusCode, Alert) {
        match self {
            Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::EmptyDescription
            | Error::InvalidGoal(_)
            | Error::NegativeGoal(_)
            | Error::TooWeak(_)
            | Error::PasswordMismatch
            | Error::InvalidEmail(_)
            | Error::EmptyName
            | Error::DuplicateEmail
            | Error::InvalidCredentials => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Please check your input".to_owned(),
                    details: capitalize(&self.to_string()),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find the transaction".to_owned(),
                    details: "Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                Alert::Error {
                    message: "Access denied".to_owned(),
                    details: "You do not have permission to change this transaction.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
