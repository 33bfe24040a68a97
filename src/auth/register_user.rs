//! The registration page for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, create_user, set_auth_cookie, user::normalize_email},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, LINK_STYLE, base, log_in_register, password_input, text_input},
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

/// Error messages to show next to each form field.
#[derive(Debug, Default)]
struct FieldErrors {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    confirm_password: Option<String>,
}

impl FieldErrors {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
    }
}

fn registration_form(name: &str, email: &str, errors: &FieldErrors) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::USERS)
            class="space-y-4 md:space-y-6"
        {
            (text_input("name", "Name", "text", name, errors.name.as_deref()))
            (text_input("email", "Email", "email", email, errors.email.as_deref()))
            (password_input(
                "password",
                "Password",
                PASSWORD_INPUT_MIN_LENGTH,
                errors.password.as_deref(),
            ))
            (password_input(
                "confirm_password",
                "Confirm Password",
                PASSWORD_INPUT_MIN_LENGTH,
                errors.confirm_password.as_deref(),
            ))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "

                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

fn registration_page(name: &str, email: &str, errors: &FieldErrors) -> Markup {
    let form = registration_form(name, email, errors);
    let content = log_in_register("Create an account", &form);
    base("Register", &[], &content)
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    registration_page("", "", &FieldErrors::default()).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Check every field so that all problems are reported at once.
fn validate(form: &RegisterForm) -> Result<ValidatedPassword, FieldErrors> {
    let mut errors = FieldErrors::default();

    if form.name.trim().is_empty() {
        errors.name = Some(Error::EmptyName.to_string());
    }

    if let Err(error) = normalize_email(&form.email) {
        errors.email = Some(error.to_string());
    }

    let password = ValidatedPassword::new(&form.password, &[&form.name, &form.email]);

    if let Err(error) = &password {
        errors.password = Some(error.to_string());
    }

    if form.password != form.confirm_password {
        errors.confirm_password = Some(Error::PasswordMismatch.to_string());
    }

    match password {
        Ok(password) if errors.is_empty() => Ok(password),
        _ => Err(errors),
    }
}

/// Create a new user, log them in and redirect them to the dashboard.
///
/// Invalid input is reported next to the form fields.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let password = match validate(&form) {
        Ok(password) => password,
        Err(errors) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                registration_page(&form.name, &form.email, &errors),
            )
                .into_response();
        }
    };

    let result = PasswordHash::new(password, PasswordHash::DEFAULT_COST).and_then(|hash| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        create_user(&form.name, &form.email, hash, &connection)
    });

    let user = match result {
        Ok(user) => user,
        Err(Error::DuplicateEmail) => {
            let errors = FieldErrors {
                email: Some(
                    "An account with this email already exists, log in instead.".to_owned(),
                ),
                ..Default::default()
            };

            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                registration_page(&form.name, &form.email, &errors),
            )
                .into_response();
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while inserting a new user: {error}");
            return Redirect::to(endpoints::INTERNAL_ERROR_VIEW).into_response();
        }
    };

    tracing::info!("Registered user {}", user.id);

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => (jar, Redirect::to(endpoints::DASHBOARD_VIEW)).into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            Redirect::to(endpoints::INTERNAL_ERROR_VIEW).into_response()
        }
    }
}
