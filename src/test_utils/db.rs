use rusqlite::Connection;

use crate::{
    auth::{PasswordHash, User, ValidatedPassword, create_user},
    db::initialize,
};

pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// Insert a user with the email `email`, the password is "hunter2".
#[track_caller]
pub(crate) fn create_test_user(email: &str, connection: &Connection) -> User {
    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked("hunter2"), 4)
        .expect("Could not hash password");

    create_user("Test User", email, password_hash, connection).expect("Could not create user")
}
