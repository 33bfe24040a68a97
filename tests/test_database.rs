//! Builds a test database through the public API, the same way the
//! `create_test_db` tool does.

use rusqlite::Connection;
use time::macros::date;

use finance_tracker::{
    PasswordHash, Transaction, TransactionKind, ValidatedPassword, create_transaction,
    create_user, get_user_by_id, initialize_db, set_monthly_goal,
};

#[test]
fn can_create_test_user_with_weak_password() {
    let conn = Connection::open_in_memory().unwrap();
    initialize_db(&conn).unwrap();

    let password_hash = PasswordHash::new(ValidatedPassword::new_unchecked("test"), 4).unwrap();
    let user = create_user("Test User", "test@example.com", password_hash, &conn).unwrap();
    set_monthly_goal(user.id, Some(2000.0), &conn).unwrap();
    create_transaction(
        Transaction::build(3200.0, TransactionKind::Income, date!(2025 - 01 - 01), "Salary")
            .category(Some("Salary")),
        user.id,
        &conn,
    )
    .unwrap();

    let stored = get_user_by_id(user.id, &conn).unwrap();
    assert_eq!(stored.monthly_goal, Some(2000.0));
    assert!(stored.password_hash.verify("test").unwrap());
}
