//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    transaction::filter::{TransactionFilter, UNCATEGORIZED_SENTINEL},
};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for transaction IDs in the database.
pub type TransactionId = i64;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. a salary.
    Income,
    /// Money going out, e.g. groceries.
    Expense,
}

impl TransactionKind {
    /// The lowercase name used in forms, query strings and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Parse a kind from its name, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if raw.eq_ignore_ascii_case("income") {
            Some(TransactionKind::Income)
        } else if raw.eq_ignore_ascii_case("expense") {
            Some(TransactionKind::Expense)
        } else {
            None
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        TransactionKind::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// The amount is always positive, the direction of the money is given by
/// `kind`. To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The category of the transaction, e.g. "Groceries", "Rent".
    ///
    /// `None` means the transaction is uncategorized.
    pub category: Option<String>,
    /// When the transaction happened.
    pub date: Date,
    /// The user that owns this transaction.
    pub owner_id: UserID,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        kind: TransactionKind,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            kind,
            date,
            description: description.to_owned(),
            category: None,
        }
    }

    /// The amount with the sign implied by the kind: positive for income,
    /// negative for expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The category name, or `None` if the transaction is uncategorized.
    ///
    /// A category literally named "Uncategorized" counts as no category.
    pub fn category_name(&self) -> Option<&str> {
        normalize_category(self.category.as_deref())
    }
}

fn normalize_category(category: Option<&str>) -> Option<&str> {
    category.map(str::trim).filter(|category| {
        !category.is_empty() && !category.eq_ignore_ascii_case(UNCATEGORIZED_SENTINEL)
    })
}

/// A builder for creating or updating [Transaction] instances.
///
/// The builder holds everything except the ID and the owner, which come from
/// the database and the logged-in user respectively.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction, must be greater than zero.
    pub amount: f64,
    /// Whether the money was earned or spent.
    pub kind: TransactionKind,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction.
    pub description: String,
    /// The optional category, blank categories are stored as `None`.
    pub category: Option<String>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    ///
    /// Leading and trailing whitespace is removed. A blank category, or one
    /// named "Uncategorized" in any case, is treated as no category.
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = normalize_category(category).map(str::to_owned);
        self
    }

    /// Check the builder describes a valid transaction.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not a finite number
    /// greater than zero, or [Error::EmptyDescription] if the description is
    /// blank.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, description, amount, kind, category, date, user_id";

/// Create a new transaction owned by `owner_id` in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::EmptyDescription] if the builder is invalid,
/// - [Error::InvalidOwner] if `owner_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    owner_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (description, amount, kind, category, date, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.description.trim(),
                builder.amount,
                builder.kind,
                builder.category,
                builder.date,
                owner_id.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidOwner(owner_id),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve the transaction `id` on behalf of `requester`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::Forbidden] if the transaction belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    requester: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    if transaction.owner_id != requester {
        tracing::warn!(
            "user {requester} tried to access transaction {id} owned by user {}",
            transaction.owner_id
        );
        return Err(Error::Forbidden);
    }

    Ok(transaction)
}

/// Check that the transaction `id` exists and belongs to `requester`.
fn check_owner(id: TransactionId, requester: UserID, connection: &Connection) -> Result<(), Error> {
    let owner_id: i64 = connection
        .prepare("SELECT user_id FROM \"transaction\" WHERE id = :id")?
        .query_row(&[(":id", &id)], |row| row.get(0))?;

    if owner_id != requester.as_i64() {
        tracing::warn!("user {requester} tried to modify transaction {id} owned by user {owner_id}");
        return Err(Error::Forbidden);
    }

    Ok(())
}

/// Replace the contents of transaction `id` with `builder` on behalf of `requester`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] or [Error::EmptyDescription] if the builder is invalid,
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::Forbidden] if the transaction belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    requester: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;
    check_owner(id, requester, connection)?;

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET description = ?1, amount = ?2, kind = ?3, category = ?4, date = ?5
             WHERE id = ?6
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.description.trim(),
                builder.amount,
                builder.kind,
                builder.category,
                builder.date,
                id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete transaction `id` on behalf of `requester`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::Forbidden] if the transaction belongs to another user,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    requester: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    check_owner(id, requester, connection)?;

    connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    Ok(())
}

/// Get the transactions owned by `owner_id`, most recent first.
///
/// Transactions on the same date are ordered by descending ID so the most
/// recently recorded comes first. If `filter` is given, only the
/// transactions matching it are returned.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    owner_id: UserID,
    filter: Option<&TransactionFilter>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let transactions = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC"
        ))?
        .query_map(&[(":user_id", &owner_id.as_i64())], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()?;

    Ok(match filter {
        Some(filter) => filter.apply(transactions),
        None => transactions,
    })
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL CHECK (amount > 0),
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                category TEXT,
                date TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Index used by the dashboard query.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;
    let owner_id = UserID::new(row.get(6)?);

    Ok(Transaction {
        id,
        description,
        amount,
        kind,
        category,
        date,
        owner_id,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, User, UserID, create_user},
        db::initialize,
        transaction::{
            Transaction, TransactionFilter, TransactionKind, count_transactions,
            create_transaction, delete_transaction, get_transaction, query_transactions,
            update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_user(email: &str, conn: &Connection) -> User {
        create_user(
            "Test User",
            email,
            PasswordHash::new_unchecked("hunter2"),
            conn,
        )
        .unwrap()
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        let result = create_transaction(
            Transaction::build(12.3, TransactionKind::Expense, date!(2025 - 10 - 05), "Lunch")
                .category(Some("Food")),
            user.id,
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, 12.3);
                assert_eq!(transaction.kind, TransactionKind::Expense);
                assert_eq!(transaction.category.as_deref(), Some("Food"));
                assert_eq!(transaction.owner_id, user.id);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_blank_category_as_none() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        let transaction = create_transaction(
            Transaction::build(5.0, TransactionKind::Expense, date!(2025 - 10 - 05), "Bus")
                .category(Some("   ")),
            user.id,
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.category, None);
    }

    #[test]
    fn create_stores_uncategorized_category_as_none() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        for category in ["Uncategorized", "uncategorized", " UNCATEGORIZED "] {
            let transaction = create_transaction(
                Transaction::build(5.0, TransactionKind::Expense, date!(2025 - 10 - 05), "Bus")
                    .category(Some(category)),
                user.id,
                &conn,
            )
            .unwrap();

            assert_eq!(transaction.category, None, "category {category:?}");
        }
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        for amount in [0.0, -10.0, f64::NAN] {
            let result = create_transaction(
                Transaction::build(amount, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
                user.id,
                &conn,
            );

            assert!(
                matches!(result, Err(Error::InvalidAmount(_))),
                "want invalid amount error for {amount}, got {result:?}"
            );
        }

        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn create_fails_on_blank_description() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        let result = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "  "),
            user.id,
            &conn,
        );

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    #[test]
    fn create_fails_on_unknown_owner() {
        let conn = get_test_connection();
        let owner_id = UserID::new(42);

        let result = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            owner_id,
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidOwner(owner_id)));
    }

    #[test]
    fn get_fails_for_other_user() {
        let conn = get_test_connection();
        let owner = create_test_user("owner@example.com", &conn);
        let intruder = create_test_user("intruder@example.com", &conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            owner.id,
            &conn,
        )
        .unwrap();

        assert_eq!(
            get_transaction(transaction.id, intruder.id, &conn),
            Err(Error::Forbidden)
        );
        assert_eq!(get_transaction(transaction.id, owner.id, &conn), Ok(transaction));
    }

    #[test]
    fn get_fails_for_unknown_id() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        assert_eq!(get_transaction(1337, user.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn update_succeeds_for_owner() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            user.id,
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            transaction.id,
            Transaction::build(2.5, TransactionKind::Expense, date!(2025 - 10 - 06), "Coffee")
                .category(Some("Food")),
            user.id,
            &conn,
        )
        .unwrap();

        assert_eq!(updated.id, transaction.id);
        assert_eq!(updated.amount, 2.5);
        assert_eq!(updated.kind, TransactionKind::Expense);
        assert_eq!(updated.date, date!(2025 - 10 - 06));
        assert_eq!(updated.description, "Coffee");
        assert_eq!(updated.category.as_deref(), Some("Food"));
        assert_eq!(get_transaction(transaction.id, user.id, &conn), Ok(updated));
    }

    #[test]
    fn update_fails_for_other_user_and_leaves_transaction_unchanged() {
        let conn = get_test_connection();
        let owner = create_test_user("owner@example.com", &conn);
        let intruder = create_test_user("intruder@example.com", &conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            owner.id,
            &conn,
        )
        .unwrap();

        let result = update_transaction(
            transaction.id,
            Transaction::build(999.0, TransactionKind::Income, date!(2025 - 10 - 05), "Mine"),
            intruder.id,
            &conn,
        );

        assert_eq!(result, Err(Error::Forbidden));
        assert_eq!(get_transaction(transaction.id, owner.id, &conn), Ok(transaction));
    }

    #[test]
    fn update_fails_for_unknown_id() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        let result = update_transaction(
            1337,
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            user.id,
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_succeeds_for_owner() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            user.id,
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, user.id, &conn).unwrap();

        assert_eq!(count_transactions(&conn).unwrap(), 0);
        assert_eq!(
            delete_transaction(transaction.id, user.id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_fails_for_other_user() {
        let conn = get_test_connection();
        let owner = create_test_user("owner@example.com", &conn);
        let intruder = create_test_user("intruder@example.com", &conn);
        let transaction = create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            owner.id,
            &conn,
        )
        .unwrap();

        assert_eq!(
            delete_transaction(transaction.id, intruder.id, &conn),
            Err(Error::Forbidden)
        );
        assert_eq!(count_transactions(&conn).unwrap(), 1);
    }

    #[test]
    fn delete_fails_for_unknown_id() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);
        create_transaction(
            Transaction::build(1.0, TransactionKind::Income, date!(2025 - 10 - 05), "Pay"),
            user.id,
            &conn,
        )
        .unwrap();

        assert_eq!(delete_transaction(999, user.id, &conn), Err(Error::NotFound));
        assert_eq!(count_transactions(&conn).unwrap(), 1);
    }

    #[test]
    fn query_returns_only_owner_transactions_most_recent_first() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);
        let other = create_test_user("other@example.com", &conn);
        let dates = [
            date!(2025 - 01 - 10),
            date!(2025 - 03 - 01),
            date!(2025 - 02 - 14),
            date!(2025 - 03 - 01),
        ];
        for (i, date) in dates.into_iter().enumerate() {
            create_transaction(
                Transaction::build(1.0, TransactionKind::Expense, date, &format!("#{i}")),
                user.id,
                &conn,
            )
            .unwrap();
        }
        create_transaction(
            Transaction::build(1.0, TransactionKind::Expense, date!(2025 - 03 - 02), "other"),
            other.id,
            &conn,
        )
        .unwrap();

        let got = query_transactions(user.id, None, &conn).unwrap();

        let got_descriptions: Vec<_> = got.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(got_descriptions, vec!["#3", "#1", "#2", "#0"]);
        assert!(got.iter().all(|t| t.owner_id == user.id));
    }

    #[test]
    fn query_returns_empty_vec_for_user_without_transactions() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);

        let got = query_transactions(user.id, None, &conn).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn query_with_filter_returns_matching_owner_transactions_most_recent_first() {
        let conn = get_test_connection();
        let user = create_test_user("test@example.com", &conn);
        let other = create_test_user("other@example.com", &conn);
        let transactions = [
            (date!(2025 - 01 - 10), TransactionKind::Expense, "January rent"),
            (date!(2025 - 02 - 03), TransactionKind::Expense, "February rent"),
            (date!(2025 - 02 - 20), TransactionKind::Income, "Salary"),
            (date!(2025 - 02 - 25), TransactionKind::Expense, "Groceries"),
            (date!(2025 - 03 - 01), TransactionKind::Expense, "March rent"),
        ];
        for (date, kind, description) in transactions {
            create_transaction(Transaction::build(1.0, kind, date, description), user.id, &conn)
                .unwrap();
        }
        create_transaction(
            Transaction::build(1.0, TransactionKind::Expense, date!(2025 - 02 - 10), "Other"),
            other.id,
            &conn,
        )
        .unwrap();
        let filter = TransactionFilter {
            date_from: Some(date!(2025 - 02 - 01)),
            date_to: Some(date!(2025 - 02 - 28)),
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        };

        let got = query_transactions(user.id, Some(&filter), &conn).unwrap();

        let got_descriptions: Vec<_> = got.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(got_descriptions, vec!["Groceries", "February rent"]);
        assert!(got.iter().all(|t| t.owner_id == user.id));
    }
}
