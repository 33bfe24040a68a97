use time::Date;

use crate::{
    auth::UserID,
    transaction::{Transaction, TransactionKind},
};

/// An in-memory transaction owned by user 1, for testing pure functions.
pub(crate) fn transaction(
    id: i64,
    amount: f64,
    kind: TransactionKind,
    category: Option<&str>,
    date: Date,
) -> Transaction {
    Transaction {
        id,
        description: format!("transaction #{id}"),
        amount,
        kind,
        category: category.map(str::to_owned),
        date,
        owner_id: UserID::new(1),
    }
}

pub(crate) fn income(id: i64, amount: f64, date: Date) -> Transaction {
    transaction(id, amount, TransactionKind::Income, None, date)
}

pub(crate) fn expense(id: i64, amount: f64, category: Option<&str>, date: Date) -> Transaction {
    transaction(id, amount, TransactionKind::Expense, category, date)
}
