//! Income and expense totals, overall and per month.

use std::collections::BTreeMap;

use crate::{
    report::calendar::YearMonth,
    transaction::{Transaction, TransactionKind},
};

/// The money earned and spent over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// The sum of the income amounts.
    pub income: f64,
    /// The sum of the expense amounts.
    pub expense: f64,
}

impl Totals {
    /// Sum the income and expenses in `transactions`.
    ///
    /// An empty set of transactions gives zero totals.
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::default();

        for transaction in transactions {
            totals.add(transaction);
        }

        totals
    }

    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Income => self.income += transaction.amount,
            TransactionKind::Expense => self.expense += transaction.amount,
        }
    }

    /// Income minus expenses.
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// The totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlySummary {
    /// The month the totals cover.
    pub month: YearMonth,
    /// Income and expenses in `month`.
    pub totals: Totals,
}

/// Group `transactions` by calendar month, most recent month first.
///
/// Months without transactions are left out.
pub fn monthly_report(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut months: BTreeMap<YearMonth, Totals> = BTreeMap::new();

    for transaction in transactions {
        months
            .entry(YearMonth::of(transaction.date))
            .or_default()
            .add(transaction);
    }

    months
        .into_iter()
        .rev()
        .map(|(month, totals)| MonthlySummary { month, totals })
        .collect()
}
