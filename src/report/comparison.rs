//! Comparing the current month with the one before it.

use time::Date;

use crate::{
    report::{
        Totals,
        calendar::{YearMonth, previous_month},
    },
    transaction::Transaction,
};

/// Income and expenses of the current and previous calendar months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthComparison {
    /// The month `today` falls in.
    pub current_month: YearMonth,
    /// Income and expenses for `current_month`.
    pub current: Totals,
    /// The month before `current_month`.
    pub previous_month: YearMonth,
    /// Income and expenses for `previous_month`.
    pub previous: Totals,
}

impl MonthComparison {
    /// Compare the month `today` falls in against the month before it.
    pub fn new(transactions: &[Transaction], today: Date) -> Self {
        let current_month = YearMonth::of(today);
        let previous_month = previous_month(today);

        let totals_for = |month: YearMonth| {
            Totals::of(
                transactions
                    .iter()
                    .filter(|transaction| month.contains(transaction.date)),
            )
        };

        Self {
            current_month,
            current: totals_for(current_month),
            previous_month,
            previous: totals_for(previous_month),
        }
    }

    /// Current month's income minus the previous month's.
    pub fn income_variance(&self) -> f64 {
        self.current.income - self.previous.income
    }

    /// Current month's expenses minus the previous month's.
    pub fn expense_variance(&self) -> f64 {
        self.current.expense - self.previous.expense
    }
}
