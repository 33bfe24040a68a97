//! Projecting the current month's spending and tracking it against a goal.

use time::{Date, Duration};

use crate::{
    report::calendar::{YearMonth, days_in_month},
    transaction::{Transaction, TransactionKind},
};

/// How far back the average expense looks, rounded down to the start of that month.
pub const TRAILING_WINDOW_DAYS: i64 = 90;

/// A linear projection of this month's spending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendForecast {
    /// The mean amount of the expenses in the trailing window.
    pub average_expense: f64,
    /// The amount spent so far in the current month.
    pub month_to_date_expense: f64,
    /// The expected amount spent by the end of the current month.
    pub projected_total: f64,
}

impl SpendForecast {
    /// Project the spending for the month `today` falls in.
    ///
    /// The trailing window includes every expense dated in or after the month
    /// that contains `today - TRAILING_WINDOW_DAYS`.
    pub fn new(transactions: &[Transaction], today: Date) -> Self {
        let current_month = YearMonth::of(today);
        let window_start = YearMonth::of(
            today
                .checked_sub(Duration::days(TRAILING_WINDOW_DAYS))
                .unwrap_or(Date::MIN),
        );

        let mut window_total = 0.0;
        let mut window_count = 0_u32;
        let mut month_to_date_expense = 0.0;

        let expenses = transactions
            .iter()
            .filter(|transaction| transaction.kind == TransactionKind::Expense);

        for expense in expenses {
            let month = YearMonth::of(expense.date);

            if month >= window_start {
                window_total += expense.amount;
                window_count += 1;
            }

            if month == current_month {
                month_to_date_expense += expense.amount;
            }
        }

        let average_expense = if window_count == 0 {
            0.0
        } else {
            window_total / f64::from(window_count)
        };

        Self {
            average_expense,
            month_to_date_expense,
            projected_total: project_month_total(
                month_to_date_expense,
                today.day(),
                days_in_month(today),
            ),
        }
    }
}

/// Scale the spending so far to a whole month.
///
/// Returns zero when no days have elapsed.
pub fn project_month_total(month_to_date_expense: f64, days_elapsed: u8, days_in_month: u8) -> f64 {
    if days_elapsed == 0 {
        return 0.0;
    }

    month_to_date_expense / f64::from(days_elapsed) * f64::from(days_in_month)
}

/// How the current month's spending compares to the user's monthly goal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// The most the user wants to spend in a month.
    pub goal: f64,
    /// The expenses so far this month.
    pub month_to_date_expense: f64,
    /// The projected expenses for the whole month.
    pub forecast: f64,
}

impl GoalProgress {
    /// Compare `goal` against this month's spending and `forecast`.
    pub fn new(goal: f64, forecast: &SpendForecast) -> Self {
        Self {
            goal,
            month_to_date_expense: forecast.month_to_date_expense,
            forecast: forecast.projected_total,
        }
    }

    /// The amount left to spend this month, negative once the goal is exceeded.
    pub fn remaining(&self) -> f64 {
        self.goal - self.month_to_date_expense
    }

    /// Whether spending at the current rate would exceed the goal.
    pub fn is_forecast_over_goal(&self) -> bool {
        self.forecast > self.goal
    }
}

#[cfg(test)]
mod forecast_tests {
    use time::macros::date;

    use crate::{
        report::{GoalProgress, SpendForecast, project_month_total},
        test_utils::{expense, income},
    };

    #[test]
    fn zero_elapsed_days_gives_zero_forecast() {
        assert_eq!(project_month_total(120.0, 0, 30), 0.0);
        assert_eq!(project_month_total(0.0, 0, 31), 0.0);
    }

    #[test]
    fn projects_linearly_over_month_length() {
        assert_eq!(project_month_total(100.0, 10, 30), 300.0);
        assert_eq!(project_month_total(29.0, 29, 29), 29.0);
    }

    #[test]
    fn forecast_uses_actual_month_length() {
        // 2024 is a leap year: 58 spent over 2 of 29 days.
        let today = date!(2024 - 02 - 02);
        let transactions = [expense(1, 58.0, None, date!(2024 - 02 - 01))];

        let forecast = SpendForecast::new(&transactions, today);

        assert_eq!(forecast.month_to_date_expense, 58.0);
        assert_eq!(forecast.projected_total, 841.0);
    }

    #[test]
    fn average_uses_trailing_window_by_month() {
        // 90 days before 2024-05-15 is 2024-02-15, so the window starts on 2024-02-01.
        let today = date!(2024 - 05 - 15);
        let transactions = [
            expense(5, 30.0, None, date!(2024 - 05 - 10)),
            income(4, 1000.0, date!(2024 - 04 - 01)),
            expense(3, 10.0, None, date!(2024 - 02 - 01)),
            expense(2, 500.0, None, date!(2024 - 01 - 31)),
        ];

        let forecast = SpendForecast::new(&transactions, today);

        assert_eq!(forecast.average_expense, 20.0);
        assert_eq!(forecast.month_to_date_expense, 30.0);
        assert_eq!(forecast.projected_total, 30.0 / 15.0 * 31.0);
    }

    #[test]
    fn no_expenses_gives_zero_forecast() {
        let forecast = SpendForecast::new(&[], date!(2024 - 05 - 15));

        assert_eq!(forecast.average_expense, 0.0);
        assert_eq!(forecast.month_to_date_expense, 0.0);
        assert_eq!(forecast.projected_total, 0.0);
    }

    #[test]
    fn goal_progress_reports_remaining_and_overrun() {
        let today = date!(2024 - 04 - 10);
        let transactions = [expense(1, 150.0, None, date!(2024 - 04 - 05))];
        let forecast = SpendForecast::new(&transactions, today);

        let progress = GoalProgress::new(400.0, &forecast);

        assert_eq!(progress.remaining(), 250.0);
        // 150 / 10 * 30 = 450
        assert_eq!(progress.forecast, 450.0);
        assert!(progress.is_forecast_over_goal());

        let generous = GoalProgress::new(1000.0, &forecast);
        assert!(!generous.is_forecast_over_goal());
    }
}
