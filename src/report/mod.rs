//! The aggregation and reporting engine behind the dashboard.
//!
//! Every function here is pure: it works on the transactions it is given and
//! takes the current date as a parameter instead of reading the clock.

mod calendar;
mod categories;
mod comparison;
mod forecast;
mod totals;

pub use calendar::{YearMonth, days_in_month, first_day_of_month, previous_month};
pub use categories::{
    CategoryTotal, TOP_CATEGORY_COUNT, UNCATEGORIZED_LABEL, distinct_categories, top_categories,
};
pub use comparison::MonthComparison;
pub use forecast::{GoalProgress, SpendForecast, TRAILING_WINDOW_DAYS, project_month_total};
pub use totals::{MonthlySummary, Totals, monthly_report};

use time::Date;

use crate::transaction::{Transaction, TransactionFilter};

/// Which of the two mutually exclusive views the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// The user picked a date range, so only the filtered transactions are reported.
    DateRange {
        /// The earliest date shown, inclusive.
        from: Option<Date>,
        /// The latest date shown, inclusive.
        to: Option<Date>,
    },
    /// No date range, so the full history is summarised month by month.
    MonthlySummary,
}

impl ReportMode {
    /// `DateRange` if `filter` has at least one date bound.
    pub fn from_filter(filter: &TransactionFilter) -> Self {
        if filter.has_date_range() {
            ReportMode::DateRange {
                from: filter.date_from,
                to: filter.date_to,
            }
        } else {
            ReportMode::MonthlySummary
        }
    }
}

/// Everything the dashboard displays.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    /// Whether a date range was selected.
    pub mode: ReportMode,
    /// The transactions that passed the filter, most recent first.
    pub transactions: Vec<Transaction>,
    /// Totals over the filtered transactions.
    pub totals: Totals,
    /// Per-month totals over the full history, empty in `DateRange` mode.
    pub monthly: Vec<MonthlySummary>,
    /// The biggest expense categories this month.
    pub top_categories: Vec<CategoryTotal>,
    /// This month against last month.
    pub comparison: MonthComparison,
    /// This month's projected spending.
    pub forecast: SpendForecast,
    /// Present only if the user has set a monthly goal.
    pub goal: Option<GoalProgress>,
    /// Every category the user has used, for the filter drop-down.
    pub categories: Vec<String>,
}

impl DashboardReport {
    /// Build the report from all of a user's transactions.
    ///
    /// `all` must be the user's full history in date-descending order. The
    /// current-month views always use the full history, the totals and
    /// transaction list use the transactions that match `filter`.
    pub fn build(
        all: Vec<Transaction>,
        filter: &TransactionFilter,
        mode: ReportMode,
        today: Date,
        monthly_goal: Option<f64>,
    ) -> Self {
        let monthly = match mode {
            ReportMode::MonthlySummary => monthly_report(&all),
            ReportMode::DateRange { .. } => Vec::new(),
        };
        let top_categories = top_categories(&all, today);
        let comparison = MonthComparison::new(&all, today);
        let forecast = SpendForecast::new(&all, today);
        let goal = monthly_goal.map(|goal| GoalProgress::new(goal, &forecast));
        let categories = distinct_categories(&all);

        let transactions = filter.apply(all);
        let totals = Totals::of(&transactions);

        Self {
            mode,
            transactions,
            totals,
            monthly,
            top_categories,
            comparison,
            forecast,
            goal,
            categories,
        }
    }
}
