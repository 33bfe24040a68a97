//! Calendar month arithmetic used by the reports.

use std::{cmp::Ordering, fmt::Display};

use time::{Date, Duration, Month};

/// A calendar month in a specific year, e.g. 2024-01.
///
/// Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create a year-month from its parts.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The year-month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year, e.g. 2024.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the year.
    pub fn month(&self) -> Month {
        self.month
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month immediately before this one.
    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then((self.month as u8).cmp(&(other.month as u8)))
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month as u8)
    }
}

/// The first day of the month that `date` falls in.
pub fn first_day_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The month before the one `today` falls in, i.e. the month containing the
/// day before the first of the current month.
pub fn previous_month(today: Date) -> YearMonth {
    match first_day_of_month(today).previous_day() {
        Some(last_day_of_previous_month) => YearMonth::of(last_day_of_previous_month),
        None => YearMonth::of(today).previous(),
    }
}

/// The number of days in the month that `date` falls in.
///
/// Computed as "day zero" of the next month: the day before the first of the
/// following month.
pub fn days_in_month(date: Date) -> u8 {
    // 31 days after the first of any month always lands in the next month.
    first_day_of_month(date)
        .checked_add(Duration::days(31))
        .map(first_day_of_month)
        .and_then(Date::previous_day)
        // Only December of the last representable year has no next month.
        .map_or(31, |last_day| last_day.day())
}
