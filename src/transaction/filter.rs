//! Narrows a set of transactions by date range, kind, category and a text search.
//!
//! Filtering never fails: values that cannot be parsed are dropped with a
//! [FilterWarning] for the user and the remaining filters still apply.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::transaction::{Transaction, TransactionKind};

/// The value used in forms and query strings to disable a filter.
pub const ALL_SENTINEL: &str = "all";

/// The value used in forms and query strings to select transactions without a category.
pub const UNCATEGORIZED_SENTINEL: &str = "uncategorized";

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Which category a transaction must have to pass the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryFilter {
    /// Only transactions without a category.
    Uncategorized,
    /// Only transactions whose category matches the name, ignoring case.
    Named(String),
}

impl CategoryFilter {
    fn matches(&self, category: Option<&str>) -> bool {
        match (self, category) {
            (CategoryFilter::Uncategorized, None) => true,
            (CategoryFilter::Named(name), Some(category)) => {
                category.to_lowercase() == name.to_lowercase()
            }
            _ => false,
        }
    }
}

/// The predicates to apply to a set of transactions. `None` disables that
/// predicate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Earliest date to include, inclusive.
    pub date_from: Option<Date>,
    /// Latest date to include, inclusive.
    pub date_to: Option<Date>,
    /// Only income or only expenses.
    pub kind: Option<TransactionKind>,
    /// The category the transaction must have.
    pub category: Option<CategoryFilter>,
    /// Text that must appear in the description, ignoring case.
    pub search_text: Option<String>,
}

impl TransactionFilter {
    /// Whether `transaction` satisfies every active predicate.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if self.date_from.is_some_and(|from| transaction.date < from) {
            return false;
        }

        if self.date_to.is_some_and(|to| transaction.date > to) {
            return false;
        }

        if self.kind.is_some_and(|kind| transaction.kind != kind) {
            return false;
        }

        if let Some(category) = &self.category
            && !category.matches(transaction.category_name())
        {
            return false;
        }

        if let Some(search_text) = &self.search_text
            && !transaction
                .description
                .to_lowercase()
                .contains(&search_text.to_lowercase())
        {
            return false;
        }

        true
    }

    /// Keep the transactions that match the filter, preserving their order.
    pub fn apply(&self, transactions: Vec<Transaction>) -> Vec<Transaction> {
        transactions
            .into_iter()
            .filter(|transaction| self.matches(transaction))
            .collect()
    }

    /// Whether a date bound is set.
    pub fn has_date_range(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }
}

/// The raw filter values from the dashboard query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    /// Start date in the format YYYY-MM-DD.
    pub date_from: Option<String>,
    /// End date in the format YYYY-MM-DD.
    pub date_to: Option<String>,
    /// "income", "expense" or "all".
    pub kind: Option<String>,
    /// A category name, "uncategorized" or "all".
    pub category: Option<String>,
    /// Text to look for in the description.
    pub search: Option<String>,
}

/// A filter value that was ignored because it was invalid.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterWarning {
    /// A date bound was not in the YYYY-MM-DD format.
    #[error("\"{value}\" is not a valid {field} date, use the format YYYY-MM-DD. The date was ignored.")]
    InvalidDate { field: &'static str, value: String },

    /// The transaction type was neither income, expense nor all.
    #[error("\"{0}\" is not a transaction type. Showing all types.")]
    InvalidKind(String),

    /// The start date is after the end date.
    #[error("The start date {from} is after the end date {to}, so no transactions can match.")]
    InvertedRange { from: Date, to: Date },
}

/// Parse a date in the format YYYY-MM-DD.
pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// Format a date as YYYY-MM-DD for use in form inputs.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|value| !value.is_empty())
}

fn parse_date_bound(
    raw: &Option<String>,
    field: &'static str,
    warnings: &mut Vec<FilterWarning>,
) -> Option<Date> {
    let raw = non_empty(raw)?;

    match parse_date(raw) {
        Some(date) => Some(date),
        None => {
            tracing::warn!("Ignoring invalid {field} date filter {raw:?}");
            warnings.push(FilterWarning::InvalidDate {
                field,
                value: raw.to_owned(),
            });
            None
        }
    }
}

/// Turn the raw query values into a [TransactionFilter].
///
/// Invalid values disable their filter and produce a warning to show to the
/// user. Blank values and the "all" sentinel disable their filter silently.
pub fn parse_filter(query: &FilterQuery) -> (TransactionFilter, Vec<FilterWarning>) {
    let mut warnings = Vec::new();

    let date_from = parse_date_bound(&query.date_from, "start", &mut warnings);
    let date_to = parse_date_bound(&query.date_to, "end", &mut warnings);

    if let (Some(from), Some(to)) = (date_from, date_to)
        && from > to
    {
        warnings.push(FilterWarning::InvertedRange { from, to });
    }

    let kind = match non_empty(&query.kind) {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => None,
        Some(raw) => {
            let kind = TransactionKind::parse(raw);
            if kind.is_none() {
                warnings.push(FilterWarning::InvalidKind(raw.to_owned()));
            }
            kind
        }
    };

    let category = match non_empty(&query.category) {
        None => None,
        Some(raw) if raw.eq_ignore_ascii_case(ALL_SENTINEL) => None,
        Some(raw) if raw.eq_ignore_ascii_case(UNCATEGORIZED_SENTINEL) => {
            Some(CategoryFilter::Uncategorized)
        }
        Some(raw) => Some(CategoryFilter::Named(raw.to_owned())),
    };

    let search_text = non_empty(&query.search).map(str::to_owned);

    let filter = TransactionFilter {
        date_from,
        date_to,
        kind,
        category,
        search_text,
    };

    (filter, warnings)
}
