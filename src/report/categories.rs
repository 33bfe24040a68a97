//! Ranking spending by category.

use std::collections::HashMap;

use time::Date;

use crate::{
    report::calendar::YearMonth,
    transaction::{Transaction, TransactionKind},
};

/// How many categories the current month's ranking shows.
pub const TOP_CATEGORY_COUNT: usize = 5;

/// The label shown for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// `None` groups the uncategorized transactions.
    pub category: Option<String>,
    /// The sum of the expense amounts.
    pub total: f64,
}

impl CategoryTotal {
    /// The category name, or "Uncategorized".
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL)
    }
}

/// The categories with the most spending in the month `today` falls in.
///
/// At most [TOP_CATEGORY_COUNT] categories are returned, largest total
/// first. Categories with equal totals keep the order they were first seen
/// in `transactions`.
pub fn top_categories(transactions: &[Transaction], today: Date) -> Vec<CategoryTotal> {
    let current_month = YearMonth::of(today);
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<Option<&str>, usize> = HashMap::new();

    let expenses = transactions.iter().filter(|transaction| {
        transaction.kind == TransactionKind::Expense && current_month.contains(transaction.date)
    });

    for transaction in expenses {
        let key = transaction.category_name();

        match positions.get(&key) {
            Some(&position) => totals[position].total += transaction.amount,
            None => {
                positions.insert(key, totals.len());
                totals.push(CategoryTotal {
                    category: key.map(str::to_owned),
                    total: transaction.amount,
                });
            }
        }
    }

    // `sort_by` is stable, so ties stay in first-seen order.
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(TOP_CATEGORY_COUNT);

    totals
}

/// The distinct category names in `transactions`, in the order they first appear.
pub fn distinct_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();

    for category in transactions.iter().filter_map(Transaction::category_name) {
        if !categories.iter().any(|seen| seen == category) {
            categories.push(category.to_owned());
        }
    }

    categories
}
