//! Dashboard module
//!
//! Provides an overview page with the user's totals, this month's spending
//! and forecast, and the list of transactions narrowed down by filters.

mod cards;
mod filter_form;
mod handlers;
mod tables;

pub use handlers::{DashboardState, get_dashboard_page};
