//! Alert messages for displaying success, warning and error messages to users.

use maud::{Markup, html};

/// An alert message to show at the top of a page or form.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Success { message: String, details: String },
    Warning { message: String, details: String },
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (container_style, role, message, details) = match self {
            Alert::Success { message, details } => (
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
                "status",
                message,
                details,
            ),
            Alert::Warning { message, details } => (
                "p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 \
                dark:bg-gray-800 dark:text-yellow-300",
                "status",
                message,
                details,
            ),
            Alert::Error { message, details } => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                "alert",
                message,
                details,
            ),
        };

        // Adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div class=(container_style) role=(role) data-alert
            {
                span class="font-medium" { (message) }

                @if !details.is_empty() {
                    " " (details)
                }
            }
        }
    }
}
