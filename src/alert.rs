//! Alerts for reporting failed htmx requests to the user.
//!
//! Alerts are sent as htmx fragments and swapped into the `#alert-container`
//! element that [crate::html::base] places on every page, usually through
//! `hx-target-error`.

use maud::{Markup, html};

const ERROR_ALERT_STYLE: &str = "flex items-start gap-3 p-4 mb-4 rounded-lg border \
    text-red-800 border-red-300 bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// A dismissable error message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    Error { message: String, details: String },
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, details),
            Alert::ErrorSimple { message } => (message, String::new()),
        };

        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div role="alert" class=(ERROR_ALERT_STYLE)
            {
                div class="flex-1"
                {
                    span class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1 text-sm" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    class="ms-auto bg-transparent font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
