//! Alert messages for errors that happen outside of a form.
//!
//! Alerts are rendered into the `#alert-container` element of the base page,
//! usually as the target of a failed htmx request.

use maud::{Markup, html};

/// An error message with a short summary and optional details.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The summary of the alert.
    pub message: String,
    /// Further information, may be empty.
    pub details: String,
}

impl Alert {
    /// Create an alert from its summary and details.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    pub fn into_html(self) -> Markup {
        html! {
            div
                class="flex items-start p-4 mb-4 text-sm border rounded-lg text-red-800
                    border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400
                    dark:border-red-800"
                role="alert"
            {
                div class="flex-1"
                {
                    span class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-3 font-bold"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }
}
