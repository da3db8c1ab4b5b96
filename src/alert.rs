//! Alert fragments for displaying error messages to users.
//!
//! Alerts are rendered as out-of-band swaps into the `#alert-container`
//! element that the base page template provides, so an endpoint can return an
//! alert alongside (or instead of) its normal fragment.

use maud::{Markup, html};

/// A dismissible alert reporting that an operation failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// A one-line summary of what went wrong.
    message: String,
    /// Extra context shown below the message, e.g. how to fix the problem.
    details: String,
}

impl Alert {
    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an out-of-band swap targeting the alert container.
    pub fn into_html(self) -> Markup {
        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    class="flex items-start p-4 mb-4 rounded-lg shadow-lg text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400"
                    role="alert"
                {
                    span class="text-lg font-bold me-3" { "✗" }

                    div class="flex-1 text-sm"
                    {
                        p class="font-medium" { (self.message) }

                        @if !self.details.is_empty() {
                            p class="mt-1" { (self.details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-3 -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8 hover:bg-gray-200 dark:hover:bg-gray-700"
                        aria-label="Close"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        }
    }
}
