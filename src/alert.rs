//! Alert system for displaying success and error messages to users.
//!
//! The dashboard queues an [Alert] whenever a backend operation finishes in
//! a way the user should know about, e.g. a save that failed.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    /// The operation went through.
    Success,
    /// The operation failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// How the alert is styled.
    pub alert_type: AlertType,
    /// A short summary.
    pub message: String,
    /// Further details, may be empty.
    pub details: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Success,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new error alert
    pub fn error(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            alert_type: AlertType::Error,
            message: message.into(),
            details: details.into(),
        }
    }

    /// Create a new error alert without details
    pub fn error_simple(message: impl Into<String>) -> Self {
        Self::error(message, "")
    }

    /// Render the alert as a dismissable banner.
    pub fn view(&self) -> Markup {
        let (container_style, label) = match self.alert_type {
            AlertType::Success => (
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
                "success",
            ),
            AlertType::Error => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                "error",
            ),
        };

        html! {
            div class=(container_style) role="alert" data-alert=(label)
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p class="mt-1" { (self.details) }
                }
            }
        }
    }
}
