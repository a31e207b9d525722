//! Configuration for the store.

use std::time::Duration;
use todosync_model::ValidationPolicy;

/// Configuration for a [`crate::TodoStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the collection endpoint
    /// (e.g. "https://api.example.com/api/v1/todos").
    pub base_url: String,
    /// Request timeout handed to the HTTP client. The store itself does
    /// not enforce timeouts; it passes this through to the transport.
    pub timeout: Duration,
    /// Client-side validation policy for drafts.
    pub validation: ValidationPolicy,
}

impl StoreConfig {
    /// Creates a configuration for the given collection endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            validation: ValidationPolicy::new(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the validation policy.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    /// Sets whether drafts must carry a due date.
    #[must_use]
    pub fn with_required_due_date(mut self, required: bool) -> Self {
        self.validation = self.validation.with_required_due_date(required);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("")
    }
}
