//! The todo entity and its wire DTOs.

use crate::wire;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single todo item as known to the server.
///
/// Identity is the server-assigned `id`; cache replacement matches on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned identifier. Absent until creation succeeds.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short human-readable summary.
    pub title: String,
    /// Optional longer free-form text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the item is done.
    #[serde(default)]
    pub completed: bool,
    /// Optional due date. The wire value may be a date or a datetime;
    /// datetimes are truncated to their date part.
    #[serde(
        rename = "dueDate",
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::opt_date"
    )]
    pub due_date: Option<NaiveDate>,
}

impl Todo {
    /// Returns true if this item carries the given server id.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

/// Payload for creating a new todo. Never carries an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDraft {
    /// Short human-readable summary.
    pub title: String,
    /// Optional longer free-form text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the item starts out done. Defaults to false.
    #[serde(default)]
    pub completed: bool,
    /// Optional due date.
    #[serde(
        rename = "dueDate",
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::opt_date"
    )]
    pub due_date: Option<NaiveDate>,
}

impl TodoDraft {
    /// Creates a draft with the given title and all other fields unset.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            completed: false,
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Marks the draft as already completed.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Partial-update payload.
///
/// Only present fields are serialized, so the server merges the patch
/// into the stored item rather than overwriting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// New title, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New completion state, if changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// New due date, if changed.
    #[serde(
        rename = "dueDate",
        default,
        skip_serializing_if = "Option::is_none",
        with = "wire::opt_date"
    )]
    pub due_date: Option<NaiveDate>,
}

impl TodoPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the completion state.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns true if the patch names no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
    }

    /// Merges the patch into an item, leaving unnamed fields untouched.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = Some(description.clone());
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = Some(due_date);
        }
    }
}
