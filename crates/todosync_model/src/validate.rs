//! Client-side validation of drafts and patches.
//!
//! Validation runs before any network call is made: a violation fails
//! fast and the transport is never touched.

use crate::item::{TodoDraft, TodoPatch};
use thiserror::Error;

/// Minimum title length in characters (after trimming).
pub const TITLE_MIN: usize = 3;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 100;
/// Minimum description length in characters, when one is given.
pub const DESCRIPTION_MIN: usize = 5;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 500;

/// A client-side precondition failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title is empty or whitespace-only.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The title is outside the allowed length bounds.
    #[error("title must be 3 to 100 characters, got {length}")]
    TitleLength {
        /// Trimmed length of the rejected title.
        length: usize,
    },

    /// The description is outside the allowed length bounds.
    #[error("description must be 5 to 500 characters, got {length}")]
    DescriptionLength {
        /// Trimmed length of the rejected description.
        length: usize,
    },

    /// The policy requires a due date and none was given.
    #[error("a due date is required")]
    MissingDueDate,
}

/// Which optional constraints apply.
///
/// Deployments disagree on whether a due date is mandatory, so it is
/// configuration rather than a fixed rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Require a due date on every draft.
    pub require_due_date: bool,
}

impl ValidationPolicy {
    /// Creates the default policy (due date optional).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            require_due_date: false,
        }
    }

    /// Sets whether a due date is required.
    #[must_use]
    pub const fn with_required_due_date(mut self, required: bool) -> Self {
        self.require_due_date = required;
        self
    }
}

/// Validates a create payload.
pub fn validate_draft(draft: &TodoDraft, policy: ValidationPolicy) -> Result<(), ValidationError> {
    validate_title(&draft.title)?;
    if let Some(description) = &draft.description {
        validate_description(description)?;
    }
    if policy.require_due_date && draft.due_date.is_none() {
        return Err(ValidationError::MissingDueDate);
    }
    Ok(())
}

/// Validates the fields a patch carries. Absent fields are not checked.
pub fn validate_patch(patch: &TodoPatch) -> Result<(), ValidationError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description)?;
    }
    Ok(())
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let length = trimmed.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&length) {
        return Err(ValidationError::TitleLength { length });
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let length = description.trim().chars().count();
    // An empty description is treated as absent, matching the entry forms.
    if length == 0 {
        return Ok(());
    }
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&length) {
        return Err(ValidationError::DescriptionLength { length });
    }
    Ok(())
}
