//! Property-based test generators using proptest.
//!
//! Strategies produce values that pass client-side validation, so
//! property tests exercise the store rather than the validator.

use proptest::prelude::*;
use todosync_model::{TodoDraft, TodoPatch};

/// Strategy for titles that pass validation (3..=100 characters,
/// no leading or trailing whitespace).
pub fn valid_title_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9][a-zA-Z0-9 ]{1,78}[a-zA-Z0-9]")
        .expect("Invalid regex")
}

/// Strategy for descriptions that pass validation (5..=500 characters,
/// no leading or trailing whitespace).
pub fn valid_description_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9][a-zA-Z0-9 ]{3,58}[a-zA-Z0-9]")
        .expect("Invalid regex")
}

/// Strategy for valid create drafts.
pub fn draft_strategy() -> impl Strategy<Value = TodoDraft> {
    (
        valid_title_strategy(),
        prop::option::of(valid_description_strategy()),
        any::<bool>(),
    )
        .prop_map(|(title, description, completed)| {
            let mut draft = TodoDraft::new(title).with_completed(completed);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            draft
        })
}

/// Strategy for valid patches (possibly empty).
pub fn patch_strategy() -> impl Strategy<Value = TodoPatch> {
    (
        prop::option::of(valid_title_strategy()),
        prop::option::of(valid_description_strategy()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(title, description, completed)| {
            let mut patch = TodoPatch::new();
            if let Some(title) = title {
                patch = patch.with_title(title);
            }
            if let Some(description) = description {
                patch = patch.with_description(description);
            }
            if let Some(completed) = completed {
                patch = patch.with_completed(completed);
            }
            patch
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use todosync_model::{validate_draft, validate_patch, ValidationPolicy};

    proptest! {
        #[test]
        fn generated_drafts_pass_validation(draft in draft_strategy()) {
            prop_assert!(validate_draft(&draft, ValidationPolicy::new()).is_ok());
        }

        #[test]
        fn generated_patches_pass_validation(patch in patch_strategy()) {
            prop_assert!(validate_patch(&patch).is_ok());
        }
    }
}
