//! # todosync Model
//!
//! Todo entity, wire DTOs, and client-side validation for todosync.
//!
//! This crate provides:
//! - [`Todo`] — the item as known to the server
//! - [`TodoDraft`] — the create payload (never carries an id)
//! - [`TodoPatch`] — the partial-update payload (only present fields
//!   reach the wire, so the server merges rather than overwrites)
//! - Validation of drafts and patches under a [`ValidationPolicy`]
//!
//! This is a pure data crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod item;
mod validate;
mod wire;

pub use item::{Todo, TodoDraft, TodoPatch};
pub use validate::{
    validate_draft, validate_patch, ValidationError, ValidationPolicy, DESCRIPTION_MAX,
    DESCRIPTION_MIN, TITLE_MAX, TITLE_MIN,
};
