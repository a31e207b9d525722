//! # todosync Testkit
//!
//! Test utilities for todosync.
//!
//! This crate provides:
//! - An in-memory REST backend implementing the transport trait
//! - Fixtures for drafts and sample items
//! - Property-based generators using proptest
//! - Tracing initialization for tests

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod server;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::server::*;
}

pub use fixtures::*;
pub use server::*;
