//! # todosync Client
//!
//! Client-side cache synchronization over a remote REST todo collection.
//!
//! This crate provides:
//! - [`TodoStore`] — single point of truth for the collection's
//!   client-visible state (snapshot, busy flag, subscription feeds)
//! - [`RestTransport`] abstraction with HTTP and mock implementations
//! - Normalized [`ClientError`] taxonomy
//!
//! ## Architecture
//!
//! Consumers call the store's operations and render whatever it
//! publishes on its two feeds; they never talk to the network directly.
//! The store calls into a [`RestTransport`], which performs the HTTP
//! verbs and normalizes every failure before it surfaces.
//!
//! ## Key invariants
//!
//! - The snapshot published after a successful mutation is either a
//!   full fresh fetch or the prior snapshot with exactly one element
//!   inserted, replaced, or removed at the position matching the
//!   mutated item's id.
//! - A failed operation never partially mutates the snapshot.
//! - Every subscriber sees the same sequence of snapshots.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod feed;
mod http;
mod store;
mod transport;

pub use config::StoreConfig;
pub use error::{ClientError, ClientResult};
pub use feed::Feed;
pub use http::{HttpClient, HttpResponse, HttpTransport, ReqwestClient, Verb};
pub use store::TodoStore;
pub use transport::{MockTransport, RestTransport};
