//! # bcc-graph
//!
//! External-collaborator contracts for the taxonomy engine, plus the thin
//! typed adapter the engine talks through:
//!
//! - [`GraphStore`]: the abstract node/edge primitives the persistent
//!   graph store must supply
//! - [`MemoryGraphStore`]: in-memory reference implementation, used as the
//!   test double and the default in-process backend
//! - [`TermGraph`]: translates term and classifiable operations onto the
//!   store primitives
//! - [`AccountDirectory`] / [`NotificationMailbox`]: account and mailbox
//!   collaborator contracts, with [`MemoryDirectory`] as reference impl

pub mod accounts;
pub mod adapter;
pub mod error;
pub mod node;
pub mod store;

pub use accounts::{AccountDirectory, MemoryDirectory, NotificationMailbox};
pub use adapter::TermGraph;
pub use error::StoreError;
pub use node::{Node, EDGE_NARROWER, EDGE_REFERENCES, LABEL_CLASSIFIABLE, LABEL_TERM};
pub use store::{GraphStore, MemoryGraphStore};
