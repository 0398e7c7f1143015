//! # bcc-types
//!
//! Shared domain types for the taxonomy and classification engine.
//!
//! This crate defines the core data structures used throughout the system:
//! - Terms: nodes in the shared vocabulary hierarchy
//! - Concept strings: ordered term sequences describing a classifiable
//! - Classifiables: taggable collection items with ownership and visibility
//! - Accounts: GLAM organizations and classifier users (external collaborators)
//!
//! ## Usage
//!
//! ```rust
//! use bcc_types::{ConceptString, Term};
//!
//! let desc = ConceptString::new(vec![Term::from_raw("blade"), Term::from_raw("of")]);
//! assert_eq!(desc.to_string(), "(blade)(of)");
//! ```

pub mod account;
pub mod classifiable;
pub mod concept;
pub mod config;
pub mod error;
pub mod term;

pub use account::{Classifier, Glam};
pub use classifiable::{Classifiable, Permission, Status};
pub use concept::ConceptString;
pub use config::Settings;
pub use error::BccError;
pub use term::{Term, ROOT_TERM_ID, ROOT_TERM_RAW};
