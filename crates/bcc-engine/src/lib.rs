//! # bcc-engine
//!
//! The taxonomy and classification retrieval core:
//!
//! - [`TermHierarchy`]: the single-rooted term graph: bounded-depth reads,
//!   safe mutation (insert/move/rename), pre-delete impact analysis, and
//!   cascading force-delete
//! - [`match_by_description`]: ranks classifiables by term overlap with a
//!   query description (pure computation, no store access)
//! - [`ClassifiableCatalog`]: classifiable create/update/delete with
//!   identity and ownership invariants, plus the recently-classified and
//!   all-unclassified feeds
//! - [`Authorizer`]: the capability deciding who may edit a classifiable
//!
//! The engine is stateless between calls; all durable state lives behind
//! the [`bcc_graph::GraphStore`] handle passed in at construction.

pub mod authorize;
pub mod feeds;
pub mod hierarchy;
pub mod matcher;

pub use authorize::{AllowAll, Authorizer, OwnerOrSameGlam};
pub use feeds::ClassifiableCatalog;
pub use hierarchy::{DeleteImpact, EdgeChange, TermHierarchy};
pub use matcher::match_by_description;
