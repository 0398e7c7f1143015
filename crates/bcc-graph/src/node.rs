//! Property-graph node representation and the label namespace.
//!
//! The engine stores two kinds of nodes and two kinds of typed edges:
//! term nodes linked parent-to-child by `narrower` edges, and classifiable
//! nodes linked to their description terms by `references` edges.

use serde::{Deserialize, Serialize};

/// Label of vocabulary term nodes.
pub const LABEL_TERM: &str = "term";

/// Label of classifiable item nodes.
pub const LABEL_CLASSIFIABLE: &str = "classifiable";

/// Edge from a parent term to a child term.
pub const EDGE_NARROWER: &str = "narrower";

/// Edge from a classifiable to a term its description references.
pub const EDGE_REFERENCES: &str = "references";

/// A node in the external graph store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Store-wide unique key
    pub key: String,

    /// Node kind (see the label constants)
    pub label: String,

    /// JSON property payload
    pub props: serde_json::Value,
}

impl Node {
    pub fn new(key: impl Into<String>, label: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            props,
        }
    }
}
