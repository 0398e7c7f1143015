//! Typed adapter between engine operations and store primitives.
//!
//! `TermGraph` is the only place that knows how terms and classifiables
//! are laid out as nodes and edges. Term nodes carry `raw`/`lower` props;
//! classifiable nodes carry the full record as JSON. Hierarchy structure
//! lives exclusively in `narrower` edges, description membership in
//! `references` edges.

use std::sync::Arc;

use bcc_types::{Classifiable, ConceptString, Term};
use serde_json::json;

use crate::error::StoreError;
use crate::node::{Node, EDGE_NARROWER, EDGE_REFERENCES, LABEL_CLASSIFIABLE, LABEL_TERM};
use crate::store::GraphStore;

/// Thin translation layer over a [`GraphStore`] handle.
///
/// Cheap to clone; the store handle is shared.
pub struct TermGraph<S: GraphStore + ?Sized> {
    store: Arc<S>,
}

impl<S: GraphStore + ?Sized> Clone for TermGraph<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: GraphStore + ?Sized> TermGraph<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn term_node(term: &Term) -> Node {
        Node::new(
            &term.id,
            LABEL_TERM,
            json!({ "raw": term.raw_term, "lower": term.lower }),
        )
    }

    fn term_from_node(node: &Node) -> Result<Term, StoreError> {
        let raw = node
            .props
            .get("raw")
            .and_then(|v| v.as_str())
            .ok_or_else(|| StoreError::InvalidNode {
                key: node.key.clone(),
                reason: "term node without 'raw' property".to_string(),
            })?;
        Ok(Term::new(&node.key, raw))
    }

    fn classifiable_from_node(node: &Node) -> Result<Classifiable, StoreError> {
        serde_json::from_value(node.props.clone()).map_err(|e| StoreError::InvalidNode {
            key: node.key.clone(),
            reason: e.to_string(),
        })
    }

    // ==================== Term operations ====================

    /// Insert or replace a term node. Structure edges are managed separately.
    pub async fn put_term(&self, term: &Term) -> Result<(), StoreError> {
        self.store.put_node(Self::term_node(term)).await
    }

    pub async fn get_term(&self, id: &str) -> Result<Option<Term>, StoreError> {
        match self.store.get_node(id).await? {
            Some(node) if node.label == LABEL_TERM => Ok(Some(Self::term_from_node(&node)?)),
            _ => Ok(None),
        }
    }

    /// Exact-match lookup by case-folded form.
    pub async fn term_by_lower(&self, lower: &str) -> Result<Option<Term>, StoreError> {
        for node in self.store.nodes_with_label(LABEL_TERM).await? {
            let term = Self::term_from_node(&node)?;
            if term.lower == lower {
                return Ok(Some(term));
            }
        }
        Ok(None)
    }

    /// Exact-match lookup by display string.
    pub async fn term_by_raw(&self, raw: &str) -> Result<Option<Term>, StoreError> {
        for node in self.store.nodes_with_label(LABEL_TERM).await? {
            let term = Self::term_from_node(&node)?;
            if term.raw_term == raw {
                return Ok(Some(term));
            }
        }
        Ok(None)
    }

    /// Immediate children, in edge insertion order. Empty if `id` is absent.
    pub async fn children(&self, id: &str) -> Result<Vec<Term>, StoreError> {
        self.store
            .out_neighbors(EDGE_NARROWER, id)
            .await?
            .iter()
            .map(Self::term_from_node)
            .collect()
    }

    /// The unique parent of a term, if it has one.
    pub async fn parent(&self, id: &str) -> Result<Option<Term>, StoreError> {
        let parents = self.store.in_neighbors(EDGE_NARROWER, id).await?;
        match parents.first() {
            Some(node) => Ok(Some(Self::term_from_node(node)?)),
            None => Ok(None),
        }
    }

    pub async fn link_child(&self, parent_id: &str, child_id: &str) -> Result<(), StoreError> {
        self.store.put_edge(EDGE_NARROWER, parent_id, child_id).await
    }

    pub async fn unlink_child(&self, parent_id: &str, child_id: &str) -> Result<bool, StoreError> {
        self.store
            .delete_edge(EDGE_NARROWER, parent_id, child_id)
            .await
    }

    /// Delete a term node together with its incident edges.
    pub async fn delete_term(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_node(id).await
    }

    // ==================== Classifiable operations ====================

    /// Insert or replace a classifiable record.
    pub async fn put_classifiable(&self, item: &Classifiable) -> Result<(), StoreError> {
        let props = serde_json::to_value(item)?;
        self.store
            .put_node(Node::new(&item.id, LABEL_CLASSIFIABLE, props))
            .await
    }

    pub async fn get_classifiable(&self, id: &str) -> Result<Option<Classifiable>, StoreError> {
        match self.store.get_node(id).await? {
            Some(node) if node.label == LABEL_CLASSIFIABLE => {
                Ok(Some(Self::classifiable_from_node(&node)?))
            }
            _ => Ok(None),
        }
    }

    pub async fn delete_classifiable(&self, id: &str) -> Result<bool, StoreError> {
        self.store.delete_node(id).await
    }

    pub async fn all_classifiables(&self) -> Result<Vec<Classifiable>, StoreError> {
        self.store
            .nodes_with_label(LABEL_CLASSIFIABLE)
            .await?
            .iter()
            .map(Self::classifiable_from_node)
            .collect()
    }

    /// Rewrite the description edges of a classifiable to match `desc`.
    ///
    /// The description's terms must already carry canonical vocabulary ids.
    pub async fn set_references(&self, id: &str, desc: &ConceptString) -> Result<(), StoreError> {
        for node in self.store.out_neighbors(EDGE_REFERENCES, id).await? {
            self.store.delete_edge(EDGE_REFERENCES, id, &node.key).await?;
        }
        for term in &desc.terms {
            self.store.put_edge(EDGE_REFERENCES, id, &term.id).await?;
        }
        Ok(())
    }

    /// Classifiables whose stored description references the given term.
    pub async fn classifiables_referencing(
        &self,
        term_id: &str,
    ) -> Result<Vec<Classifiable>, StoreError> {
        self.store
            .in_neighbors(EDGE_REFERENCES, term_id)
            .await?
            .iter()
            .map(Self::classifiable_from_node)
            .collect()
    }
}
