//! The graph store contract and its in-memory reference implementation.
//!
//! The contract mirrors what the external persistent graph store supplies:
//! node create/read/delete, typed edges, adjacency reads, and a label scan
//! standing in for pattern-match queries. Each method is one logically
//! atomic unit against the store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::node::Node;

/// Abstract contract of the external graph store.
///
/// Absence is a value on every read path: fetching a missing node yields
/// `Ok(None)`, adjacency of a missing node yields an empty list. Neighbor
/// lists preserve edge insertion order.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Insert or replace a node by key.
    async fn put_node(&self, node: Node) -> Result<(), StoreError>;

    /// Fetch a node by key.
    async fn get_node(&self, key: &str) -> Result<Option<Node>, StoreError>;

    /// Delete a node and every edge incident to it.
    /// Returns whether the node existed.
    async fn delete_node(&self, key: &str) -> Result<bool, StoreError>;

    /// Create a typed edge. Inserting an edge that already exists is a no-op.
    async fn put_edge(&self, label: &str, from: &str, to: &str) -> Result<(), StoreError>;

    /// Delete a typed edge. Returns whether the edge existed.
    async fn delete_edge(&self, label: &str, from: &str, to: &str) -> Result<bool, StoreError>;

    /// Nodes reachable over one outgoing edge with the given label.
    async fn out_neighbors(&self, label: &str, from: &str) -> Result<Vec<Node>, StoreError>;

    /// Nodes with an edge of the given label pointing at `to`.
    async fn in_neighbors(&self, label: &str, to: &str) -> Result<Vec<Node>, StoreError>;

    /// All nodes carrying a label (the pattern-match primitive).
    async fn nodes_with_label(&self, label: &str) -> Result<Vec<Node>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edge {
    label: String,
    from: String,
    to: String,
}

#[derive(Default)]
struct GraphInner {
    nodes: HashMap<String, Node>,
    /// Insertion-ordered; adjacency reads depend on that order
    edges: Vec<Edge>,
}

/// In-memory reference implementation of [`GraphStore`].
///
/// Interior mutability through a single `RwLock`, so every method is one
/// atomic unit and concurrent reads do not block each other.
#[derive(Default)]
pub struct MemoryGraphStore {
    inner: RwLock<GraphInner>,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn put_node(&self, node: Node) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        debug!(key = %node.key, label = %node.label, "put node");
        inner.nodes.insert(node.key.clone(), node);
        Ok(())
    }

    async fn get_node(&self, key: &str) -> Result<Option<Node>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.nodes.get(key).cloned())
    }

    async fn delete_node(&self, key: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let existed = inner.nodes.remove(key).is_some();
        if existed {
            inner.edges.retain(|e| e.from != key && e.to != key);
            debug!(key = %key, "deleted node and incident edges");
        }
        Ok(existed)
    }

    async fn put_edge(&self, label: &str, from: &str, to: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let edge = Edge {
            label: label.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        };
        if !inner.edges.contains(&edge) {
            debug!(label = %label, from = %from, to = %to, "put edge");
            inner.edges.push(edge);
        }
        Ok(())
    }

    async fn delete_edge(&self, label: &str, from: &str, to: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.edges.len();
        inner
            .edges
            .retain(|e| !(e.label == label && e.from == from && e.to == to));
        Ok(inner.edges.len() < before)
    }

    async fn out_neighbors(&self, label: &str, from: &str) -> Result<Vec<Node>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .filter(|e| e.label == label && e.from == from)
            .filter_map(|e| inner.nodes.get(&e.to).cloned())
            .collect())
    }

    async fn in_neighbors(&self, label: &str, to: &str) -> Result<Vec<Node>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .filter(|e| e.label == label && e.to == to)
            .filter_map(|e| inner.nodes.get(&e.from).cloned())
            .collect())
    }

    async fn nodes_with_label(&self, label: &str) -> Result<Vec<Node>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .nodes
            .values()
            .filter(|n| n.label == label)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{EDGE_NARROWER, LABEL_TERM};
    use serde_json::json;

    fn term_node(key: &str) -> Node {
        Node::new(key, LABEL_TERM, json!({ "raw": key }))
    }

    #[tokio::test]
    async fn test_put_and_get_node() {
        let store = MemoryGraphStore::new();
        store.put_node(term_node("a")).await.unwrap();

        let node = store.get_node("a").await.unwrap().unwrap();
        assert_eq!(node.key, "a");
        assert_eq!(node.label, LABEL_TERM);

        assert!(store.get_node("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_node_drops_incident_edges() {
        let store = MemoryGraphStore::new();
        store.put_node(term_node("a")).await.unwrap();
        store.put_node(term_node("b")).await.unwrap();
        store.put_edge(EDGE_NARROWER, "a", "b").await.unwrap();

        assert!(store.delete_node("b").await.unwrap());
        assert!(store
            .out_neighbors(EDGE_NARROWER, "a")
            .await
            .unwrap()
            .is_empty());
        // Deleting again is a miss, not an error
        assert!(!store.delete_node("b").await.unwrap());
    }

    #[tokio::test]
    async fn test_neighbors_preserve_insertion_order() {
        let store = MemoryGraphStore::new();
        for key in ["p", "c1", "c2", "c3"] {
            store.put_node(term_node(key)).await.unwrap();
        }
        store.put_edge(EDGE_NARROWER, "p", "c2").await.unwrap();
        store.put_edge(EDGE_NARROWER, "p", "c1").await.unwrap();
        store.put_edge(EDGE_NARROWER, "p", "c3").await.unwrap();

        let keys: Vec<String> = store
            .out_neighbors(EDGE_NARROWER, "p")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.key)
            .collect();
        assert_eq!(keys, vec!["c2", "c1", "c3"]);
    }

    #[tokio::test]
    async fn test_duplicate_edge_is_noop() {
        let store = MemoryGraphStore::new();
        store.put_node(term_node("a")).await.unwrap();
        store.put_node(term_node("b")).await.unwrap();
        store.put_edge(EDGE_NARROWER, "a", "b").await.unwrap();
        store.put_edge(EDGE_NARROWER, "a", "b").await.unwrap();

        assert_eq!(store.out_neighbors(EDGE_NARROWER, "a").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_edge() {
        let store = MemoryGraphStore::new();
        store.put_node(term_node("a")).await.unwrap();
        store.put_node(term_node("b")).await.unwrap();
        store.put_edge(EDGE_NARROWER, "a", "b").await.unwrap();

        assert!(store.delete_edge(EDGE_NARROWER, "a", "b").await.unwrap());
        assert!(!store.delete_edge(EDGE_NARROWER, "a", "b").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_neighbors() {
        let store = MemoryGraphStore::new();
        for key in ["t", "c1", "c2"] {
            store.put_node(term_node(key)).await.unwrap();
        }
        store.put_edge("references", "c1", "t").await.unwrap();
        store.put_edge("references", "c2", "t").await.unwrap();

        let keys: Vec<String> = store
            .in_neighbors("references", "t")
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.key)
            .collect();
        assert_eq!(keys, vec!["c1", "c2"]);
    }
}
