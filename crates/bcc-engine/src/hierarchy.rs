//! Term hierarchy management.
//!
//! The vocabulary is a single-rooted tree living behind the graph store.
//! This module owns its structural invariants: exactly one root, one parent
//! per term, `lower` unique vocabulary-wide, no cycles. Every mutating
//! operation validates before it writes, so a failed call leaves the store
//! unchanged.
//!
//! Reads are depth-bounded: `-1` means the whole subtree, `0` the term
//! alone, `d > 0` exactly d levels of descendants. Unlimited reads are the
//! explicit exception, not the default.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info};

use bcc_graph::{GraphStore, TermGraph};
use bcc_types::{BccError, Term, ROOT_TERM_ID};

/// Structured result of a structural mutation.
///
/// Lists the parent-child and reference edges actually changed;
/// [`EdgeChange::edges_changed`] derives the flat count callers use as a
/// write-confirmation checksum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeChange {
    /// Edges created, as `(from, to)` pairs
    pub added: Vec<(String, String)>,
    /// Edges removed, as `(from, to)` pairs
    pub removed: Vec<(String, String)>,
}

impl EdgeChange {
    pub fn edges_changed(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Dry-run impact report for a cascading term delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteImpact {
    /// Distinct rendered descriptions that reference a doomed term
    pub strings_affected: Vec<String>,
    /// Ids of the classifiables holding those descriptions
    pub classifiables_affected: Vec<String>,
}

/// Manages the term hierarchy over a graph store handle.
pub struct TermHierarchy<S: GraphStore + ?Sized> {
    graph: TermGraph<S>,
}

impl<S: GraphStore + ?Sized> TermHierarchy<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            graph: TermGraph::new(store),
        }
    }

    /// Create the fixed root term if the store does not hold one yet.
    pub async fn bootstrap(&self) -> Result<(), BccError> {
        if self.graph.get_term(ROOT_TERM_ID).await?.is_none() {
            self.graph.put_term(&Term::root()).await?;
            info!("created root term");
        }
        Ok(())
    }

    /// The unique root term. Fails with `NotFound` only if the store has
    /// not been initialized.
    pub async fn root_term(&self) -> Result<Term, BccError> {
        self.graph
            .get_term(ROOT_TERM_ID)
            .await?
            .ok_or_else(|| BccError::NotFound("root term (store not initialized)".to_string()))
    }

    /// Exact-match lookup by display string; absence is a normal outcome.
    pub async fn term_by_raw(&self, raw: &str) -> Result<Option<Term>, BccError> {
        Ok(self.graph.term_by_raw(raw).await?)
    }

    /// Exact-match lookup by case-folded form.
    pub async fn term_by_lower(&self, lower: &str) -> Result<Option<Term>, BccError> {
        Ok(self.graph.term_by_lower(lower).await?)
    }

    /// Immediate children only; empty if the term is absent or childless.
    pub async fn children_of(&self, term: &Term) -> Result<Vec<Term>, BccError> {
        Ok(self.graph.children(&term.id).await?)
    }

    /// Cloned subtree rooted at `term_id` with `sub_terms` populated to
    /// `depth`. Returns `Ok(None)` if the term does not exist, regardless
    /// of depth. Terms at the cutoff carry an empty `sub_terms`.
    pub async fn subtree_with_depth(
        &self,
        term_id: &str,
        depth: i32,
    ) -> Result<Option<Term>, BccError> {
        match self.graph.get_term(term_id).await? {
            Some(term) => Ok(Some(self.populate(term, depth).await?)),
            None => Ok(None),
        }
    }

    /// Convenience: subtree from the fixed root.
    pub async fn subtree_from_root(&self, depth: i32) -> Result<Term, BccError> {
        let root = self.root_term().await?;
        self.populate(root, depth).await
    }

    fn populate<'a>(&'a self, mut term: Term, depth: i32) -> BoxFuture<'a, Result<Term, BccError>> {
        async move {
            if depth == 0 {
                term.sub_terms = Vec::new();
                return Ok(term);
            }
            let next = if depth < 0 { -1 } else { depth - 1 };
            let mut children = Vec::new();
            for child in self.graph.children(&term.id).await? {
                children.push(self.populate(child, next).await?);
            }
            term.sub_terms = children;
            Ok(term)
        }
        .boxed()
    }

    /// Insert `term`, together with any pre-built subtree it carries,
    /// under `parent` (the root when `parent` is `None`).
    ///
    /// Fails if any inserted term collides on `lower` with the existing
    /// vocabulary or within the batch; nothing is written on failure.
    /// Reports one added edge per inserted term.
    pub async fn add_term(
        &self,
        term: Term,
        parent: Option<&str>,
    ) -> Result<EdgeChange, BccError> {
        let parent_id = parent.unwrap_or(ROOT_TERM_ID);
        if self.graph.get_term(parent_id).await?.is_none() {
            return Err(BccError::MissingReference(format!(
                "parent term '{}'",
                parent_id
            )));
        }

        let batch = term.flatten_with_parents(parent_id);

        let mut seen_lowers: HashSet<&str> = HashSet::new();
        let mut seen_ids: HashSet<&str> = HashSet::new();
        for (_, t) in &batch {
            if !seen_lowers.insert(t.lower.as_str()) {
                return Err(BccError::DuplicateTerm(t.lower.clone()));
            }
            if self.graph.term_by_lower(&t.lower).await?.is_some() {
                return Err(BccError::DuplicateTerm(t.lower.clone()));
            }
            // An id clash would overwrite the existing node and hand the
            // surviving term a second parent edge
            if !seen_ids.insert(t.id.as_str()) || self.graph.get_term(&t.id).await?.is_some() {
                return Err(BccError::IdCollision(t.id.clone()));
            }
        }

        let mut change = EdgeChange::default();
        for (parent_id, t) in &batch {
            self.graph.put_term(t).await?;
            self.graph.link_child(parent_id, &t.id).await?;
            change.added.push((parent_id.clone(), t.id.clone()));
        }
        debug!(term = %term.id, edges = change.edges_changed(), "added term subtree");
        Ok(change)
    }

    /// Detach `term_id` from its parent and attach it under
    /// `new_parent_id`, subtree intact.
    ///
    /// Fails if either term is missing or if the new parent is the term
    /// itself or one of its descendants. Reports one removed and one added
    /// edge.
    pub async fn move_term(
        &self,
        term_id: &str,
        new_parent_id: &str,
    ) -> Result<EdgeChange, BccError> {
        if self.graph.get_term(term_id).await?.is_none() {
            return Err(BccError::MissingReference(format!("term '{}'", term_id)));
        }
        if self.graph.get_term(new_parent_id).await?.is_none() {
            return Err(BccError::MissingReference(format!(
                "term '{}'",
                new_parent_id
            )));
        }

        if new_parent_id == term_id {
            return Err(BccError::CycleDetected {
                term: term_id.to_string(),
                new_parent: new_parent_id.to_string(),
            });
        }
        let descendants = self.collect_subtree(term_id).await?;
        if descendants.iter().any(|t| t.id == new_parent_id) {
            return Err(BccError::CycleDetected {
                term: term_id.to_string(),
                new_parent: new_parent_id.to_string(),
            });
        }

        let old_parent = self.graph.parent(term_id).await?.ok_or_else(|| {
            BccError::MissingReference(format!("parent edge of term '{}'", term_id))
        })?;

        self.graph.unlink_child(&old_parent.id, term_id).await?;
        self.graph.link_child(new_parent_id, term_id).await?;
        debug!(term = %term_id, from = %old_parent.id, to = %new_parent_id, "moved term");

        Ok(EdgeChange {
            added: vec![(new_parent_id.to_string(), term_id.to_string())],
            removed: vec![(old_parent.id, term_id.to_string())],
        })
    }

    /// Update a term's display string, recomputing `lower`. Identity (`id`)
    /// and the subtree are unchanged. Fails on a `lower` collision with a
    /// different term.
    pub async fn rename_term(&self, term_id: &str, new_raw: &str) -> Result<(), BccError> {
        if term_id == ROOT_TERM_ID {
            return Err(BccError::RootImmutable);
        }
        if self.graph.get_term(term_id).await?.is_none() {
            return Err(BccError::MissingReference(format!("term '{}'", term_id)));
        }

        let renamed = Term::new(term_id, new_raw);
        if let Some(existing) = self.graph.term_by_lower(&renamed.lower).await? {
            if existing.id != term_id {
                return Err(BccError::DuplicateTerm(renamed.lower));
            }
        }

        self.graph.put_term(&renamed).await?;
        debug!(term = %term_id, raw = %new_raw, "renamed term");
        Ok(())
    }

    /// True only if the term can be deleted without cascading, i.e. it has
    /// no children. An absent term is trivially safe (deletion is a no-op).
    pub async fn validate_delete(&self, term_id: &str) -> Result<bool, BccError> {
        Ok(self.graph.children(term_id).await?.is_empty())
    }

    /// Leaf-only delete. Fails with `NonLeafDelete` if the term still has
    /// children; callers wanting the cascade must use
    /// [`TermHierarchy::delete_term_force`] explicitly.
    pub async fn delete_term(&self, term_id: &str) -> Result<EdgeChange, BccError> {
        if term_id == ROOT_TERM_ID {
            return Err(BccError::RootImmutable);
        }
        if !self.validate_delete(term_id).await? {
            return Err(BccError::NonLeafDelete(term_id.to_string()));
        }
        self.delete_term_force(term_id).await
    }

    /// Dry-run impact report for a forced delete of `term_id`: the distinct
    /// descriptions referencing the term or any of its descendants, and the
    /// classifiables holding them. Computed without mutating the store.
    pub async fn delete_preview(&self, term_id: &str) -> Result<DeleteImpact, BccError> {
        let mut impact = DeleteImpact::default();
        if self.graph.get_term(term_id).await?.is_none() {
            return Ok(impact);
        }

        let mut seen_items: HashSet<String> = HashSet::new();
        let mut seen_strings: HashSet<String> = HashSet::new();
        for doomed in self.collect_subtree(term_id).await? {
            for item in self.graph.classifiables_referencing(&doomed.id).await? {
                let rendered = item.concept_str.to_string();
                if seen_strings.insert(rendered.clone()) {
                    impact.strings_affected.push(rendered);
                }
                if seen_items.insert(item.id.clone()) {
                    impact.classifiables_affected.push(item.id);
                }
            }
        }
        Ok(impact)
    }

    /// Delete `term_id` and, cascading, every descendant: all their parent
    /// edges, all reference edges, and every occurrence of the doomed terms
    /// inside stored descriptions. The only delete path that tolerates a
    /// non-leaf term. Deleting an absent term is a successful no-op.
    pub async fn delete_term_force(&self, term_id: &str) -> Result<EdgeChange, BccError> {
        if term_id == ROOT_TERM_ID {
            return Err(BccError::RootImmutable);
        }
        let mut change = EdgeChange::default();
        if self.graph.get_term(term_id).await?.is_none() {
            return Ok(change);
        }

        let doomed = self.collect_subtree(term_id).await?;
        let doomed_lowers: HashSet<String> = doomed.iter().map(|t| t.lower.clone()).collect();

        // Account for every edge the cascade removes before mutating.
        let mut affected: Vec<bcc_types::Classifiable> = Vec::new();
        let mut affected_ids: HashSet<String> = HashSet::new();
        for term in &doomed {
            if let Some(parent) = self.graph.parent(&term.id).await? {
                change.removed.push((parent.id, term.id.clone()));
            }
            for item in self.graph.classifiables_referencing(&term.id).await? {
                change.removed.push((item.id.clone(), term.id.clone()));
                if affected_ids.insert(item.id.clone()) {
                    affected.push(item);
                }
            }
        }

        // Strip doomed terms out of affected descriptions first, so no
        // description ever dangles into deleted vocabulary.
        for mut item in affected {
            item.concept_str.strip_terms(&doomed_lowers);
            self.graph.put_classifiable(&item).await?;
            self.graph.set_references(&item.id, &item.concept_str).await?;
        }

        for term in &doomed {
            self.graph.delete_term(&term.id).await?;
        }

        info!(
            term = %term_id,
            terms_removed = doomed.len(),
            edges_removed = change.removed.len(),
            "cascading term delete"
        );
        Ok(change)
    }

    /// The term and all its descendants, parents before children.
    async fn collect_subtree(&self, term_id: &str) -> Result<Vec<Term>, BccError> {
        let mut out = Vec::new();
        let mut queue = vec![term_id.to_string()];
        while let Some(id) = queue.pop() {
            if let Some(term) = self.graph.get_term(&id).await? {
                for child in self.graph.children(&id).await? {
                    queue.push(child.id.clone());
                }
                out.push(term);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcc_graph::MemoryGraphStore;
    use bcc_types::{Classifiable, Classifier, ConceptString, Glam};

    async fn hierarchy() -> TermHierarchy<MemoryGraphStore> {
        let h = TermHierarchy::new(Arc::new(MemoryGraphStore::new()));
        h.bootstrap().await.unwrap();
        h
    }

    fn subtree(id: &str, raw: &str, children: Vec<Term>) -> Term {
        Term::new(id, raw).with_sub_terms(children)
    }

    #[tokio::test]
    async fn test_root_term_after_bootstrap() {
        let h = hierarchy().await;
        let root = h.root_term().await.unwrap();
        assert_eq!(root.id, "bccRoot");
        assert_eq!(root.raw_term, "BccRoot");
        assert_eq!(root.lower, "bccroot");
        assert!(root.sub_terms.is_empty());
    }

    #[tokio::test]
    async fn test_root_term_uninitialized_is_not_found() {
        let h = TermHierarchy::new(Arc::new(MemoryGraphStore::new()));
        assert!(matches!(h.root_term().await, Err(BccError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_add_term_under_root_counts_one_edge() {
        let h = hierarchy().await;
        let change = h.add_term(Term::new("t1", "Test 1"), None).await.unwrap();
        assert_eq!(change.edges_changed(), 1);

        let root = h.subtree_from_root(1).await.unwrap();
        assert!(root.has_sub_term(&Term::from_raw("Test 1")).is_some());
    }

    #[tokio::test]
    async fn test_add_subtree_counts_all_edges() {
        let h = hierarchy().await;
        let tree = subtree(
            "t1",
            "Test 1",
            (0..3).map(|i| Term::new(format!("c{}", i), format!("Child {}", i))).collect(),
        );
        let change = h.add_term(tree, None).await.unwrap();
        assert_eq!(change.edges_changed(), 4);

        let children = h
            .children_of(&h.term_by_raw("Test 1").await.unwrap().unwrap())
            .await
            .unwrap();
        assert_eq!(children.len(), 3);
    }

    #[tokio::test]
    async fn test_add_term_lower_collision_fails() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Tool"), None).await.unwrap();

        let err = h.add_term(Term::new("t2", "tool"), None).await.unwrap_err();
        assert!(matches!(err, BccError::DuplicateTerm(l) if l == "tool"));
    }

    #[tokio::test]
    async fn test_add_term_collision_writes_nothing() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Tool"), None).await.unwrap();

        // Batch collides on its second entry; the first must not land either
        let tree = subtree("t2", "Fresh", vec![Term::new("t3", "Tool")]);
        assert!(h.add_term(tree, None).await.is_err());
        assert!(h.term_by_raw("Fresh").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_term_id_collision_fails() {
        let h = hierarchy().await;
        h.add_term(Term::new("p1", "Parent 1"), None).await.unwrap();
        h.add_term(Term::new("p2", "Parent 2"), None).await.unwrap();
        h.add_term(Term::new("t1", "Tool"), Some("p1")).await.unwrap();

        // Re-using an existing id must not overwrite the node or give the
        // term a second parent
        let err = h
            .add_term(Term::new("t1", "Hammer"), Some("p2"))
            .await
            .unwrap_err();
        assert!(matches!(err, BccError::IdCollision(id) if id == "t1"));

        let t1 = h.term_by_raw("Tool").await.unwrap().unwrap();
        assert_eq!(t1.id, "t1");
        assert!(h.term_by_raw("Hammer").await.unwrap().is_none());
        let p2 = h.term_by_raw("Parent 2").await.unwrap().unwrap();
        assert!(h.children_of(&p2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_term_missing_parent_fails() {
        let h = hierarchy().await;
        let err = h
            .add_term(Term::new("t1", "Test 1"), Some("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, BccError::MissingReference(_)));
    }

    #[tokio::test]
    async fn test_lookup_absent_is_none() {
        let h = hierarchy().await;
        assert!(h.term_by_raw("I am NOT a Term").await.unwrap().is_none());
        assert!(h.term_by_lower("i am not a term").await.unwrap().is_none());
        assert!(h
            .subtree_with_depth("missing", 0)
            .await
            .unwrap()
            .is_none());
        assert!(h
            .subtree_with_depth("missing", 2)
            .await
            .unwrap()
            .is_none());
    }

    async fn build_chain(h: &TermHierarchy<MemoryGraphStore>) {
        // root -> a -> b -> c, plus a second child under a
        h.add_term(
            subtree(
                "a",
                "A",
                vec![
                    subtree("b", "B", vec![Term::new("c", "C")]),
                    Term::new("d", "D"),
                ],
            ),
            None,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_depth_bound() {
        let h = hierarchy().await;
        build_chain(&h).await;

        let d0 = h.subtree_with_depth("a", 0).await.unwrap().unwrap();
        assert_eq!(d0.height(), 0);
        assert!(d0.sub_terms.is_empty());

        let d1 = h.subtree_with_depth("a", 1).await.unwrap().unwrap();
        assert_eq!(d1.height(), 1);
        assert_eq!(d1.sub_terms.len(), 2);
        // Cutoff children report empty sub_terms, not missing ones
        assert!(d1.sub_terms.iter().all(|t| t.sub_terms.is_empty()));

        let d2 = h.subtree_with_depth("a", 2).await.unwrap().unwrap();
        assert_eq!(d2.height(), 2);

        // Deeper than the actual subtree: height clamps to the real one
        let d9 = h.subtree_with_depth("a", 9).await.unwrap().unwrap();
        assert_eq!(d9.height(), 2);

        let unlimited = h.subtree_with_depth("a", -1).await.unwrap().unwrap();
        assert_eq!(unlimited.height(), 2);
        assert_eq!(unlimited.subtree_size(), 4);
    }

    #[tokio::test]
    async fn test_subtree_from_root_unlimited() {
        let h = hierarchy().await;
        build_chain(&h).await;

        let tree = h.subtree_from_root(-1).await.unwrap();
        assert_eq!(tree.subtree_size(), 5);
    }

    #[tokio::test]
    async fn test_move_term_counts_two_edges() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Test 1"), None).await.unwrap();
        h.add_term(Term::new("t2", "Test 2"), None).await.unwrap();

        let change = h.move_term("t1", "t2").await.unwrap();
        assert_eq!(change.edges_changed(), 2);

        let t2_children = h
            .children_of(&h.term_by_raw("Test 2").await.unwrap().unwrap())
            .await
            .unwrap();
        assert_eq!(t2_children.len(), 1);
        assert_eq!(t2_children[0].id, "t1");

        // Gone from under the root
        let root = h.subtree_from_root(1).await.unwrap();
        assert!(root.has_sub_term(&Term::from_raw("Test 1")).is_none());
    }

    #[tokio::test]
    async fn test_move_term_to_self_fails() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Test 1"), None).await.unwrap();
        assert!(matches!(
            h.move_term("t1", "t1").await,
            Err(BccError::CycleDetected { .. })
        ));
    }

    #[tokio::test]
    async fn test_move_term_under_descendant_fails() {
        let h = hierarchy().await;
        build_chain(&h).await;

        let err = h.move_term("a", "c").await.unwrap_err();
        assert!(matches!(err, BccError::CycleDetected { .. }));

        // Hierarchy unchanged: c is still below a
        let tree = h.subtree_with_depth("a", -1).await.unwrap().unwrap();
        assert_eq!(tree.subtree_size(), 4);
    }

    #[tokio::test]
    async fn test_move_missing_term_fails() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Test 1"), None).await.unwrap();
        assert!(matches!(
            h.move_term("ghost", "t1").await,
            Err(BccError::MissingReference(_))
        ));
        assert!(matches!(
            h.move_term("t1", "ghost").await,
            Err(BccError::MissingReference(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_term() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Hello!"), None).await.unwrap();

        h.rename_term("t1", "World!").await.unwrap();

        assert!(h.term_by_raw("Hello!").await.unwrap().is_none());
        let renamed = h.term_by_raw("World!").await.unwrap().unwrap();
        assert_eq!(renamed.id, "t1");
        assert_eq!(renamed.lower, "world!");
    }

    #[tokio::test]
    async fn test_rename_collision_fails() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Tool"), None).await.unwrap();
        h.add_term(Term::new("t2", "Wood"), None).await.unwrap();

        let err = h.rename_term("t2", "tool").await.unwrap_err();
        assert!(matches!(err, BccError::DuplicateTerm(_)));

        // Renaming to a different casing of itself is allowed
        h.rename_term("t1", "TOOL").await.unwrap();
        assert_eq!(
            h.term_by_lower("tool").await.unwrap().unwrap().raw_term,
            "TOOL"
        );
    }

    #[tokio::test]
    async fn test_validate_delete() {
        let h = hierarchy().await;
        build_chain(&h).await;

        assert!(!h.validate_delete("a").await.unwrap());
        assert!(!h.validate_delete("b").await.unwrap());
        assert!(h.validate_delete("c").await.unwrap());
        assert!(h.validate_delete("d").await.unwrap());
        // Absent term: deleting it is a no-op, trivially safe
        assert!(h.validate_delete("ghost").await.unwrap());
    }

    // Stores a classifiable whose description references the given terms,
    // bypassing the catalog (the hierarchy only needs the edges).
    async fn attach_item(
        graph: &TermGraph<MemoryGraphStore>,
        name: &str,
        terms: Vec<Term>,
    ) -> Classifiable {
        let owner = Classifier::new("owner@sample.org", &Glam::new("Sample"));
        let item = Classifiable::new(name, "url", owner)
            .with_concept_str(ConceptString::new(terms));
        graph.put_classifiable(&item).await.unwrap();
        graph.set_references(&item.id, &item.concept_str).await.unwrap();
        item
    }

    #[tokio::test]
    async fn test_delete_preview_reports_cascade_impact() {
        let store = Arc::new(MemoryGraphStore::new());
        let h = TermHierarchy::new(Arc::clone(&store));
        h.bootstrap().await.unwrap();
        build_chain(&h).await;
        let graph = TermGraph::new(store);

        let b = h.term_by_raw("B").await.unwrap().unwrap();
        let c = h.term_by_raw("C").await.unwrap().unwrap();
        let item_b = attach_item(&graph, "Item B", vec![b.clone()]).await;
        let item_c = attach_item(&graph, "Item C", vec![c.clone()]).await;

        // Previewing b covers its descendant c too
        let impact = h.delete_preview("b").await.unwrap();
        assert_eq!(impact.classifiables_affected.len(), 2);
        assert!(impact.classifiables_affected.contains(&item_b.id));
        assert!(impact.classifiables_affected.contains(&item_c.id));
        assert_eq!(impact.strings_affected.len(), 2);

        // Preview is a dry run
        assert!(h.term_by_raw("B").await.unwrap().is_some());
        assert!(graph.get_classifiable(&item_b.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_preview_absent_term_is_empty() {
        let h = hierarchy().await;
        let impact = h.delete_preview("ghost").await.unwrap();
        assert!(impact.strings_affected.is_empty());
        assert!(impact.classifiables_affected.is_empty());
    }

    #[tokio::test]
    async fn test_force_delete_cascades() {
        let store = Arc::new(MemoryGraphStore::new());
        let h = TermHierarchy::new(Arc::clone(&store));
        h.bootstrap().await.unwrap();
        build_chain(&h).await;
        let graph = TermGraph::new(store);

        let b = h.term_by_raw("B").await.unwrap().unwrap();
        let c = h.term_by_raw("C").await.unwrap().unwrap();
        let d = h.term_by_raw("D").await.unwrap().unwrap();
        let item = attach_item(&graph, "Carved Bowl", vec![d.clone(), c.clone()]).await;

        // Deleting b removes b and c: parent edges (a,b), (b,c) plus the
        // reference edge (item, c)
        let change = h.delete_term_force("b").await.unwrap();
        assert_eq!(change.edges_changed(), 3);
        assert!(change.added.is_empty());

        assert!(h.term_by_raw("B").await.unwrap().is_none());
        assert!(h.term_by_raw("C").await.unwrap().is_none());
        assert!(h.term_by_raw("D").await.unwrap().is_some());

        // The stored description lost the doomed term but kept the rest
        let stored = graph.get_classifiable(&item.id).await.unwrap().unwrap();
        assert_eq!(stored.concept_str.to_string(), "(D)");
        assert!(!stored.concept_str.references(&b.lower));
    }

    #[tokio::test]
    async fn test_force_delete_leaf_counts_parent_edge() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Test 1"), None).await.unwrap();

        let change = h.delete_term_force("t1").await.unwrap();
        assert_eq!(change.edges_changed(), 1);
        assert!(h.term_by_raw("Test 1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_safe_delete_rejects_non_leaf() {
        let h = hierarchy().await;
        build_chain(&h).await;

        let err = h.delete_term("a").await.unwrap_err();
        assert!(matches!(err, BccError::NonLeafDelete(t) if t == "a"));
        assert!(h.term_by_raw("A").await.unwrap().is_some());

        let change = h.delete_term("c").await.unwrap();
        assert_eq!(change.edges_changed(), 1);
        assert!(h.term_by_raw("C").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_force_delete_absent_is_noop() {
        let h = hierarchy().await;
        let change = h.delete_term_force("ghost").await.unwrap();
        assert_eq!(change.edges_changed(), 0);
    }

    #[tokio::test]
    async fn test_root_cannot_be_renamed_or_deleted() {
        let h = hierarchy().await;
        h.add_term(Term::new("t1", "Test 1"), None).await.unwrap();

        assert!(matches!(
            h.rename_term("bccRoot", "NewRoot").await,
            Err(BccError::RootImmutable)
        ));
        assert!(matches!(
            h.delete_term_force("bccRoot").await,
            Err(BccError::RootImmutable)
        ));
        assert!(matches!(
            h.delete_term("bccRoot").await,
            Err(BccError::RootImmutable)
        ));

        let root = h.root_term().await.unwrap();
        assert_eq!(root.raw_term, "BccRoot");
        assert!(h.term_by_raw("Test 1").await.unwrap().is_some());
    }
}
