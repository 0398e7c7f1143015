//! Vocabulary term types.
//!
//! The vocabulary is a single-rooted hierarchy of terms. Every term except
//! the root has exactly one parent; `lower` (the case-folded display string)
//! is the uniqueness key across the whole vocabulary.
//!
//! `sub_terms` is populated only as deep as a read requested: a term fetched
//! with depth 0 carries an empty `sub_terms`, not a missing one.

use serde::{Deserialize, Serialize};

/// Stable identity of the fixed root term.
pub const ROOT_TERM_ID: &str = "bccRoot";

/// Display string of the fixed root term.
pub const ROOT_TERM_RAW: &str = "BccRoot";

/// A node in the vocabulary hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    /// Stable identifier (store-assigned or caller-assigned)
    pub id: String,

    /// Display string
    pub raw_term: String,

    /// Case-folded form of `raw_term`; the vocabulary-wide uniqueness key
    pub lower: String,

    /// Child terms, populated only as deep as the read requested
    #[serde(default)]
    pub sub_terms: Vec<Term>,
}

impl Term {
    /// Create a term with an explicit id. `lower` is derived from `raw`.
    pub fn new(id: impl Into<String>, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let lower = raw.to_lowercase();
        Self {
            id: id.into(),
            raw_term: raw,
            lower,
            sub_terms: Vec::new(),
        }
    }

    /// Create a term whose id is its own display string.
    ///
    /// Convenient for descriptions and queries, where only term identity
    /// (`lower`) matters.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::new(raw.clone(), raw)
    }

    /// The fixed, well-known root term.
    pub fn root() -> Self {
        Self::new(ROOT_TERM_ID, ROOT_TERM_RAW)
    }

    /// Attach a pre-built list of children.
    pub fn with_sub_terms(mut self, sub_terms: Vec<Term>) -> Self {
        self.sub_terms = sub_terms;
        self
    }

    /// Whether this is the fixed root term.
    pub fn is_root(&self) -> bool {
        self.id == ROOT_TERM_ID
    }

    /// Index of a direct child matching `other` by `lower`, if any.
    pub fn has_sub_term(&self, other: &Term) -> Option<usize> {
        self.sub_terms.iter().position(|t| t.lower == other.lower)
    }

    /// Number of terms in this subtree, the term itself included.
    pub fn subtree_size(&self) -> usize {
        1 + self
            .sub_terms
            .iter()
            .map(Term::subtree_size)
            .sum::<usize>()
    }

    /// Height of the populated subtree below this term.
    pub fn height(&self) -> usize {
        self.sub_terms
            .iter()
            .map(|t| t.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order flattening of the subtree into `(parent_id, term)` pairs,
    /// with the given parent for this term itself. Children lists on the
    /// yielded terms are not cleared; callers take identity fields only.
    pub fn flatten_with_parents<'a>(&'a self, parent_id: &str) -> Vec<(String, &'a Term)> {
        let mut out = vec![(parent_id.to_string(), self)];
        for child in &self.sub_terms {
            out.extend(child.flatten_with_parents(&self.id));
        }
        out
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw_term)
    }
}
