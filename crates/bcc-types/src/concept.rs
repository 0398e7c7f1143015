//! Concept strings: ordered term sequences describing a classifiable.
//!
//! The canonical textual form wraps each term's display string in
//! parentheses with no separators, e.g. `(blade)(of)(Tool)`. An empty
//! description renders as the empty string; callers use that as the
//! "no description yet" sentinel rather than a null value.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::BccError;
use crate::term::Term;

/// An ordered sequence of term references attached to a classifiable.
///
/// Owned exclusively by the classifiable that holds it. Matching is defined
/// at term identity (`lower`), not at the rendered-string level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConceptString {
    /// Terms in description order
    pub terms: Vec<Term>,
}

impl ConceptString {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    /// The empty description ("not classified yet").
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Parse the canonical parenthesized form.
    ///
    /// The inverse of `to_string`: `"(blade)(of)"` yields two terms whose
    /// ids are their display strings. The empty string parses to the empty
    /// description. Anything not strictly of the form `(..)(..)` is invalid.
    pub fn parse(input: &str) -> Result<Self, BccError> {
        if input.is_empty() {
            return Ok(Self::empty());
        }

        let mut terms = Vec::new();
        let mut rest = input;
        while !rest.is_empty() {
            if !rest.starts_with('(') {
                return Err(BccError::InvalidConceptString(input.to_string()));
            }
            let close = rest
                .find(')')
                .ok_or_else(|| BccError::InvalidConceptString(input.to_string()))?;
            let raw = &rest[1..close];
            if raw.is_empty() || raw.contains('(') {
                return Err(BccError::InvalidConceptString(input.to_string()));
            }
            terms.push(Term::from_raw(raw));
            rest = &rest[close + 1..];
        }

        Ok(Self::new(terms))
    }

    /// Distinct `lower` identities of the terms in this description.
    pub fn lower_set(&self) -> HashSet<&str> {
        self.terms.iter().map(|t| t.lower.as_str()).collect()
    }

    /// Whether this description references a term with the given `lower`.
    pub fn references(&self, lower: &str) -> bool {
        self.terms.iter().any(|t| t.lower == lower)
    }

    /// Count of distinct terms shared with `other`, by `lower` identity.
    pub fn shared_term_count(&self, other: &ConceptString) -> usize {
        let mine = self.lower_set();
        other
            .lower_set()
            .iter()
            .filter(|l| mine.contains(*l))
            .count()
    }

    /// Remove every term whose `lower` appears in `doomed`, preserving the
    /// order of the remaining terms. Returns how many were removed.
    pub fn strip_terms(&mut self, doomed: &HashSet<String>) -> usize {
        let before = self.terms.len();
        self.terms.retain(|t| !doomed.contains(&t.lower));
        before - self.terms.len()
    }
}

impl std::fmt::Display for ConceptString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for term in &self.terms {
            write!(f, "({})", term.raw_term)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(raws: &[&str]) -> ConceptString {
        ConceptString::new(raws.iter().map(|r| Term::from_raw(*r)).collect())
    }

    #[test]
    fn test_empty_renders_empty_string() {
        assert_eq!(ConceptString::empty().to_string(), "");
    }

    #[test]
    fn test_canonical_rendering() {
        let desc = description(&["blade", "of", "Tool", "for", "carving", "wood"]);
        assert_eq!(desc.to_string(), "(blade)(of)(Tool)(for)(carving)(wood)");
    }

    #[test]
    fn test_parse_roundtrip() {
        let rendered = "(blade)(of)(Tool)";
        let desc = ConceptString::parse(rendered).unwrap();
        assert_eq!(desc.len(), 3);
        assert_eq!(desc.terms[2].raw_term, "Tool");
        assert_eq!(desc.terms[2].lower, "tool");
        assert_eq!(desc.to_string(), rendered);
    }

    #[test]
    fn test_parse_empty() {
        let desc = ConceptString::parse("").unwrap();
        assert!(desc.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(ConceptString::parse("blade").is_err());
        assert!(ConceptString::parse("(blade").is_err());
        assert!(ConceptString::parse("()").is_err());
        assert!(ConceptString::parse("(a)junk(b)").is_err());
        // An unbalanced open paren inside a segment would not round-trip
        assert!(ConceptString::parse("(a(b)").is_err());
    }

    #[test]
    fn test_shared_term_count_by_lower() {
        let a = description(&["wood", "Tool", "for"]);
        let b = description(&["WOOD", "tool", "blade"]);
        assert_eq!(a.shared_term_count(&b), 2);
        assert_eq!(a.shared_term_count(&ConceptString::empty()), 0);
    }

    #[test]
    fn test_strip_terms_preserves_order() {
        let mut desc = description(&["blade", "of", "Tool", "for", "wood"]);
        let doomed: HashSet<String> = ["of".to_string(), "wood".to_string()].into();
        let removed = desc.strip_terms(&doomed);
        assert_eq!(removed, 2);
        assert_eq!(desc.to_string(), "(blade)(Tool)(for)");
    }
}
