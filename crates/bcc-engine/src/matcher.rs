//! Ranked description matching.
//!
//! Relevance is the count of distinct query terms a description shares,
//! by case-folded identity. Term order and repetition never affect the
//! score. Items sharing nothing are excluded outright, so an empty query
//! matches nothing.

use bcc_types::{Classifiable, ConceptString};

/// Rank `items` against `query` by shared-term count.
///
/// Returns only items with a positive score. With `ordered` set, results
/// come best-first; ties keep the input order (the sort is stable).
pub fn match_by_description(
    items: Vec<Classifiable>,
    query: &ConceptString,
    ordered: bool,
) -> Vec<Classifiable> {
    let mut scored: Vec<(usize, Classifiable)> = items
        .into_iter()
        .filter_map(|item| {
            let score = item.concept_str.shared_term_count(query);
            (score > 0).then_some((score, item))
        })
        .collect();

    if ordered {
        scored.sort_by(|a, b| b.0.cmp(&a.0));
    }
    scored.into_iter().map(|(_, item)| item).collect()
}
