//! In-memory search over directory records.
//!
//! Free-text matching is a case-insensitive substring test over a record's
//! text fields and tags; the facet is an exact-match dimension (industry or
//! category). The filter is stable: survivors keep their original relative
//! order, and there is no relevance scoring.

/// Facet sentinel meaning "do not filter on the facet".
pub const FACET_ALL: &str = "All";

/// A record the search engine can look at.
pub trait SearchRecord {
    /// Text fields to substring-match: name/title, description, and any
    /// service or category tags.
    fn haystacks(&self) -> Vec<&str>;

    /// Exact-match facet value (industry or category).
    fn facet(&self) -> &str;
}

/// Pure, deterministic filter: a record passes when the query is empty or is
/// a case-insensitive substring of any haystack, AND the facet is empty,
/// "All", or exactly equal to the record's facet.
pub fn search<'a, T: SearchRecord>(records: &'a [T], query: &str, facet: &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| {
            let text_pass = needle.is_empty()
                || record
                    .haystacks()
                    .iter()
                    .any(|hay| hay.to_lowercase().contains(&needle));
            let facet_pass = facet.is_empty() || facet == FACET_ALL || record.facet() == facet;
            text_pass && facet_pass
        })
        .collect()
}
