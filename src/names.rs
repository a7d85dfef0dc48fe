//! Name canonicalisation.
//!
//! Roster sheets record the same person inconsistently from year to year:
//! full name in one tab, surname plus initials in another, with stray
//! whitespace and casing either way. This module derives the canonical forms
//! that the matcher compares.

/// Trims, lowercases, and collapses every run of whitespace to a single
/// space. Total; empty input yields the empty string.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Reduces a full name to its initials form:
/// `"Nemchinov Vasily Sergeevich"` → `"Nemchinov V.S."`,
/// `"Nemchinov Vasily"` → `"Nemchinov V."`.
///
/// Any other token count returns the trimmed input unmodified, and the
/// result is not normalized either way; callers needing a normalized
/// initials form run [`normalize`] on the output. Note the pass-through is
/// not a fixpoint: feeding a 3-token result back in splits as 2 tokens
/// ("Nemchinov" / "V.S.") and abbreviates again.
pub fn to_initials(name: &str) -> String {
    let trimmed = name.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    match parts.as_slice() {
        [last, first, patronymic] => {
            format!("{last} {}.{}.", initial(first), initial(patronymic))
        }
        [last, first] => format!("{last} {}.", initial(first)),
        _ => trimmed.to_string(),
    }
}

fn initial(token: &str) -> String {
    token.chars().take(1).collect()
}

/// The two canonical forms of a search input, precomputed once per search
/// request and compared against the same two forms of every stored name.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    name: String,
    initials: String,
}

impl MatchQuery {
    pub fn new(input: &str) -> Self {
        Self {
            name: normalize(input),
            initials: normalize(&to_initials(input)),
        }
    }

    /// True iff any of the four cross equalities between the query forms and
    /// the stored name's forms holds. Full-name lookups therefore find
    /// initials-only records and vice versa.
    pub fn matches(&self, stored: &str) -> bool {
        let stored_name = normalize(stored);
        let stored_initials = normalize(&to_initials(stored));
        self.name == stored_name
            || self.initials == stored_name
            || self.name == stored_initials
            || self.initials == stored_initials
    }
}
