//! Fuzzy entity resolution against fixed vocabularies.
//!
//! Two-stage match: exact (case-insensitive substring containment in
//! vocabulary order) first, then per-token edit similarity as a fallback for
//! transcription noise ("bedrom", "kichen"). Exact always beats fuzzy.

use strsim::normalized_levenshtein;

/// Minimum edit similarity for a fuzzy token match.
const SIMILARITY_CUTOFF: f64 = 0.7;

/// Rooms the assistant knows how to talk about. A superset of the rooms the
/// registry seeds; resolution and registration are independent.
pub const ROOMS: &[&str] = &[
    "living room",
    "bedroom",
    "kitchen",
    "bathroom",
    "dining room",
    "office",
    "hallway",
    "entryway",
];

/// Color vocabulary for light color changes.
pub const COLORS: &[&str] = &[
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "purple",
    "orange",
    "pink",
    "warm white",
    "cool white",
];

/// Resolve free text to a vocabulary entry, or `None` if nothing matches.
///
/// Substring containment is tried against each entry in vocabulary order and
/// the first hit wins. Failing that, each whitespace token of the text is
/// compared to every entry by normalized Levenshtein similarity; the best
/// pair at or above the cutoff wins, with the earliest token in text order
/// breaking ties.
pub fn resolve<'a>(text: &str, vocabulary: &[&'a str]) -> Option<&'a str> {
    let lower = text.to_lowercase();

    for entry in vocabulary {
        if lower.contains(entry) {
            return Some(entry);
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for token in lower.split_whitespace() {
        for entry in vocabulary {
            let similarity = normalized_levenshtein(token, entry);
            if similarity < SIMILARITY_CUTOFF {
                continue;
            }
            // Strictly-greater keeps the earliest token on ties.
            if best.is_none_or(|(_, s)| similarity > s) {
                best = Some((entry, similarity));
            }
        }
    }

    best.map(|(entry, _)| entry)
}

/// Resolve a room name from free text.
pub fn resolve_room(text: &str) -> Option<&'static str> {
    resolve(text, ROOMS)
}

/// Resolve a color name from free text.
pub fn resolve_color(text: &str) -> Option<&'static str> {
    resolve(text, COLORS)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_substring_match() {
        assert_eq!(resolve_room("turn on the living room lights"), Some("living room"));
        assert_eq!(resolve_room("the KITCHEN please"), Some("kitchen"));
        assert_eq!(resolve_color("make it warm white"), Some("white"));
    }

    #[test]
    fn test_substring_wins_in_vocabulary_order() {
        // "warm white" contains "white", which comes first in the vocabulary.
        assert_eq!(resolve("warm white", COLORS), Some("white"));
    }

    #[test]
    fn test_fuzzy_match_on_misspelling() {
        assert_eq!(resolve_room("lights in the bedrom"), Some("bedroom"));
        assert_eq!(resolve_room("dim the kichen"), Some("kitchen"));
        assert_eq!(resolve_color("turn it purpel"), Some("purple"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(resolve_room("open the garage"), None);
        assert_eq!(resolve_color("something else entirely"), None);
        assert_eq!(resolve("", ROOMS), None);
    }

    #[test]
    fn test_short_tokens_do_not_fuzzy_match() {
        // "the"/"on" are nowhere near any vocabulary entry.
        assert_eq!(resolve("turn on the", ROOMS), None);
    }

    proptest! {
        /// Any utterance containing a vocabulary entry verbatim resolves to
        /// an entry by the substring stage, never falling through to fuzzy.
        #[test]
        fn prop_containment_always_resolves(
            prefix in "[a-z ]{0,10}",
            idx in 0..ROOMS.len(),
            suffix in "[a-z ]{0,10}",
        ) {
            let text = format!("{prefix}{}{suffix}", ROOMS[idx]);
            prop_assert!(resolve(&text, ROOMS).is_some());
        }

        /// Resolving an already-canonical room name returns itself (no room
        /// name is a substring of another, so stage one hits it exactly).
        #[test]
        fn prop_idempotent(idx in 0..ROOMS.len()) {
            let entry = ROOMS[idx];
            prop_assert_eq!(resolve(entry, ROOMS), Some(entry));
        }

        /// Never invents an entry outside the vocabulary.
        #[test]
        fn prop_result_is_from_vocabulary(text in "[a-z ]{0,30}") {
            if let Some(resolved) = resolve(&text, COLORS) {
                prop_assert!(COLORS.contains(&resolved));
            }
        }
    }
}
