//! Query routing: smalltalk, grounded, or general
//!
//! Smalltalk is decided from the text alone, before any retrieval. Matching is
//! case-insensitive and prefix based, so a question that merely starts with a
//! greeting phrase ("how are you planning to ...") is also treated as
//! smalltalk. That over-match is kept deliberately and covered by tests.

use crate::types::QueryRoute;

/// Greetings, farewells, thanks and check-ins
pub const SMALLTALK_PHRASES: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "yo",
    "hola",
    "namaste",
    "sup",
    "bye",
    "goodbye",
    "see ya",
    "cya",
    "see you",
    "thanks",
    "thank you",
    "how are you",
    "what's up",
    "whats up",
    "good night",
    "good morning",
    "good afternoon",
];

/// Whether the lowercased, trimmed query equals or starts with a smalltalk phrase
pub fn is_smalltalk(query: &str) -> bool {
    let q = query.trim().to_lowercase();
    SMALLTALK_PHRASES
        .iter()
        .any(|phrase| q == *phrase || q.starts_with(phrase))
}

/// Routes queries between the three prompt templates
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryRouter;

impl QueryRouter {
    /// Route decided before retrieval: `Some(Smalltalk)` or `None` (retrieve first)
    pub fn pre_route(&self, query: &str) -> Option<QueryRoute> {
        is_smalltalk(query).then_some(QueryRoute::Smalltalk)
    }

    /// Route after relevance filtering
    pub fn route_retrieved(&self, relevant: usize) -> QueryRoute {
        if relevant > 0 {
            QueryRoute::Grounded
        } else {
            QueryRoute::General
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smalltalk_is_case_insensitive_and_prefix_based() {
        assert!(is_smalltalk("Hello there!"));
        assert!(is_smalltalk("hey"));
        assert!(is_smalltalk("  THANKS  "));
        assert!(is_smalltalk("Thank you so much"));
    }

    #[test]
    fn test_prefix_rule_over_matches() {
        assert!(is_smalltalk("hello world problem statement"));
        assert!(is_smalltalk("how are you planning to handle retries?"));
        // "hi" is a prefix of "history"
        assert!(is_smalltalk("history of the project"));
    }

    #[test]
    fn test_questions_are_not_smalltalk() {
        assert!(!is_smalltalk("What color is the sky?"));
        assert!(!is_smalltalk("asdlkfjasldkfj nonsense query"));
        assert!(!is_smalltalk(""));
    }

    #[test]
    fn test_routes() {
        let router = QueryRouter;
        assert_eq!(router.pre_route("thanks"), Some(QueryRoute::Smalltalk));
        assert_eq!(router.pre_route("What color is the sky?"), None);
        assert_eq!(router.route_retrieved(2), QueryRoute::Grounded);
        assert_eq!(router.route_retrieved(0), QueryRoute::General);
    }
}
