//! Look string parsing
//!
//! A look is a compact textual descriptor selecting which figure sets and
//! colors compose an avatar, e.g. `hd-180-1.hr-828-45.ch-210-66`. Segments
//! are dot-separated; within a segment the tokens are hyphen-separated:
//! set type, set id, then an ordered list of color ids.
//!
//! Parsing is permissive by omission: numeric tokens that fail to parse
//! become `None` and are treated as "no match" by every downstream table
//! lookup instead of rejecting the look.

use std::collections::HashMap;

/// One parsed look segment: the chosen set and its ordered color ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookEntry {
    /// Selected set id, `None` when the token was missing or non-numeric.
    pub set_id: Option<i32>,
    /// Ordered color ids; unparsable tokens are kept as `None` so that
    /// color resolution can drop them without shifting valid entries early.
    pub color_ids: Vec<Option<i32>>,
}

/// A parsed look: set-type code mapped to its selection.
pub type Look = HashMap<String, LookEntry>;

fn parse_id(token: Option<&str>) -> Option<i32> {
    token.and_then(|t| t.parse().ok())
}

/// Parse a look string into its selection map.
///
/// Segments with an empty leading token are skipped. Later segments with a
/// duplicate set type replace earlier ones, matching map insertion.
pub fn parse_look(look: &str) -> Look {
    let mut parsed = Look::new();

    for segment in look.split('.') {
        let mut tokens = segment.split('-');

        let set_type = match tokens.next() {
            Some(t) if !t.is_empty() => t,
            _ => continue,
        };

        parsed.insert(
            set_type.to_string(),
            LookEntry {
                set_id: parse_id(tokens.next()),
                color_ids: tokens.map(|t| parse_id(Some(t))).collect(),
            },
        );
    }

    parsed
}
