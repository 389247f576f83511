// src/identifier.rs
//! Splits identifiers into lower-cased sub-word tokens on snake_case and
//! camelCase boundaries, e.g. `parse_JSON2Data` -> `parse json 2 data`.

use crate::cache::LruCache;
use crate::char_class::CharClass;

/// Default number of identifiers remembered by [`IdentifierTokenizer`].
pub const DEFAULT_CACHE_CAPACITY: usize = 5000;

/// Splits one underscore-free segment on case, digit and symbol transitions.
///
/// Tokens keep their original case. An uppercase run followed by a lowercase
/// letter gives its last capital to the new word (`XMLParser` -> `XML`, `Parser`).
pub fn split_camel_case(segment: &str) -> Vec<String> {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return Vec::new();
    };

    let mut result = Vec::new();
    let mut current = String::from(first);
    // `current` length in chars; only consulted while inside an uppercase run.
    let mut current_len = 1usize;
    let mut prev = CharClass::of(first);

    for c in chars {
        let class = CharClass::of(c);
        let new_upper_word = class.upper && !prev.upper;
        let new_digit_word = class.digit && !prev.digit;
        let new_special_word = class.special && !prev.special;

        if new_upper_word || new_digit_word || new_special_word {
            result.push(std::mem::take(&mut current));
            current.push(c);
            current_len = 1;
        } else if !class.upper && prev.upper && current_len > 1 {
            // Move the run's last capital over to the word starting here.
            let last = current.pop().unwrap_or(c);
            result.push(std::mem::take(&mut current));
            current.push(last);
            current.push(c);
            current_len = 2;
        } else if (!class.digit && prev.digit) || (!class.special && prev.special) {
            result.push(std::mem::take(&mut current));
            current.push(c);
            current_len = 1;
        } else {
            current.push(c);
            current_len += 1;
        }
        prev = class;
    }
    result.push(current);
    result
}

/// Splits an identifier into lower-cased parts on `_` and camelCase boundaries.
///
/// When nothing is left after splitting (empty or underscore-only input) the
/// identifier itself comes back unchanged as the only element, so the result
/// is never empty and not necessarily lower-case.
pub fn split_identifier_into_parts(identifier: &str) -> Vec<String> {
    let parts: Vec<String> = identifier
        .split('_')
        .filter(|segment| !segment.is_empty())
        .flat_map(split_camel_case)
        .map(|part| part.to_lowercase())
        .collect();

    if parts.is_empty() {
        return vec![identifier.to_string()];
    }
    parts
}

/// Memoizing front end for [`split_identifier_into_parts`].
///
/// The cache only saves work; outputs are identical with or without it.
#[derive(Debug)]
pub struct IdentifierTokenizer {
    cache: LruCache<String, Vec<String>>,
}

impl Default for IdentifierTokenizer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl IdentifierTokenizer {
    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
        }
    }

    pub fn tokenize(&mut self, identifier: &str) -> Vec<String> {
        if let Some(parts) = self.cache.get(identifier) {
            return parts;
        }
        let parts = split_identifier_into_parts(identifier);
        self.cache.put(identifier.to_string(), parts.clone());
        parts
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &LruCache<String, Vec<String>> {
        &self.cache
    }
}
