//! Free-text search across text fields.
//!
//! Terms match as literal substrings, ignoring case. Regex metacharacters in
//! the term carry no meaning: `a.c` matches `"A.C"` but not `"abc"`.

use regex::{Regex, RegexBuilder};

/// Accessor extracting an optional text value from a record.
pub type FieldSelector<T> = for<'a> fn(&'a T) -> Option<&'a str>;

/// A compiled, case-insensitive literal search term.
#[derive(Debug, Clone)]
pub struct SearchPattern {
    term: String,
    matcher: Matcher,
}

// Compiled program budget for a single term. Large enough that only
// pathological input fails to compile.
const PATTERN_SIZE_LIMIT: usize = 1 << 28;

#[derive(Debug, Clone)]
enum Matcher {
    Regex(Regex),
    // The term did not compile; nothing matches.
    Nothing,
}

impl SearchPattern {
    /// Compiles a search term. Returns `None` for an absent or empty term.
    ///
    /// Whitespace is significant: `" "` is a real term.
    pub fn new(term: Option<&str>) -> Option<SearchPattern> {
        let term = term.filter(|t| !t.is_empty())?;
        Some(SearchPattern::compile(term, PATTERN_SIZE_LIMIT))
    }

    fn compile(term: &str, size_limit: usize) -> SearchPattern {
        let matcher = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
        {
            Ok(regex) => Matcher::Regex(regex),
            Err(err) => {
                tracing::warn!(
                    %err,
                    term_len = term.len(),
                    "search term not compiled, matching nothing"
                );
                Matcher::Nothing
            }
        };
        SearchPattern {
            term: term.to_string(),
            matcher,
        }
    }

    /// The term as given.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns `true` if `text` contains the term.
    ///
    /// Case is compared with Unicode simple case folding, so `σ`, `ς` and
    /// `Σ` are all the same letter.
    pub fn is_match(&self, text: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(text),
            Matcher::Nothing => false,
        }
    }

    /// Returns `true` if any selector yields text containing the term.
    ///
    /// Selectors yielding `None` are skipped.
    pub fn matches_any<T>(&self, item: &T, fields: &[FieldSelector<T>]) -> bool {
        fields
            .iter()
            .filter_map(|select| select(item))
            .any(|text| self.is_match(text))
    }
}
