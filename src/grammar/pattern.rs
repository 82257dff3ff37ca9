//! Anchored regex matching for regex tokens
//!
//! A regex token always matches at the current position, never further
//! along. The pattern is wrapped as `^(?:...)` and run against the remaining
//! suffix of the input, so anchors and word boundaries see that suffix the
//! same way the grammar author sees the text "from here on".
//!
//! ## Example
//!
//! ```text
//! Token:    (\w+)
//! Input:    "hello world", position 6
//! Suffix:   "world"
//! Result:   length 5, captures ["world"]
//! ```

use crate::error::GrammarError;
use crate::value::Capture;
use regex::Regex;
use std::fmt;

/// Result of matching a pattern at one position
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch<'t> {
    /// Number of bytes consumed from the match position
    pub len: usize,

    /// Each capture group in order, `None` when an optional group did not take part
    pub captures: Vec<Option<&'t str>>,
}

impl<'t> PatternMatch<'t> {
    /// Convert the capture groups into result values
    pub fn values<V: Capture>(&self) -> impl Iterator<Item = V> + '_ {
        self.captures.iter().map(|group| V::from_capture(*group))
    }
}

/// A compiled regex token
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` into an anchored matcher
    ///
    /// `token` is the grammar token the pattern came from, kept for error messages.
    pub fn new(token: &str, source: &str) -> Result<Self, GrammarError> {
        let regex = Regex::new(&format!("^(?:{})", source)).map_err(|e| {
            GrammarError::InvalidPattern {
                token: token.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Match at byte offset `pos` of `text`
    pub fn match_at<'t>(&self, text: &'t str, pos: usize) -> Option<PatternMatch<'t>> {
        let rest = text.get(pos..)?;
        let caps = self.regex.captures(rest)?;
        let len = caps.get(0).map_or(0, |m| m.end());

        // Group 0 is the whole match, the token's own groups start at 1
        let captures = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str()))
            .collect();

        Some(PatternMatch { len, captures })
    }

    /// The regex source as written in the grammar, without the `/` marker
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of capture groups the token appends on success
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
