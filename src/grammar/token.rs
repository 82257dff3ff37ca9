//! Grammar tokens
//!
//! Every whitespace-separated word on the right hand side of a rule is
//! classified once, when the grammar is compiled:
//!
//! - `!tok`        negation of `tok`
//! - `identifier`  a reference to a rule or an action, resolved later
//! - anything else a regex; a leading `/` marks a regex explicitly and is dropped

use super::pattern::Pattern;
use crate::error::GrammarError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier syntax shared by rule names, action names and rule headers
pub const IDENTIFIER: &str = r"[A-Za-z_]\w*";

static WHOLE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", IDENTIFIER)).unwrap());

/// True if `word` has identifier syntax as a whole
pub fn is_identifier(word: &str) -> bool {
    WHOLE_IDENTIFIER.is_match(word)
}

/// One token of an alternative
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A rule or action name
    Name(String),
    /// A regex matched at the current position
    Regex(Pattern),
    /// Succeeds without consuming input iff the inner token fails
    Not(Box<Token>),
}

impl Token {
    /// Classify a single grammar word
    pub fn classify(word: &str) -> Result<Self, GrammarError> {
        if let Some(inner) = word.strip_prefix('!') {
            return Ok(Token::Not(Box::new(Token::classify(inner)?)));
        }
        if is_identifier(word) {
            return Ok(Token::Name(word.to_string()));
        }
        let source = match word.strip_prefix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => word,
        };
        Ok(Token::Regex(Pattern::new(word, source)?))
    }

    /// Names this token refers to, including those under negations
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Name(name) => Some(name),
            Token::Regex(_) => None,
            Token::Not(inner) => inner.name(),
        }
    }
}
