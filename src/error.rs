//! Error types for grammar compilation and parsing
//!
//! Grammar errors and parse failures are kept apart on purpose: a
//! [`GrammarError`] means the grammar (or the way it was linked to actions)
//! cannot produce a meaningful parser, while [`Unparsable`] is the ordinary
//! outcome of feeding it text it does not accept.

use std::fmt;

/// Errors caused by the grammar text or by references inside it
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// The grammar text contains no `name = ...` rule header at all
    NoRules,
    /// Text before the first rule header that is not whitespace
    MissingLeftHandSide(String),
    /// Rule names that are defined more than once, in declaration order
    DuplicateRules(Vec<String>),
    /// An identifier that names neither a rule nor an action
    MissingRule(String),
    /// A regex token the regex engine rejected
    InvalidPattern { token: String, message: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::NoRules => write!(f, "No grammar rules found"),
            GrammarError::MissingLeftHandSide(fragment) => {
                write!(f, "Missing left hand side before {:?}", fragment.trim())
            }
            GrammarError::DuplicateRules(names) => {
                write!(f, "Multiply-defined rule(s): {}", names.join(", "))
            }
            GrammarError::MissingRule(name) => write!(f, "Missing rule: {}", name),
            GrammarError::InvalidPattern { token, message } => {
                write!(f, "Invalid regex token {:?}: {}", token, message)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

/// No alternative of the start rule matched.
///
/// The input is split at the furthest offset any regex token reached during
/// the whole attempt, which is usually where the text stops making sense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unparsable {
    /// The rule the parse started from
    pub rule: String,
    /// Input up to the furthest offset reached
    pub consumed: String,
    /// Input from the furthest offset on
    pub remainder: String,
}

impl Unparsable {
    pub(crate) fn split(rule: &str, text: &str, utmost: usize) -> Self {
        // Peek actions may push the tracker anywhere
        let mut at = utmost.min(text.len());
        while !text.is_char_boundary(at) {
            at -= 1;
        }
        Self {
            rule: rule.to_string(),
            consumed: text[..at].to_string(),
            remainder: text[at..].to_string(),
        }
    }

    /// Byte offset where the parse got stuck
    pub fn offset(&self) -> usize {
        self.consumed.len()
    }
}

impl fmt::Display for Unparsable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot parse '{}': stopped after {:?} at {:?}",
            self.rule, self.consumed, self.remainder
        )
    }
}

impl std::error::Error for Unparsable {}

/// A caller-supplied action rejected the values it was applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionError {
    pub action: String,
    pub message: String,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action '{}' failed: {}", self.action, self.message)
    }
}

impl std::error::Error for ActionError {}

/// Everything a parse call can fail with
#[derive(Debug, Clone, PartialEq)]
pub enum PegError {
    Grammar(GrammarError),
    Unparsable(Unparsable),
    Action(ActionError),
    /// A single result was asked for but the parse produced a different number
    ResultCount(usize),
}

impl PegError {
    /// True for the ordinary "input did not match" outcome
    pub fn is_unparsable(&self) -> bool {
        matches!(self, PegError::Unparsable(_))
    }
}

impl fmt::Display for PegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PegError::Grammar(e) => write!(f, "Grammar error: {}", e),
            PegError::Unparsable(e) => write!(f, "Parse error: {}", e),
            PegError::Action(e) => write!(f, "Action error: {}", e),
            PegError::ResultCount(n) => write!(f, "Expected exactly one result, got {}", n),
        }
    }
}

impl std::error::Error for PegError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PegError::Grammar(e) => Some(e),
            PegError::Unparsable(e) => Some(e),
            PegError::Action(e) => Some(e),
            PegError::ResultCount(_) => None,
        }
    }
}

impl From<GrammarError> for PegError {
    fn from(err: GrammarError) -> Self {
        PegError::Grammar(err)
    }
}

impl From<Unparsable> for PegError {
    fn from(err: Unparsable) -> Self {
        PegError::Unparsable(err)
    }
}

impl From<ActionError> for PegError {
    fn from(err: ActionError) -> Self {
        PegError::Action(err)
    }
}
