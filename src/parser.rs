//! Top-level parse driver
//!
//! A [`Parser`] owns an extended rule table and runs one packrat parse per
//! call. Nothing survives between calls: every call gets a fresh memo and a
//! fresh furthest-position tracker, so one parser can be shared across
//! threads and used concurrently.
//!
//! A parse only needs to match a prefix of the input. Grammars that must
//! consume everything end with `!.` or `$`.

use crate::actions::Actions;
use crate::error::{GrammarError, PegError, Unparsable};
use crate::grammar::{Grammar, Rule, START};
use crate::interpreter::{Interpreter, Memo, Utmost};
use crate::table::{RuleTable, Target};
use crate::value::{Capture, Value};
use serde::Deserialize;

/// Per-call knobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Rule to start from, `_start` (the first declared rule) when unset
    pub start: Option<String>,
    /// Memoize (rule, position) results. Turning this off only costs time.
    pub memoize: bool,
}

impl ParseOptions {
    pub fn start(rule: impl Into<String>) -> Self {
        Self {
            start: Some(rule.into()),
            ..Self::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            start: None,
            memoize: true,
        }
    }
}

/// A compiled grammar bound to its actions
#[derive(Debug, Clone)]
pub struct Parser<V = Value> {
    table: RuleTable<V>,
}

impl<V: Capture + Clone> Parser<V> {
    /// Compile `grammar` and attach `actions`
    pub fn new(grammar: &str, actions: Actions<V>) -> Result<Self, GrammarError> {
        let grammar = Grammar::compile(grammar)?;
        Ok(Self::from_grammar(&grammar, &actions))
    }

    pub fn from_grammar(grammar: &Grammar, actions: &Actions<V>) -> Self {
        Self {
            table: RuleTable::extend(grammar, actions),
        }
    }

    pub fn table(&self) -> &RuleTable<V> {
        &self.table
    }

    /// Compiled rules in declaration order, `_start` last
    pub fn rules(&self) -> &[Rule] {
        self.table.grammar().rules()
    }

    /// Parse a prefix of `text` starting from the first declared rule
    pub fn parse(&self, text: &str) -> Result<Vec<V>, PegError> {
        self.parse_with(text, &ParseOptions::default())
    }

    /// Parse a prefix of `text` starting from `rule`
    pub fn parse_rule(&self, text: &str, rule: &str) -> Result<Vec<V>, PegError> {
        self.parse_with(text, &ParseOptions::start(rule))
    }

    pub fn parse_with(&self, text: &str, options: &ParseOptions) -> Result<Vec<V>, PegError> {
        let start = options.start.as_deref().unwrap_or(START);
        let id = match self.table.lookup(start) {
            Some(Target::Rule(id)) => id,
            _ => return Err(GrammarError::MissingRule(start.to_string()).into()),
        };

        let memo = if options.memoize {
            Memo::new()
        } else {
            Memo::disabled()
        };
        let mut interpreter = Interpreter::new(&self.table, text, memo);
        let mut utmost = Utmost::new();

        match interpreter.resolve_rule(id, &mut utmost, 0)? {
            Some(st) => Ok(st.vals),
            None => {
                // Failures name the rule the caller thinks of as the start
                let rule = if start == START {
                    self.table.grammar().first_rule()
                } else {
                    start
                };
                log::debug!(
                    "parse from '{}' failed, furthest offset {} of {}",
                    rule,
                    utmost.get(),
                    text.len()
                );
                Err(Unparsable::split(rule, text, utmost.get()).into())
            }
        }
    }

    /// Like [`Parser::parse`], but an ordinary parse failure is `Ok(None)`
    pub fn attempt(&self, text: &str) -> Result<Option<Vec<V>>, PegError> {
        match self.parse(text) {
            Ok(vals) => Ok(Some(vals)),
            Err(PegError::Unparsable(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Parse and require exactly one result value
    pub fn parse_one(&self, text: &str) -> Result<V, PegError> {
        let mut vals = self.parse(text)?;
        match vals.len() {
            1 => Ok(vals.remove(0)),
            n => Err(PegError::ResultCount(n)),
        }
    }
}
