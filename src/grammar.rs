//! Grammar compiler
//!
//! Turns the textual grammar notation into a rule table:
//!
//! ```text
//! one_expr = _ expr !.
//! _        = \s*
//! expr     = \( _ exprs \) _  hug
//!          | ([^()\s]+) _
//! exprs    = expr exprs
//!          |
//! ```
//!
//! Rules are separated by headers of the form `identifier = ` and may span
//! several lines. A body is split on standalone `|` into alternatives, and
//! each alternative on whitespace into tokens. An empty alternative is legal
//! and always succeeds without consuming anything.
//!
//! The header split is purely textual: a regex token that itself contains
//! `<identifier> = ` surrounded by whitespace is cut there as if a new rule
//! started. Write such regexes without the surrounding spaces (e.g. `[=]`).
//!
//! Names are not checked against the table here. A reference to an
//! undefined rule is reported when a parse first reaches it, which lets
//! rules and actions be supplied in any order.

pub mod pattern;
pub mod token;

use crate::error::GrammarError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use token::IDENTIFIER;

pub use pattern::{Pattern, PatternMatch};
pub use token::Token;

/// Name of the synthetic rule that refers to the first declared rule
pub const START: &str = "_start";

/// `<ws>name<ws>=<ws>`, matched against the grammar with a space prepended
static RULE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\s({})\s+=\s", IDENTIFIER)).unwrap());

/// A `|` standing alone between alternatives
static ALTERNATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s[|](?:\s|$)").unwrap());

/// Index of a rule in the table
pub type RuleId = usize;

/// An ordered sequence of tokens; the empty sequence matches trivially
pub type Alternative = Vec<Token>;

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    /// Tried in order, the first that succeeds wins
    pub alternatives: Vec<Alternative>,
}

/// A compiled rule table
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    rules: Vec<Rule>,
    index: HashMap<String, RuleId>,
}

impl Grammar {
    /// Compile grammar text into a rule table
    pub fn compile(text: &str) -> Result<Self, GrammarError> {
        let padded = format!(" {}", text);
        let headers: Vec<_> = RULE_HEADER.captures_iter(&padded).collect();

        let first = match headers.first() {
            Some(caps) => caps.get(0).map_or(0, |m| m.start()),
            None if padded.trim().is_empty() => return Err(GrammarError::NoRules),
            None => padded.len(),
        };
        let leading = &padded[..first];
        if !leading.trim().is_empty() {
            return Err(GrammarError::MissingLeftHandSide(leading.to_string()));
        }

        let mut sections = Vec::with_capacity(headers.len());
        for (i, caps) in headers.iter().enumerate() {
            let (Some(header), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let body_end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(padded.len(), |m| m.start());
            sections.push((name.as_str(), &padded[header.end()..body_end]));
        }

        check_unique(sections.iter().map(|(name, _)| *name))?;

        let mut rules = Vec::with_capacity(sections.len() + 1);
        for (name, body) in &sections {
            rules.push(Rule {
                name: name.to_string(),
                alternatives: compile_body(body)?,
            });
        }

        let first_rule = sections[0].0.to_string();
        let mut grammar = Self {
            rules,
            index: HashMap::new(),
        };
        grammar.define_start(first_rule);
        grammar.reindex();

        log::debug!(
            "compiled grammar with {} rules, starting at '{}'",
            sections.len(),
            sections[0].0
        );
        Ok(grammar)
    }

    /// Add the `_start` rule, replacing a user-written one
    fn define_start(&mut self, first_rule: String) {
        let start = Rule {
            name: START.to_string(),
            alternatives: vec![vec![Token::Name(first_rule)]],
        };
        match self.rules.iter_mut().find(|r| r.name == START) {
            Some(existing) => *existing = start,
            None => self.rules.push(start),
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .rules
            .iter()
            .enumerate()
            .map(|(id, rule)| (rule.name.clone(), id))
            .collect();
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id]
    }

    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rule_id(name).map(|id| self.rule(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rule names in declaration order, `_start` last
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.name.as_str())
    }

    /// The rule `_start` refers to
    pub fn first_rule(&self) -> &str {
        self.get(START)
            .and_then(|start| start.alternatives.first())
            .and_then(|alt| alt.first())
            .and_then(Token::name)
            .unwrap_or(START)
    }
}

fn compile_body(body: &str) -> Result<Vec<Alternative>, GrammarError> {
    ALTERNATION
        .split(body)
        .map(|alt| {
            alt.split_whitespace()
                .map(Token::classify)
                .collect::<Result<Alternative, _>>()
        })
        .collect()
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), GrammarError> {
    let mut seen = HashSet::new();
    let mut repeated: Vec<String> = Vec::new();
    for name in names {
        if !seen.insert(name) && !repeated.iter().any(|r| r == name) {
            repeated.push(name.to_string());
        }
    }
    if repeated.is_empty() {
        Ok(())
    } else {
        Err(GrammarError::DuplicateRules(repeated))
    }
}
