//! Rule table extended with actions
//!
//! Linking happens once: every name token of the compiled grammar is
//! resolved to a rule id, an action id, or a marker for a missing name.
//! A grammar rule wins over an action with the same name, so a loosely
//! named action cannot shadow part of the grammar. Missing names are kept
//! and only reported when a parse reaches them.

use crate::actions::{Action, Actions};
use crate::grammar::{Grammar, Pattern, RuleId, Token};
use crate::value::Value;
use std::collections::HashMap;

pub type ActionId = usize;

/// A token with its name already resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Rule(RuleId),
    Action(ActionId),
    /// A name bound to neither; a grammar error once evaluated
    Missing(String),
    Regex(Pattern),
    Not(Box<Step>),
}

/// What a name refers to in an extended table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Rule(RuleId),
    Action(ActionId),
}

/// Compiled rules plus the actions they may call
#[derive(Debug, Clone)]
pub struct RuleTable<V = Value> {
    grammar: Grammar,
    bodies: Vec<Vec<Vec<Step>>>,
    actions: Vec<(String, Action<V>)>,
    action_index: HashMap<String, ActionId>,
}

impl<V> RuleTable<V> {
    /// Merge `actions` into `grammar`. Neither input is modified.
    pub fn extend(grammar: &Grammar, actions: &Actions<V>) -> Self {
        let mut named: Vec<_> = actions
            .iter()
            .filter(|(name, _)| !grammar.contains(name))
            .map(|(name, action)| (name.to_string(), action.clone()))
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));

        let action_index: HashMap<String, ActionId> = named
            .iter()
            .enumerate()
            .map(|(id, (name, _))| (name.clone(), id))
            .collect();

        let link_name = |name: &str| match grammar.rule_id(name) {
            Some(id) => Step::Rule(id),
            None => match action_index.get(name) {
                Some(&id) => Step::Action(id),
                None => Step::Missing(name.to_string()),
            },
        };

        let bodies = grammar
            .rules()
            .iter()
            .map(|rule| {
                rule.alternatives
                    .iter()
                    .map(|alt| alt.iter().map(|t| link(t, &link_name)).collect())
                    .collect()
            })
            .collect();

        Self {
            grammar: grammar.clone(),
            bodies,
            actions: named,
            action_index,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Resolve a name the same way a name token is resolved
    pub fn lookup(&self, name: &str) -> Option<Target> {
        self.grammar
            .rule_id(name)
            .map(Target::Rule)
            .or_else(|| self.action_index.get(name).map(|&id| Target::Action(id)))
    }

    pub fn alternatives(&self, id: RuleId) -> &[Vec<Step>] {
        &self.bodies[id]
    }

    pub fn rule_name(&self, id: RuleId) -> &str {
        &self.grammar.rule(id).name
    }

    pub fn action(&self, id: ActionId) -> (&str, &Action<V>) {
        let (name, action) = &self.actions[id];
        (name, action)
    }

    /// Names of actions that survived the merge, sorted
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(name, _)| name.as_str())
    }
}

fn link(token: &Token, link_name: &impl Fn(&str) -> Step) -> Step {
    match token {
        Token::Name(name) => link_name(name),
        Token::Regex(pattern) => Step::Regex(pattern.clone()),
        Token::Not(inner) => Step::Not(Box::new(link(inner, link_name))),
    }
}
