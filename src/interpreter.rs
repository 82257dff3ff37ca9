//! Packrat interpreter
//!
//! Evaluates a linked [`RuleTable`] against input text by recursive descent:
//!
//! 1. A rule tries its alternatives in declaration order and commits to the
//!    first one that succeeds (ordered choice).
//! 2. An alternative is a sequence; it fails as soon as one token fails.
//! 3. Each (rule, position) result is memoized for the rest of the parse.
//! 4. Regex matches push the furthest-position tracker forward, which is
//!    what a failed parse reports.
//!
//! Left recursion is not supported: a rule that reaches itself at the same
//! position without consuming input recurses until the stack runs out.

use crate::actions::Action;
use crate::error::{ActionError, GrammarError, PegError};
use crate::grammar::RuleId;
use crate::table::{RuleTable, Step};
use crate::value::{Capture, State};
use std::collections::HashMap;

/// Rightmost offset any regex token has matched up to
///
/// A rule is derived on a tracker that starts from its caller's value, so
/// [`get`](Utmost::get) always reports the reach of the whole parse so far.
/// Progress made inside the rule is also kept apart, since that is the part
/// a memo entry replays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utmost {
    inherited: usize,
    own: usize,
}

impl Utmost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that input up to `pos` was matched
    pub fn reach(&mut self, pos: usize) {
        self.own = self.own.max(pos);
    }

    pub fn get(&self) -> usize {
        self.inherited.max(self.own)
    }

    /// A tracker for a nested derivation, starting where this one stands
    fn nested(&self) -> Self {
        Self {
            inherited: self.get(),
            own: 0,
        }
    }

    /// Reach recorded on this tracker itself
    fn own(&self) -> usize {
        self.own
    }
}

struct Entry<V> {
    result: Option<State<V>>,
    /// Furthest offset reached while deriving this entry
    reach: usize,
}

/// Results per (rule, start position), scoped to one parse call
pub struct Memo<V> {
    entries: HashMap<(RuleId, usize), Entry<V>>,
    enabled: bool,
    hits: usize,
}

impl<V> Memo<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            enabled: true,
            hits: 0,
        }
    }

    /// A memo that never stores anything; every rule is derived afresh
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered from the table
    pub fn hits(&self) -> usize {
        self.hits
    }
}

impl<V> Default for Memo<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One parse call's worth of evaluation state
pub struct Interpreter<'a, V> {
    table: &'a RuleTable<V>,
    text: &'a str,
    memo: Memo<V>,
}

impl<'a, V: Capture + Clone> Interpreter<'a, V> {
    pub fn new(table: &'a RuleTable<V>, text: &'a str, memo: Memo<V>) -> Self {
        Self { table, text, memo }
    }

    pub fn memo(&self) -> &Memo<V> {
        &self.memo
    }

    /// Evaluate one step from `st`. `Ok(None)` is an ordinary failure.
    pub fn evaluate(
        &mut self,
        step: &Step,
        utmost: &mut Utmost,
        st: &State<V>,
    ) -> Result<Option<State<V>>, PegError> {
        match step {
            Step::Rule(id) => {
                let inner = self.resolve_rule(*id, utmost, st.pos)?;
                Ok(inner.map(|inner| st.append(&inner)))
            }
            Step::Action(id) => self.apply(*id, utmost, st),
            Step::Missing(name) => Err(GrammarError::MissingRule(name.clone()).into()),
            Step::Not(inner) => {
                // Whatever the probe reaches is speculative and must not show
                // up in the reported failure position
                let mut scratch = Utmost::new();
                let probe = State::at(st.pos);
                match self.evaluate(inner, &mut scratch, &probe)? {
                    Some(_) => Ok(None),
                    None => Ok(Some(st.clone())),
                }
            }
            Step::Regex(pattern) => Ok(pattern.match_at(self.text, st.pos).map(|m| {
                let end = st.pos + m.len;
                utmost.reach(end);
                st.advance(end, m.values::<V>())
            })),
        }
    }

    fn apply(
        &mut self,
        id: usize,
        utmost: &mut Utmost,
        st: &State<V>,
    ) -> Result<Option<State<V>>, PegError> {
        let table = self.table;
        let (name, action) = table.action(id);
        match action {
            Action::Apply(f) => {
                let value = f(&st.vals).map_err(|message| ActionError {
                    action: name.to_string(),
                    message,
                })?;
                Ok(Some(st.replace(value)))
            }
            Action::Peek(f) => Ok(f(self.text, utmost, st)),
        }
    }

    /// Result of rule `id` starting at `pos`, with values relative to that rule
    pub fn resolve_rule(
        &mut self,
        id: RuleId,
        utmost: &mut Utmost,
        pos: usize,
    ) -> Result<Option<State<V>>, PegError> {
        if self.memo.enabled {
            if let Some(entry) = self.memo.entries.get(&(id, pos)) {
                log::trace!("memo hit for '{}' at {}", self.table.rule_name(id), pos);
                self.memo.hits += 1;
                utmost.reach(entry.reach);
                return Ok(entry.result.clone());
            }
        }

        let mut local = utmost.nested();
        let result = self.derive(id, &mut local, pos)?;
        utmost.reach(local.own());

        if self.memo.enabled {
            self.memo.entries.insert(
                (id, pos),
                Entry {
                    result: result.clone(),
                    reach: local.own(),
                },
            );
        }
        Ok(result)
    }

    fn derive(
        &mut self,
        id: RuleId,
        utmost: &mut Utmost,
        pos: usize,
    ) -> Result<Option<State<V>>, PegError> {
        let table = self.table;
        for alternative in table.alternatives(id) {
            if let Some(st) = self.sequence(alternative, utmost, pos)? {
                return Ok(Some(st));
            }
        }
        Ok(None)
    }

    fn sequence(
        &mut self,
        steps: &[Step],
        utmost: &mut Utmost,
        pos: usize,
    ) -> Result<Option<State<V>>, PegError> {
        let mut st = State::at(pos);
        for step in steps {
            match self.evaluate(step, utmost, &st)? {
                Some(next) => st = next,
                None => return Ok(None),
            }
        }
        Ok(Some(st))
    }
}
