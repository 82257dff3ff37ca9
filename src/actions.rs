//! Semantic actions
//!
//! An action is bound to a name by the host program, never by the grammar
//! text. When a token naming an action is reached, the values accumulated
//! so far in the current alternative are handed to it and replaced by the
//! single value it returns.
//!
//! A second kind, the peek action, gets the raw input, the furthest-position
//! tracker and the current state, and returns the next state itself. It is
//! meant for zero-width helpers such as [`position`].

use crate::interpreter::Utmost;
use crate::value::{State, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ApplyFn<V> = dyn Fn(&[V]) -> Result<V, String> + Send + Sync;
type PeekFn<V> = dyn Fn(&str, &mut Utmost, &State<V>) -> Option<State<V>> + Send + Sync;

/// A callable the grammar can refer to by name
pub enum Action<V = Value> {
    /// Replace the accumulated values with one value
    Apply(Arc<ApplyFn<V>>),
    /// Compute the next state directly
    Peek(Arc<PeekFn<V>>),
}

impl<V: 'static> Action<V> {
    /// An action that always succeeds
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[V]) -> V + Send + Sync + 'static,
    {
        Action::Apply(Arc::new(move |vals: &[V]| Ok(f(vals))))
    }

    /// An action that may reject its input with a message
    pub fn fallible<F>(f: F) -> Self
    where
        F: Fn(&[V]) -> Result<V, String> + Send + Sync + 'static,
    {
        Action::Apply(Arc::new(f))
    }

    /// An action that only accepts exactly `arity` values
    pub fn with_arity<F>(arity: usize, f: F) -> Self
    where
        F: Fn(&[V]) -> V + Send + Sync + 'static,
    {
        Action::fallible(move |vals: &[V]| {
            if vals.len() == arity {
                Ok(f(vals))
            } else {
                Err(format!("expected {} values, got {}", arity, vals.len()))
            }
        })
    }

    /// A zero-width or state-rewriting helper with access to the tracker
    ///
    /// The tracker reads as the furthest offset of the whole parse so far,
    /// however deeply the action sits inside rule references.
    pub fn peek<F>(f: F) -> Self
    where
        F: Fn(&str, &mut Utmost, &State<V>) -> Option<State<V>> + Send + Sync + 'static,
    {
        Action::Peek(Arc::new(f))
    }
}

impl<V> Clone for Action<V> {
    fn clone(&self) -> Self {
        match self {
            Action::Apply(f) => Action::Apply(Arc::clone(f)),
            Action::Peek(f) => Action::Peek(Arc::clone(f)),
        }
    }
}

impl<V> fmt::Debug for Action<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Apply(_) => write!(f, "Action::Apply(..)"),
            Action::Peek(_) => write!(f, "Action::Peek(..)"),
        }
    }
}

/// Actions by name
pub struct Actions<V = Value> {
    by_name: HashMap<String, Action<V>>,
}

impl<V> Actions<V> {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Register an action, replacing any earlier one with the same name
    pub fn insert(&mut self, name: impl Into<String>, action: Action<V>) {
        self.by_name.insert(name.into(), action);
    }

    /// Builder form of [`Actions::insert`]
    pub fn with(mut self, name: impl Into<String>, action: Action<V>) -> Self {
        self.insert(name, action);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Action<V>> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Action<V>)> {
        self.by_name.iter().map(|(name, action)| (name.as_str(), action))
    }
}

impl<V> Default for Actions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for Actions<V> {
    fn clone(&self) -> Self {
        Self {
            by_name: self.by_name.clone(),
        }
    }
}

impl<V> fmt::Debug for Actions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.by_name.keys().collect();
        names.sort();
        f.debug_struct("Actions").field("names", &names).finish()
    }
}

impl Actions<Value> {
    /// `hug`, `join` and `position`
    pub fn stock() -> Self {
        Actions::new()
            .with("hug", hug())
            .with("join", join())
            .with("position", position())
    }
}

/// Pack all values into one tuple
pub fn hug() -> Action<Value> {
    Action::new(|vals: &[Value]| Value::Tuple(vals.to_vec()))
}

/// Concatenate string values
pub fn join() -> Action<Value> {
    Action::fallible(|vals: &[Value]| {
        let mut joined = String::new();
        for v in vals {
            match v {
                Value::Str(s) => joined.push_str(s),
                other => return Err(format!("can only join strings, got {}", other)),
            }
        }
        Ok(Value::Str(joined))
    })
}

/// Append the current byte offset without consuming input
pub fn position() -> Action<Value> {
    Action::peek(|_text: &str, _utmost: &mut Utmost, st: &State<Value>| {
        Some(st.advance(st.pos, [Value::Int(st.pos as i64)]))
    })
}
