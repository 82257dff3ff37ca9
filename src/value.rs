//! Parsing state and result values
//!
//! A parse threads an immutable [`State`] through every token: the current
//! byte offset plus the values accumulated so far. Regex captures append to
//! the values, actions replace them with a single value.
//!
//! The engine is generic over the value type. [`Value`] is the stock choice
//! and the default everywhere; hosts that need richer results (closures,
//! their own AST nodes) implement [`Capture`] for their own type.

use serde::Serialize;
use std::fmt;

/// Conversion from a regex capture group into a result value.
///
/// `None` is passed for an optional group that did not take part in the match.
pub trait Capture: Sized {
    fn from_capture(group: Option<&str>) -> Self;
}

/// A position in the input plus the values produced so far
#[derive(Debug, Clone, PartialEq)]
pub struct State<V = Value> {
    pub pos: usize,
    pub vals: Vec<V>,
}

impl<V: Clone> State<V> {
    /// An empty state at `pos`
    pub fn at(pos: usize) -> Self {
        Self {
            pos,
            vals: Vec::new(),
        }
    }

    /// Same values, new position
    pub fn advance(&self, pos: usize, captured: impl IntoIterator<Item = V>) -> Self {
        let mut vals = self.vals.clone();
        vals.extend(captured);
        Self { pos, vals }
    }

    /// The result of a nested rule appended onto this state
    pub fn append(&self, inner: &State<V>) -> Self {
        self.advance(inner.pos, inner.vals.iter().cloned())
    }

    /// Same position, values replaced by a single one
    pub fn replace(&self, value: V) -> Self {
        Self {
            pos: self.pos,
            vals: vec![value],
        }
    }
}

/// Stock result value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// An optional capture group that did not match
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl Capture for Value {
    fn from_capture(group: Option<&str>) -> Self {
        match group {
            Some(text) => Value::Str(text.to_string()),
            None => Value::Nil,
        }
    }
}

impl Capture for String {
    fn from_capture(group: Option<&str>) -> Self {
        group.unwrap_or_default().to_string()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }
}

/// Renders values the way they read in a grammar test: strings quoted,
/// tuples in parentheses with a trailing comma for singletons.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}
