//! # peglite
//!
//! A small packrat PEG engine. Grammars are plain text:
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
//! Each rule is a list of alternatives tried in order; each alternative is a
//! whitespace-separated sequence of tokens:
//!
//! - a regex, matched at the current position; its capture groups become values
//! - a rule name, parsed recursively
//! - an action name, bound by the host, which folds the values so far into one
//! - `!token`, which succeeds without consuming input iff `token` fails
//!
//! A token that looks like an identifier is always a name. To write a regex
//! that looks like one, prefix it with `/` (`/foo`).
//!
//! Parsing returns the accumulated values, or an [`Unparsable`] error that
//! splits the input at the furthest point any regex reached.
//!
//! File Layout
//!
//! src/
//!   ├── grammar       Text to rule table (header split, tokens, regex patterns)
//!   ├── table         Rule table linked with actions
//!   ├── interpreter   Memoized recursive descent
//!   ├── parser        Per-call driver and options
//!   ├── actions       Host callables and the stock `hug`, `join`, `position`
//!   ├── value         Parse state and result values
//!   └── error         Grammar errors vs. parse failures

#![allow(rustdoc::invalid_html_tags)]

pub mod actions;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod parser;
pub mod table;
pub mod value;

pub use actions::{hug, join, position, Action, Actions};
pub use error::{ActionError, GrammarError, PegError, Unparsable};
pub use grammar::{Grammar, START};
pub use interpreter::Utmost;
pub use parser::{ParseOptions, Parser};
pub use value::{Capture, State, Value};
