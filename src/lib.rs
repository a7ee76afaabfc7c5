//! Backtracking parser combinators, and a grammar for C++-like `.hcp` files built out of them.
//!
//! Rules are immutable [`Parser`] handles, composed with `+` (sequence),
//! `|` (ordered alternation) and `!` (negative lookahead), plus the free
//! functions in [`combinators`] and [`primitives`]. Attempting a rule at a
//! [`Cursor`] gives an [`Outcome`]: either the tree nodes it matched and where
//! it stopped, or a [`Failure`] that carries the leaf cause and a frame for
//! every enclosing rule it passed through.
//!
//! When alternatives all fail, the failure that got furthest into the input
//! is the one reported. This is a heuristic for which branch the author
//! probably meant, not a guarantee.
//!
//! Each top-level [`parse`] gets a fresh memo cache keyed by rule and offset,
//! which keeps deeply recursive grammars from going exponential. Caching never
//! changes what a parse produces.

#[macro_use]
extern crate derivative;

pub mod ast;
pub mod balanced;
pub mod combinators;
pub mod cursor;
pub mod display;
pub mod error;
pub mod grammar;
pub mod options;
pub mod outcome;
pub mod parse;
pub mod primitives;
pub mod rule;

pub use ast::{Composite, ItemKind, Node};
pub use cursor::{Cursor, Position};
pub use error::ParseError;
pub use options::Options;
pub use outcome::{Cause, Failure, Frame, Matched, Outcome};
pub use parse::{parse, parse_with};
pub use rule::{Kind, Parser, Rule, RuleId};
