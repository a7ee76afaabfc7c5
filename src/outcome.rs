//! What attempting a rule produces: matched nodes, or a failure with its chain of causes.

use std::{borrow::Borrow, sync::Arc};

use itertools::Itertools;
use thiserror::Error;

use crate::{
    ast::Node,
    cursor::Cursor,
    display::{CharFmt, CharSetFmt},
    rule::Parser,
};

/// The result of one attempt.
pub type Outcome<'a> = Result<Matched<'a>, Failure<'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<'a> {
    /// Produced siblings, in source order. May be empty.
    pub nodes: Vec<Node<'a>>,
    pub next: Cursor<'a>,
}

impl<'a> Matched<'a> {
    pub fn new(nodes: Vec<Node<'a>>, next: Cursor<'a>) -> Self {
        Self { nodes, next }
    }

    /// Success that consumes and produces nothing.
    pub fn empty(at: Cursor<'a>) -> Self {
        Self {
            nodes: Vec::new(),
            next: at,
        }
    }

    /// A single text leaf from `start` up to `next`.
    pub fn text(start: Cursor<'a>, next: Cursor<'a>) -> Self {
        Self {
            nodes: vec![Node::text_between(start, next)],
            next,
        }
    }
}

/// Why the innermost rule gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Cause {
    #[error("end of input")]
    EndOfInput,
    #[error("expected '{}' but found '{}'", ch(.expected), ch(.found))]
    Mismatch { expected: u8, found: u8 },
    #[error("'{}' is not one of chars [{}]", ch(.found), set(.chars))]
    NotOneOf { found: u8, chars: Arc<[u8]> },
    #[error("'{}' is one of [{}]", ch(.found), set(.chars))]
    OneOf { found: u8, chars: Arc<[u8]> },
    #[error("'{}' is not one of chars '{}'..'{}'", ch(.found), ch(.min), ch(.max))]
    NotInRange { found: u8, min: u8, max: u8 },
    #[error("expected parse failure")]
    ExpectedParseFailure,
    #[error("expected end of input, not '{}'", ch(.found))]
    NotEndOfInput { found: u8 },
    #[error("{0}")]
    Fixed(&'static str),
    #[error("{0}")]
    Other(String),
}

fn ch(b: impl Borrow<u8>) -> CharFmt {
    CharFmt(*b.borrow())
}

fn set(chars: &Arc<[u8]>) -> CharSetFmt<'_> {
    CharSetFmt(chars)
}

/// A rule that was being attempted when a failure passed through it.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub rule: Parser,
    pub at: Cursor<'a>,
}

impl Frame<'_> {
    pub fn description(&self) -> &str {
        self.rule.description()
    }
}

#[derive(Debug, Clone)]
pub struct Failure<'a> {
    pub cause: Cause,
    /// Where the leaf cause happened.
    pub at: Cursor<'a>,
    /// Innermost first. Only ever pushed onto as the failure travels outwards.
    pub context: Vec<Frame<'a>>,
    /// Nodes matched before running out of input, kept only when
    /// `Options::partial_at_end` asks for them.
    pub partial: Vec<Node<'a>>,
}

impl<'a> Failure<'a> {
    pub fn new(cause: Cause, at: Cursor<'a>) -> Self {
        Self {
            cause,
            at,
            context: Vec::new(),
            partial: Vec::new(),
        }
    }

    pub fn end_of_input(at: Cursor<'a>) -> Self {
        Self::new(Cause::EndOfInput, at)
    }

    pub fn is_end_of_input(&self) -> bool {
        self.cause == Cause::EndOfInput
    }

    pub fn with_frame(mut self, rule: Parser, at: Cursor<'a>) -> Self {
        self.context.push(Frame { rule, at });
        self
    }

    /// Prepend nodes matched before this failure, for end-of-input reporting.
    pub fn with_partial(mut self, mut before: Vec<Node<'a>>) -> Self {
        before.append(&mut self.partial);
        self.partial = before;
        self
    }

    /// Human-readable explanation, outermost rule first and the leaf cause last.
    pub fn message(&self) -> String {
        let leaf = format!("{}: {}", self.at, self.cause);
        if self.context.is_empty() {
            return leaf;
        }
        let frames = self
            .context
            .iter()
            .rev()
            .map(|frame| format!("{}: failed to parse {}", frame.at, frame.description()))
            .join(" because\n  ");
        format!("{} because\n  {}", frames, leaf)
    }
}

impl PartialEq for Failure<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cause == other.cause
            && self.at == other.at
            && self.partial == other.partial
            && self.context.len() == other.context.len()
            && self
                .context
                .iter()
                .zip(&other.context)
                .all(|(a, b)| a.at == b.at && a.rule.id() == b.rule.id())
    }
}

impl Eq for Failure<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::literal;

    #[test]
    fn cause_wording() {
        let chars: Arc<[u8]> = Arc::from(&b"ba"[..]);
        assert_eq!(
            Cause::Mismatch {
                expected: b'w',
                found: b'g'
            }
            .to_string(),
            "expected 'w' but found 'g'"
        );
        assert_eq!(
            Cause::NotOneOf {
                found: b'c',
                chars: chars.clone()
            }
            .to_string(),
            "'c' is not one of chars [ab]"
        );
        assert_eq!(
            Cause::OneOf { found: b'a', chars }.to_string(),
            "'a' is one of [ab]"
        );
        assert_eq!(
            Cause::NotInRange {
                found: b'\t',
                min: b'a',
                max: b'z'
            }
            .to_string(),
            "'\\t' is not one of chars 'a'..'z'"
        );
        assert_eq!(
            Cause::NotEndOfInput { found: b'\n' }.to_string(),
            "expected end of input, not '\\n'"
        );
    }

    #[test]
    fn message_lists_outermost_first() {
        let text = "abc";
        let start = Cursor::from(text);
        let inner = literal("ab");
        let outer = literal("abd");
        let failure = Failure::new(Cause::EndOfInput, start.advance_by(3))
            .with_frame(inner, start.advance())
            .with_frame(outer, start);
        assert_eq!(
            failure.message(),
            "<line 1, col 1>: failed to parse \"abd\" because\n  \
             <line 1, col 2>: failed to parse \"ab\" because\n  \
             <line 1, col 4>: end of input"
        );
    }

    #[test]
    fn partial_nodes_are_prepended() {
        let text = "xy";
        let start = Cursor::from(text);
        let x = Node::text_between(start, start.advance());
        let y = Node::text_between(start.advance(), start.advance_by(2));
        let failure = Failure::end_of_input(start.advance_by(2))
            .with_partial(vec![y.clone()])
            .with_partial(vec![x.clone()]);
        assert_eq!(failure.partial, vec![x, y]);
        assert!(failure.is_end_of_input());
    }
}
