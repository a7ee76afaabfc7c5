//! The rule abstraction and its shareable handle.
//!
//! Every rule implements [`Rule`]; callers hold it through a [`Parser`], an
//! `Arc`'d handle that also carries the rule's identity and its lazily built
//! description. `Parser::attempt` is the one place that consults the per-parse
//! cache, records context frames on failure and follows forward references.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use once_cell::sync::OnceCell;

use crate::{cursor::Cursor, options::Options, outcome::Outcome};

/// What shape of combinator a rule is, for deciding when descriptions need parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Matches directly against the input. Never cached and never adds a frame.
    Primitive,
    Sequence,
    Alternation,
    Repetition,
    Forward,
    Other,
}

pub trait Rule: Send + Sync {
    /// Try to match at `at`. Must not retain the produced nodes.
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a>;

    /// A short phrase for what this matches.
    fn describe(&self) -> String;

    fn kind(&self) -> Kind {
        Kind::Other
    }

    /// The terms of a sequence or alternation, so that nesting one inside
    /// another of the same kind can be flattened.
    fn terms(&self) -> &[Parser] {
        &[]
    }
}

/// Stable identity of a constructed rule, used as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(usize);

static RULE_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn next_rule_id() -> RuleId {
    RuleId(RULE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

enum Body {
    Rule(Box<dyn Rule>),
    Forward {
        name: String,
        target: OnceCell<Parser>,
        announced: AtomicBool,
    },
}

struct Inner {
    id: RuleId,
    description: OnceCell<String>,
    body: Body,
}

/// A shared, immutable handle to a rule.
#[derive(Clone)]
pub struct Parser(Arc<Inner>);

impl Parser {
    pub fn new(rule: impl Rule + 'static) -> Self {
        Parser(Arc::new(Inner {
            id: next_rule_id(),
            description: OnceCell::new(),
            body: Body::Rule(Box::new(rule)),
        }))
    }

    /// A placeholder for a rule that is not built yet.
    ///
    /// Use it wherever the rule refers to itself (directly or through others),
    /// then call [`Parser::define`] once the real rule exists.
    pub fn forward(name: impl Into<String>) -> Self {
        Parser(Arc::new(Inner {
            id: next_rule_id(),
            description: OnceCell::new(),
            body: Body::Forward {
                name: name.into(),
                target: OnceCell::new(),
                announced: AtomicBool::new(false),
            },
        }))
    }

    /// Point a forward reference at its real rule.
    ///
    /// Panics if this is not a forward reference or it is already defined.
    pub fn define(&self, target: Parser) {
        match &self.0.body {
            Body::Forward {
                name, target: slot, ..
            } => {
                if slot.set(target).is_err() {
                    panic!("forward reference {:?} defined twice", name);
                }
            }
            Body::Rule(_) => panic!("{:?} is not a forward reference", self.description()),
        }
    }

    /// The rule this handle stands for, following forward references.
    ///
    /// Panics on a forward reference that was never defined.
    pub fn resolve(&self) -> &Parser {
        let mut here = self;
        while let Body::Forward { name, target, .. } = &here.0.body {
            here = match target.get() {
                Some(it) => it,
                None => panic!("forward reference {:?} used before it was defined", name),
            };
        }
        here
    }

    /// Identity for caching. A forward reference shares its target's.
    pub fn id(&self) -> RuleId {
        self.resolve().0.id
    }

    pub fn kind(&self) -> Kind {
        match &self.0.body {
            Body::Rule(rule) => rule.kind(),
            Body::Forward { .. } => Kind::Forward,
        }
    }

    pub fn terms(&self) -> &[Parser] {
        match &self.0.body {
            Body::Rule(rule) => rule.terms(),
            Body::Forward { .. } => &[],
        }
    }

    pub fn description(&self) -> &str {
        self.0.description.get_or_init(|| match &self.0.body {
            Body::Rule(rule) => rule.describe(),
            Body::Forward { name, .. } => name.clone(),
        })
    }

    pub fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let rule = match &self.0.body {
            Body::Rule(rule) => rule,
            Body::Forward {
                name,
                target,
                announced,
            } => {
                let target = match target.get() {
                    Some(it) => it,
                    None => panic!("forward reference {:?} used before it was defined", name),
                };
                if !announced.swap(true, Ordering::Relaxed) {
                    tracing::trace!(forward = %name, target = %target.description(), "resolved forward reference");
                }
                return target.attempt(at, options);
            }
        };

        if rule.kind() == Kind::Primitive {
            return rule.attempt(at, options);
        }

        let key = (self.0.id, at.offset());
        if let Some(outcome) = options.cached(key) {
            return outcome;
        }
        let outcome = rule
            .attempt(at, options)
            .map_err(|failure| failure.with_frame(self.clone(), at));
        options.remember(key, &outcome);
        outcome
    }

    /// Wrap a sub-rule's description in parentheses when `needs` says so.
    pub(crate) fn described_in(&self, needs: bool) -> String {
        if needs {
            format!("({})", self.description())
        } else {
            self.description().to_owned()
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parser")
            .field(&self.0.id)
            .field(&self.description())
            .finish()
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::literal;

    #[test]
    fn forward_shares_target_identity() {
        let fwd = Parser::forward("thing");
        let real = literal("x");
        fwd.define(real.clone());
        assert_eq!(fwd.id(), real.id());
        assert_eq!(fwd.description(), "thing");
        assert_eq!(fwd.kind(), Kind::Forward);

        let options = Options::new();
        let matched = fwd.attempt(Cursor::from("x"), &options).unwrap();
        assert!(matched.next.at_end());
    }

    #[test]
    #[should_panic(expected = "defined twice")]
    fn defining_twice_panics() {
        let fwd = Parser::forward("twice");
        fwd.define(literal("a"));
        fwd.define(literal("b"));
    }

    #[test]
    #[should_panic(expected = "used before it was defined")]
    fn undefined_forward_panics() {
        let fwd = Parser::forward("never");
        let _ = fwd.attempt(Cursor::from("x"), &Options::new());
    }

    #[test]
    fn ids_are_distinct() {
        assert_ne!(literal("a").id(), literal("a").id());
    }
}
