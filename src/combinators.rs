//! Rules built out of other rules.
//!
//! `a + b` is a sequence, `a | b` an alternation and `!a` a negative lookahead.
//! Sequences and alternations flatten: `(a + b) + c` has the three terms
//! `a`, `b`, `c`, and describes itself as `a then b then c`.

use std::ops::{Add, BitOr, Not};

use itertools::Itertools;

use crate::{
    ast::{ItemKind, Node},
    cursor::Cursor,
    options::Options,
    outcome::{Cause, Failure, Matched, Outcome},
    rule::{Kind, Parser, Rule},
};

/// Each term in turn, each starting where the last left off.
pub fn seq(terms: impl IntoIterator<Item = Parser>) -> Parser {
    let terms = flatten(terms, Kind::Sequence);
    assert!(!terms.is_empty(), "a sequence needs at least one term");
    Parser::new(Sequence { terms })
}

/// The first term that matches. If none do, the failure that got furthest.
pub fn alt(terms: impl IntoIterator<Item = Parser>) -> Parser {
    let terms = flatten(terms, Kind::Alternation);
    assert!(!terms.is_empty(), "an alternation needs at least one term");
    Parser::new(Alternation { terms })
}

pub fn zero_or_more(x: Parser) -> Parser {
    Parser::new(ZeroOrMore { x })
}

pub fn optional(x: Parser) -> Parser {
    Parser::new(Optional { x })
}

/// Succeeds, consuming nothing, exactly when `x` fails.
pub fn not(x: Parser) -> Parser {
    Parser::new(Negation { x })
}

pub fn at_least_one(x: Parser) -> Parser {
    let name = format!(
        "at least one occurrence of {}",
        x.described_in(matches!(x.kind(), Kind::Sequence | Kind::Alternation))
    );
    anon(name, x.clone() + zero_or_more(x))
}

/// Give `x` a name for descriptions and the trace. Its nodes pass through as they are.
pub fn anon(name: impl Into<String>, x: Parser) -> Parser {
    Parser::new(Named {
        name: name.into(),
        item: None,
        x,
    })
}

/// As [`anon`], and gather everything `x` produces into one composite node of `kind`.
pub fn named(kind: ItemKind, name: impl Into<String>, x: Parser) -> Parser {
    Parser::new(Named {
        name: name.into(),
        item: Some(kind),
        x,
    })
}

fn flatten(terms: impl IntoIterator<Item = Parser>, kind: Kind) -> Vec<Parser> {
    let mut out = Vec::new();
    for term in terms {
        if term.kind() == kind {
            out.extend(term.terms().iter().cloned());
        } else {
            out.push(term);
        }
    }
    out
}

struct Sequence {
    terms: Vec<Parser>,
}

impl Rule for Sequence {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let mut nodes = Vec::new();
        let mut cur = at;
        for term in &self.terms {
            match term.attempt(cur, options) {
                Ok(matched) => {
                    nodes.extend(matched.nodes);
                    cur = matched.next;
                }
                Err(failure) if failure.is_end_of_input() && options.wants_partial() => {
                    return Err(failure.with_partial(nodes))
                }
                Err(failure) => return Err(failure),
            }
        }
        Ok(Matched::new(nodes, cur))
    }

    fn describe(&self) -> String {
        let last = self.terms.len() - 1;
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| {
                term.described_in(match term.kind() {
                    Kind::Alternation => true,
                    Kind::Repetition => i != last,
                    _ => false,
                })
            })
            .join(" then ")
    }

    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn terms(&self) -> &[Parser] {
        &self.terms
    }
}

struct Alternation {
    terms: Vec<Parser>,
}

impl Rule for Alternation {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        // (branch, its failure), for the failure that got furthest so far.
        let mut furthest: Option<(&Parser, Failure<'a>)> = None;
        for term in &self.terms {
            match term.attempt(at, options) {
                Ok(matched) => {
                    if let (Some(tracer), Some((_, loser))) = (options.tracer(), &furthest) {
                        tracer.line(format_args!(
                            "* chose {}; furthest loser got to {}",
                            term, loser.at
                        ));
                    }
                    return Ok(matched);
                }
                // Ties keep the earlier branch.
                Err(failure) => match &furthest {
                    Some((_, best)) if best.at >= failure.at => {}
                    _ => furthest = Some((term, failure)),
                },
            }
        }
        match furthest {
            Some((branch, failure)) => {
                if let Some(tracer) = options.tracer() {
                    tracer.line(format_args!(
                        "* choosing {} which got to {}",
                        branch, failure.at
                    ));
                }
                Err(failure)
            }
            None => unreachable!("alternations always have terms"),
        }
    }

    fn describe(&self) -> String {
        let last = self.terms.len() - 1;
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| {
                term.described_in(match term.kind() {
                    Kind::Sequence => true,
                    Kind::Repetition => i != last,
                    _ => false,
                })
            })
            .join(" or ")
    }

    fn kind(&self) -> Kind {
        Kind::Alternation
    }

    fn terms(&self) -> &[Parser] {
        &self.terms
    }
}

struct ZeroOrMore {
    x: Parser,
}

impl Rule for ZeroOrMore {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let mut nodes = Vec::new();
        let mut cur = at;
        while let Ok(matched) = self.x.attempt(cur, options) {
            // A match that consumes nothing would match forever.
            if matched.next == cur {
                break;
            }
            nodes.extend(matched.nodes);
            cur = matched.next;
        }
        Ok(Matched::new(nodes, cur))
    }

    fn describe(&self) -> String {
        format!(
            "zero or more occurrences of {}",
            self.x
                .described_in(matches!(self.x.kind(), Kind::Sequence | Kind::Alternation))
        )
    }

    fn kind(&self) -> Kind {
        Kind::Repetition
    }
}

struct Optional {
    x: Parser,
}

impl Rule for Optional {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        Ok(self
            .x
            .attempt(at, options)
            .unwrap_or_else(|_| Matched::empty(at)))
    }

    fn describe(&self) -> String {
        format!(
            "optional {}",
            self.x
                .described_in(matches!(self.x.kind(), Kind::Sequence | Kind::Alternation))
        )
    }
}

struct Negation {
    x: Parser,
}

impl Rule for Negation {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        match self.x.attempt(at, options) {
            Ok(_) => Err(Failure::new(Cause::ExpectedParseFailure, at)),
            Err(_) => Ok(Matched::empty(at)),
        }
    }

    fn describe(&self) -> String {
        format!("!{}", self.x.description())
    }
}

struct Named {
    name: String,
    item: Option<ItemKind>,
    x: Parser,
}

impl Named {
    fn wrap<'a>(&self, outcome: Outcome<'a>) -> Outcome<'a> {
        match (self.item, outcome) {
            (Some(kind), Ok(matched)) => Ok(Matched::new(
                vec![Node::composite(kind, matched.nodes)],
                matched.next,
            )),
            (_, outcome) => outcome,
        }
    }
}

impl Rule for Named {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let tracer = match options.tracer() {
            Some(it) => it,
            None => return self.wrap(self.x.attempt(at, options)),
        };

        tracer.line(format_args!("+ parse {} at {}", self.name, at));
        let outcome = {
            let _scope = tracer.nest();
            self.x.attempt(at, options)
        };
        match &outcome {
            Ok(matched) => tracer.line(format_args!(
                "- parsed {}, now at {}",
                self.name, matched.next
            )),
            Err(failure) => tracer.line(format_args!(
                "- failed {}: {}",
                self.name, failure.cause
            )),
        }
        self.wrap(outcome)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

macro_rules! operator {
    ($trait:ident, $method:ident, $build:ident) => {
        impl $trait<Parser> for Parser {
            type Output = Parser;

            fn $method(self, rhs: Parser) -> Parser {
                $build([self, rhs])
            }
        }

        impl $trait<&Parser> for Parser {
            type Output = Parser;

            fn $method(self, rhs: &Parser) -> Parser {
                $build([self, rhs.clone()])
            }
        }

        impl $trait<Parser> for &Parser {
            type Output = Parser;

            fn $method(self, rhs: Parser) -> Parser {
                $build([self.clone(), rhs])
            }
        }

        impl $trait<&Parser> for &Parser {
            type Output = Parser;

            fn $method(self, rhs: &Parser) -> Parser {
                $build([self.clone(), rhs.clone()])
            }
        }
    };
}

operator!(Add, add, seq);
operator!(BitOr, bitor, alt);

impl Not for Parser {
    type Output = Parser;

    fn not(self) -> Parser {
        not(self)
    }
}

impl Not for &Parser {
    type Output = Parser;

    fn not(self) -> Parser {
        not(self.clone())
    }
}
