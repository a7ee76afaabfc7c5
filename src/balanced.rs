//! Skipping text while keeping brackets balanced.
//!
//! Character literals, string literals and comments are opaque here: a `}`
//! inside `"..."` does not close anything, and neither does one in a comment.

use crate::{
    cursor::Cursor,
    grammar::lexical::LEXICAL,
    options::Options,
    outcome::{Failure, Matched, Outcome},
    rule::{Kind, Parser, Rule},
};

/// Text up to (not including) the first place `stop` matches outside any brackets.
///
/// `()`, `[]` and `{}` always nest; `<>` nests only when `angles` is set.
pub fn balanced(stop: Parser, angles: bool) -> Parser {
    Parser::new(Balanced { stop, angles })
}

struct Balanced {
    stop: Parser,
    angles: bool,
}

impl Rule for Balanced {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let mut cur = at;
        loop {
            if self.stop.attempt(cur, options).is_ok() {
                return Ok(Matched::text(at, cur));
            }
            if cur.at_end() {
                return Err(Failure::end_of_input(cur));
            }
            cur = self.step(cur, options)?;
        }
    }

    fn describe(&self) -> String {
        format!(
            "text balancing (), [], {{}}{}, up to but not including {}",
            if self.angles { ", <>" } else { "" },
            self.stop.description()
        )
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

impl Balanced {
    /// Move over one opaque unit: a literal, a comment, a bracketed region or a plain byte.
    fn step<'a>(&self, cur: Cursor<'a>, options: &Options<'a>) -> Result<Cursor<'a>, Failure<'a>> {
        let closer = match cur.peek() {
            Some(b'\'') => return Ok(LEXICAL.char_literal.attempt(cur, options)?.next),
            Some(b'"') => return Ok(LEXICAL.string_literal.attempt(cur, options)?.next),
            Some(b'/') => {
                return Ok(match LEXICAL.comments.attempt(cur, options) {
                    Ok(matched) => matched.next,
                    Err(_) => cur.advance(),
                })
            }
            Some(b'(') => b')',
            Some(b'[') => b']',
            Some(b'{') => b'}',
            Some(b'<') if self.angles => b'>',
            Some(_) => return Ok(cur.advance()),
            None => return Err(Failure::end_of_input(cur)),
        };
        let inside = self.skip_to(cur.advance(), closer, options)?;
        Ok(inside.advance())
    }

    /// The position of the `closer` that ends a region starting at `cur`.
    fn skip_to<'a>(
        &self,
        mut cur: Cursor<'a>,
        closer: u8,
        options: &Options<'a>,
    ) -> Result<Cursor<'a>, Failure<'a>> {
        loop {
            match cur.peek() {
                Some(b) if b == closer => return Ok(cur),
                Some(_) => cur = self.step(cur, options)?,
                None => return Err(Failure::end_of_input(cur)),
            }
        }
    }
}
