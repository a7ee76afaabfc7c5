//! Rules that look at the input directly.

use std::sync::Arc;

use crate::{
    cursor::Cursor,
    display::{BstrFmt, CharFmt, CharSetFmt},
    options::Options,
    outcome::{Cause, Failure, Matched, Outcome},
    rule::{Kind, Parser, Rule},
};

/// Exactly this text.
pub fn literal(text: &str) -> Parser {
    Parser::new(Literal {
        text: text.as_bytes().to_vec(),
    })
}

/// One byte from `chars`.
pub fn one_of(chars: &str) -> Parser {
    Parser::new(OneOf {
        chars: Arc::from(chars.as_bytes()),
    })
}

/// One byte not in `chars`.
pub fn any_except(chars: &str) -> Parser {
    Parser::new(AnyExcept {
        chars: Arc::from(chars.as_bytes()),
    })
}

/// One byte in `min..=max`.
pub fn char_range(min: u8, max: u8) -> Parser {
    Parser::new(CharRange { min, max })
}

pub fn any_char() -> Parser {
    Parser::new(AnyChar)
}

/// Everything up to (not including) the first place `stop` would match.
pub fn until(stop: Parser) -> Parser {
    Parser::new(Until { stop })
}

/// Repeated `each` up to (not including) the first place `stop` would match.
pub fn until_stop(each: Parser, stop: Parser) -> Parser {
    Parser::new(UntilStop { each, stop })
}

/// Succeeds only at the end of the input, with an empty leaf.
pub fn end_of_input() -> Parser {
    Parser::new(EndOfInput)
}

struct Literal {
    text: Vec<u8>,
}

impl Rule for Literal {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        let mut cur = at;
        for &expected in &self.text {
            match cur.peek() {
                None => return Err(Failure::end_of_input(cur)),
                Some(found) if found != expected => {
                    return Err(Failure::new(Cause::Mismatch { expected, found }, cur))
                }
                Some(_) => cur = cur.advance(),
            }
        }
        Ok(Matched::text(at, cur))
    }

    fn describe(&self) -> String {
        format!("\"{}\"", BstrFmt(&self.text))
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct OneOf {
    chars: Arc<[u8]>,
}

impl Rule for OneOf {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        match at.peek() {
            None => Err(Failure::end_of_input(at)),
            Some(found) if self.chars.contains(&found) => Ok(Matched::text(at, at.advance())),
            Some(found) => Err(Failure::new(
                Cause::NotOneOf {
                    found,
                    chars: self.chars.clone(),
                },
                at,
            )),
        }
    }

    fn describe(&self) -> String {
        format!("one of chars [{}]", CharSetFmt(&self.chars))
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct AnyExcept {
    chars: Arc<[u8]>,
}

impl Rule for AnyExcept {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        match at.peek() {
            None => Err(Failure::end_of_input(at)),
            Some(found) if self.chars.contains(&found) => Err(Failure::new(
                Cause::OneOf {
                    found,
                    chars: self.chars.clone(),
                },
                at,
            )),
            Some(_) => Ok(Matched::text(at, at.advance())),
        }
    }

    fn describe(&self) -> String {
        format!("any char except [{}]", CharSetFmt(&self.chars))
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct CharRange {
    min: u8,
    max: u8,
}

impl Rule for CharRange {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        match at.peek() {
            None => Err(Failure::end_of_input(at)),
            Some(found) if (self.min..=self.max).contains(&found) => {
                Ok(Matched::text(at, at.advance()))
            }
            Some(found) => Err(Failure::new(
                Cause::NotInRange {
                    found,
                    min: self.min,
                    max: self.max,
                },
                at,
            )),
        }
    }

    fn describe(&self) -> String {
        format!(
            "one of chars '{}'..'{}'",
            CharFmt(self.min),
            CharFmt(self.max)
        )
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct AnyChar;

impl Rule for AnyChar {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        if at.at_end() {
            Err(Failure::end_of_input(at))
        } else {
            Ok(Matched::text(at, at.advance()))
        }
    }

    fn describe(&self) -> String {
        "any char".to_owned()
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct Until {
    stop: Parser,
}

impl Rule for Until {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let mut cur = at;
        // `stop` is never tried at the end of input itself.
        while !cur.at_end() {
            if self.stop.attempt(cur, options).is_ok() {
                return Ok(Matched::text(at, cur));
            }
            cur = cur.advance();
        }
        Err(Failure::end_of_input(cur))
    }

    fn describe(&self) -> String {
        format!("up to but not including {}", self.stop.description())
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct UntilStop {
    each: Parser,
    stop: Parser,
}

impl Rule for UntilStop {
    fn attempt<'a>(&self, at: Cursor<'a>, options: &Options<'a>) -> Outcome<'a> {
        let mut nodes = Vec::new();
        let mut cur = at;
        loop {
            if self.stop.attempt(cur, options).is_ok() {
                return Ok(Matched::new(nodes, cur));
            }
            match self.each.attempt(cur, options) {
                Ok(matched) => {
                    if matched.next == cur {
                        panic!(
                            "{} matched nothing at {} while looking for {}",
                            self.each.description(),
                            cur,
                            self.stop.description()
                        );
                    }
                    nodes.extend(matched.nodes);
                    cur = matched.next;
                }
                Err(failure) if failure.is_end_of_input() && options.wants_partial() => {
                    return Err(failure.with_partial(nodes))
                }
                Err(failure) => return Err(failure),
            }
        }
    }

    fn describe(&self) -> String {
        format!(
            "{}'s up to but not including {}",
            self.each.description(),
            self.stop.description()
        )
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

struct EndOfInput;

impl Rule for EndOfInput {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        match at.peek() {
            None => Ok(Matched::text(at, at)),
            Some(found) => Err(Failure::new(Cause::NotEndOfInput { found }, at)),
        }
    }

    fn describe(&self) -> String {
        "end of file".to_owned()
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run<'a>(rule: &Parser, text: &'a str) -> Outcome<'a> {
        rule.attempt(Cursor::from(text), &Options::new())
    }

    #[test]
    fn literal_matches_and_mismatches() {
        let m = run(&literal("while"), "while(1)").unwrap();
        assert_eq!(m.next.offset(), 5);
        assert_eq!(m.nodes.len(), 1);
        assert_eq!(m.nodes[0].text(), "while");

        let f = run(&literal("while"), "whale").unwrap_err();
        assert_eq!(
            f.cause,
            Cause::Mismatch {
                expected: b'i',
                found: b'a'
            }
        );
        assert_eq!(f.at.offset(), 2);
        assert!(f.context.is_empty());

        let f = run(&literal("while"), "wh").unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.at.offset(), 2);
    }

    #[test]
    fn char_classes() {
        assert!(run(&one_of("ab"), "b").is_ok());
        assert_eq!(
            run(&one_of("ab"), "c").unwrap_err().cause.to_string(),
            "'c' is not one of chars [ab]"
        );
        assert!(run(&any_except("ab"), "c").is_ok());
        assert_eq!(
            run(&any_except("ab"), "a").unwrap_err().cause.to_string(),
            "'a' is one of [ab]"
        );
        assert!(run(&char_range(b'0', b'9'), "7").is_ok());
        assert!(run(&char_range(b'0', b'9'), "x").is_err());
        assert!(run(&any_char(), "").unwrap_err().is_end_of_input());
        assert!(run(&one_of("ab"), "").unwrap_err().is_end_of_input());
    }

    #[test]
    fn until_stops_before_the_match() {
        let m = run(&until(literal("*/")), "abc */ def").unwrap();
        assert_eq!(m.nodes[0].text(), "abc ");
        assert_eq!(m.next.offset(), 4);

        let f = run(&until(literal("*/")), "never closed").unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.at.offset(), 12);
    }

    #[test]
    fn until_does_not_try_at_end() {
        assert!(run(&until(end_of_input()), "abc").is_err());
    }

    #[test]
    fn until_stop_accumulates() {
        let rule = until_stop(one_of("ab"), literal(";"));
        let m = run(&rule, "abba;").unwrap();
        assert_eq!(m.nodes.len(), 4);
        assert_eq!(m.next.offset(), 4);

        let f = run(&rule, "abc;").unwrap_err();
        assert_eq!(f.at.offset(), 2);
    }

    #[test]
    fn until_stop_partial_policy() {
        let rule = until_stop(one_of("ab"), literal(";"));
        let text = "abab";

        let f = rule.attempt(Cursor::from(text), &Options::new()).unwrap_err();
        assert!(f.partial.is_empty());

        let options = Options::new().partial_at_end(true);
        let f = rule.attempt(Cursor::from(text), &options).unwrap_err();
        assert!(f.is_end_of_input());
        assert_eq!(f.partial.len(), 4);
    }

    #[test]
    fn end_of_input_is_zero_width() {
        let m = run(&end_of_input(), "").unwrap();
        assert_eq!(m.nodes.len(), 1);
        assert_eq!(m.nodes[0].text(), "");
        assert_eq!(
            run(&end_of_input(), "x").unwrap_err().cause.to_string(),
            "expected end of input, not 'x'"
        );
    }

    #[test]
    fn descriptions() {
        assert_eq!(literal("x").description(), "\"x\"");
        assert_eq!(one_of("ba").description(), "one of chars [ab]");
        assert_eq!(any_except("\n").description(), "any char except [\\n]");
        assert_eq!(char_range(b'a', b'z').description(), "one of chars 'a'..'z'");
        assert_eq!(any_char().description(), "any char");
        assert_eq!(
            until(literal("*/")).description(),
            "up to but not including \"*/\""
        );
        assert_eq!(
            until_stop(any_char(), literal(";")).description(),
            "any char's up to but not including \";\""
        );
        assert_eq!(end_of_input().description(), "end of file");
    }
}
