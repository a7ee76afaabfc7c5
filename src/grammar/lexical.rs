//! Whitespace, comments, literals, preprocessor lines and identifiers.

use once_cell::sync::Lazy;

use crate::{
    ast::ItemKind,
    combinators::{alt, anon, at_least_one, named, not, zero_or_more},
    cursor::Cursor,
    display::CharFmt,
    options::Options,
    outcome::{Cause, Failure, Matched, Outcome},
    primitives::{any_char, any_except, char_range, literal, one_of, until, until_stop},
    rule::{Kind, Parser, Rule},
};

pub static LEXICAL: Lazy<Lexical> = Lazy::new(Lexical::build);

pub struct Lexical {
    pub whitespace_char: Parser,
    pub line_comment: Parser,
    pub block_comment: Parser,
    pub comments: Parser,
    /// Any amount of whitespace and comments, including none.
    pub eat_white: Parser,
    /// At least one whitespace character.
    pub whitespace: Parser,
    pub string_escape: Parser,
    pub s_char: Parser,
    pub c_char: Parser,
    pub double_quote: Parser,
    pub string_chars: Parser,
    /// One or more adjacent `"..."` pieces.
    pub string_literal: Parser,
    pub char_literal: Parser,
    pub hash: Parser,
    pub hash_include: Parser,
    pub hash_include_impl: Parser,
    pub other_preprocessor: Parser,
    pub identifier_start_char: Parser,
    pub identifier_cont_char: Parser,
    pub identifier: Parser,
    /// `::`, but not the start of `:::`.
    pub double_colon: Parser,
}

impl Lexical {
    fn build() -> Lexical {
        let whitespace_char = one_of(" \t\n");
        let trailing_white = zero_or_more(whitespace_char.clone());

        let line_comment = named(
            ItemKind::LineComment,
            "line comment",
            literal("//") + until(one_of("\n")) + &trailing_white,
        );
        let block_comment = named(
            ItemKind::BlockComment,
            "block comment",
            literal("/*") + until(literal("*/")) + literal("*/") + &trailing_white,
        );
        let comments = named(
            ItemKind::Comments,
            "comments",
            at_least_one(&line_comment | &block_comment),
        );
        let eat_white = zero_or_more(&whitespace_char | &comments);
        let whitespace = named(
            ItemKind::Whitespace,
            "some whitespace",
            at_least_one(whitespace_char.clone()),
        );

        let octal_digit = char_range(b'0', b'7');
        let hex_digit = char_range(b'0', b'9') | char_range(b'a', b'f') | char_range(b'A', b'F');
        let string_escape = anon(
            "string escape sequence",
            literal("\\")
                + alt([
                    one_of("'\"?\\abfnrtv"),
                    &octal_digit + &octal_digit + &octal_digit,
                    &octal_digit + &octal_digit,
                    octal_digit.clone(),
                    literal("x") + at_least_one(hex_digit),
                ]),
        );
        let s_char = any_except("\\\"\n") | &string_escape;
        let c_char = any_except("\\'\n") | &string_escape;

        let double_quote = one_of("\"");
        let string_chars = named(
            ItemKind::StringChars,
            "string literal characters",
            until_stop(s_char.clone(), double_quote.clone()),
        );
        let string_literal = named(
            ItemKind::StringLiteral,
            "string literal",
            at_least_one(&double_quote + &string_chars + &double_quote + &eat_white),
        );
        let char_literal = anon(
            "character literal",
            one_of("'") + &c_char + one_of("'"),
        );

        let hash = Parser::new(HashAtLineStart);
        let blanks = || zero_or_more(one_of(" \t"));
        let impl_marker = literal("//") + blanks() + literal("impl") + blanks() + literal("\n");
        let include_target = |closer: Parser| {
            named(
                ItemKind::TargetOfHashInclude,
                "target of #include",
                until(closer),
            )
        };
        let hash_include_common = &hash
            + blanks()
            + literal("include")
            + blanks()
            + ((one_of("<") + include_target(one_of(">")) + one_of(">"))
                | (&double_quote + include_target(double_quote.clone()) + &double_quote))
            + until(literal("\n") | &impl_marker);
        let hash_include = named(
            ItemKind::HashInclude,
            "#include",
            &hash_include_common + one_of("\n") + &eat_white,
        );
        let hash_include_impl = named(
            ItemKind::HashIncludeImpl,
            "#include with //impl marker",
            &hash_include_common + &impl_marker + &eat_white,
        );
        let other_preprocessor = named(
            ItemKind::OtherPreprocessor,
            "other preprocessor directive",
            &hash + until(any_except("\\") + one_of("\n")) + any_char() + &eat_white,
        );

        let identifier_start_char = char_range(b'a', b'z') | char_range(b'A', b'Z') | one_of("_");
        let identifier_cont_char = alt([
            char_range(b'a', b'z'),
            char_range(b'A', b'Z'),
            char_range(b'0', b'9'),
            one_of("_"),
        ]);
        let identifier = anon(
            "identifier",
            &identifier_start_char + zero_or_more(identifier_cont_char.clone()),
        );
        let double_colon = literal("::") + not(one_of(":"));

        Lexical {
            whitespace_char,
            line_comment,
            block_comment,
            comments,
            eat_white,
            whitespace,
            string_escape,
            s_char,
            c_char,
            double_quote,
            string_chars,
            string_literal,
            char_literal,
            hash,
            hash_include,
            hash_include_impl,
            other_preprocessor,
            identifier_start_char,
            identifier_cont_char,
            identifier,
            double_colon,
        }
    }

    /// `word` when it isn't the start of a longer identifier.
    pub fn keyword(&self, word: &str) -> Parser {
        literal(word) + not(self.identifier_cont_char.clone())
    }

    /// `word` as a keyword, then any whitespace.
    pub fn keyword_white(&self, word: &str) -> Parser {
        self.keyword(word) + &self.eat_white
    }
}

/// A `#` in the first column of a line.
struct HashAtLineStart;

impl Rule for HashAtLineStart {
    fn attempt<'a>(&self, at: Cursor<'a>, _: &Options<'a>) -> Outcome<'a> {
        match at.peek() {
            None => Err(Failure::end_of_input(at)),
            Some(_) if at.column() != 1 => Err(Failure::new(Cause::Fixed("not at column 1"), at)),
            Some(b'#') => Ok(Matched::text(at, at.advance())),
            Some(found) => Err(Failure::new(
                Cause::Other(format!("line starts with '{}', not '#'", CharFmt(found))),
                at,
            )),
        }
    }

    fn describe(&self) -> String {
        "'#' at start of line".to_owned()
    }

    fn kind(&self) -> Kind {
        Kind::Primitive
    }
}
