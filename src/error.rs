use std::ops::Range;

use ariadne::{CharSet, Label, Report, ReportKind};
use thiserror::Error;

use crate::{
    cursor::Position,
    outcome::{Cause, Failure},
};

/// Error when a top-level parse fails.
///
/// Owns everything it needs, so it outlives the input it was parsed from.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Where the leaf cause happened.
    pub at: Position,
    pub cause: Cause,
    /// The rules that were being parsed, outermost first, with where each was tried.
    pub context: Vec<(String, Position)>,
    /// Byte spans of the nodes matched before input ran out, if they were kept.
    pub partial: Vec<Range<usize>>,
    span: Range<usize>,
    message: String,
}

impl ParseError {
    pub(crate) fn new(failure: &Failure<'_>) -> Self {
        let at = failure.at.position();
        let len = failure.at.buffer().len();
        ParseError {
            at,
            cause: failure.cause.clone(),
            context: failure
                .context
                .iter()
                .rev()
                .map(|frame| (frame.description().to_owned(), frame.at.position()))
                .collect(),
            partial: failure
                .partial
                .iter()
                .filter_map(|node| Some(node.start()?.offset()..node.end()?.offset()))
                .collect(),
            span: at.offset.min(len)..(at.offset + 1).min(len),
            message: failure.message(),
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        self.cause == Cause::EndOfInput
    }

    /// The multi-line explanation, the same as `to_string()`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// A source-annotated report, for printing with `ariadne::sources`.
    pub fn report(&self, source: impl Into<String>) -> Report<(String, Range<usize>)> {
        let source = source.into();
        let mut report = Report::build(ReportKind::Error, source.as_str(), self.span.start)
            .with_config(ariadne::Config::default().with_char_set(CharSet::Ascii))
            .with_message(format!("{}: {}", self.at, self.cause))
            .with_label(
                Label::new((source.clone(), self.span.clone())).with_message(self.cause.to_string()),
            );

        if let Some((rule, pos)) = self.context.last() {
            let start = pos.offset.min(self.span.start);
            if start < self.span.start {
                report = report.with_label(
                    Label::new((source.clone(), start..self.span.start))
                        .with_message(format!("while parsing {}", rule)),
                );
            }
        }
        if !self.context.is_empty() {
            report = report.with_note(&self.message);
        }
        if !self.partial.is_empty() {
            report = report.with_note(format!(
                "{} items were matched before the input ran out",
                self.partial.len()
            ));
        }
        report.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{Composite, ItemKind},
        combinators::anon,
        cursor::Cursor,
        parse::parse,
        primitives::literal,
    };

    #[test]
    fn empty_input_against_a_literal() {
        let mut target = Composite::new(ItemKind::File);
        let err = parse(&mut target, Cursor::from(""), &literal("x"), false, false).unwrap_err();
        assert_eq!(err.to_string(), "<line 1, col 1>: end of input");
        assert!(err.is_end_of_input());
        assert!(err.context.is_empty());
        assert!(target.children.is_empty());
    }

    #[test]
    fn context_is_outermost_first() {
        let rule = anon("greeting", anon("hello", literal("hello")) + literal("!"));
        let mut target = Composite::new(ItemKind::File);
        let err = parse(&mut target, Cursor::from("help"), &rule, false, false).unwrap_err();
        let names: Vec<&str> = err.context.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["greeting", "hello then \"!\"", "hello"]);
        assert_eq!(err.at.offset, 3);
        assert_eq!(
            err.to_string(),
            "<line 1, col 1>: failed to parse greeting because\n  \
             <line 1, col 1>: failed to parse hello then \"!\" because\n  \
             <line 1, col 1>: failed to parse hello because\n  \
             <line 1, col 4>: expected 'l' but found 'p'"
        );
    }
}
