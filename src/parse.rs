//! The top-level entry point.

use crate::{
    ast::Composite,
    cursor::Cursor,
    error::ParseError,
    options::Options,
    rule::Parser,
};

/// Run `rule` from `start`, appending what it produces to `target`.
///
/// Returns where the rule stopped. On failure `target` is left as it was.
pub fn parse<'a>(
    target: &mut Composite<'a>,
    start: Cursor<'a>,
    rule: &Parser,
    trace: bool,
    partial_at_end: bool,
) -> Result<Cursor<'a>, ParseError> {
    let options = Options::new().trace(trace).partial_at_end(partial_at_end);
    parse_with(target, start, rule, options)
}

/// As [`parse`], with the options spelled out.
///
/// Takes the options by value: their cache only holds for this one parse.
pub fn parse_with<'a>(
    target: &mut Composite<'a>,
    start: Cursor<'a>,
    rule: &Parser,
    options: Options<'a>,
) -> Result<Cursor<'a>, ParseError> {
    let outcome = rule.attempt(start, &options);

    let (hits, misses) = options.cache_stats().unwrap_or_default();
    match outcome {
        Ok(matched) => {
            tracing::debug!(
                rule = %rule,
                consumed = matched.next.offset() - start.offset(),
                cache_hits = hits,
                cache_misses = misses,
                "parsed"
            );
            target.children.extend(matched.nodes);
            Ok(matched.next)
        }
        Err(failure) => {
            tracing::debug!(
                rule = %rule,
                at = %failure.at,
                cache_hits = hits,
                cache_misses = misses,
                "failed to parse"
            );
            Err(ParseError::new(&failure))
        }
    }
}
