use hcp_parser::{
    ast::{Composite, ItemKind, Node},
    balanced::balanced,
    combinators::{alt, anon, named, optional, zero_or_more},
    parse, parse_with,
    primitives::{literal, one_of, until_stop},
    Cause, Cursor, Options, Parser,
};

/// `(` nested any depth `)` around an `x`, through a forward reference.
fn nested() -> Parser {
    let nested = Parser::forward("nested");
    nested.define(anon(
        "nested",
        named(
            ItemKind::Block,
            "bracketed",
            literal("(") + optional(nested.clone()) + literal(")"),
        ) | literal("x"),
    ));
    nested
}

fn run_both<'a>(rule: &Parser, text: &'a str) -> [(Result<usize, String>, Vec<Node<'a>>); 2] {
    [true, false].map(|cache| {
        let mut target = Composite::new(ItemKind::File);
        let result = parse_with(
            &mut target,
            Cursor::from(text),
            rule,
            Options::new().cache(cache),
        )
        .map(|end| end.offset())
        .map_err(|e| e.to_string());
        (result, target.children)
    })
}

#[test]
fn cache_never_changes_the_outcome() {
    let rule = nested();
    for text in ["x", "(x)", "((()))", "(((x)))", "((x)", "(()", "", ")"] {
        let [cached, uncached] = run_both(&rule, text);
        assert_eq!(cached, uncached, "outcomes differ for {:?}", text);
    }
}

#[test]
fn cache_is_used_for_repeated_attempts() {
    let shared = named(ItemKind::Block, "ab", literal("a") + literal("b"));
    // Both branches try `shared` at offset 0.
    let rule = (&shared + literal("c")) | (&shared + literal("d"));
    let text = "abd";

    let options = Options::new();
    let outcome = rule.attempt(Cursor::from(text), &options);
    assert!(outcome.is_ok());
    let (hits, _) = options.cache_stats().unwrap();
    assert!(hits >= 1);
}

#[test]
fn self_reference_terminates() {
    let rule = nested();
    let text = format!("{}x{}", "(".repeat(40), ")".repeat(40));
    let mut target = Composite::new(ItemKind::File);
    let end = parse(&mut target, Cursor::from(text.as_str()), &rule, false, false).unwrap();
    assert!(end.at_end());
    assert_eq!(target.children.len(), 1);
    assert_eq!(target.children[0].find_all(ItemKind::Block).len(), 1);
    assert_eq!(target.reconstruct(), text);
}

#[test]
fn failure_leaves_target_untouched() {
    let mut target = Composite::new(ItemKind::File);
    let text = "ab";
    let first = parse(&mut target, Cursor::from(text), &literal("a"), false, false).unwrap();
    assert!(parse(&mut target, first, &literal("x"), false, false).is_err());
    assert_eq!(target.children.len(), 1);
    assert_eq!(target.reconstruct(), "a");
}

#[test]
fn furthest_failure_reaches_the_report() {
    let rule = alt([
        anon("short", literal("ab") + literal("x")),
        anon("long", literal("abc") + literal("x")),
    ]);
    let mut target = Composite::new(ItemKind::File);
    let err = parse(&mut target, Cursor::from("abcd"), &rule, false, false).unwrap_err();
    assert_eq!(err.at.offset, 3);
    assert_eq!(
        err.cause,
        Cause::Mismatch {
            expected: b'x',
            found: b'd'
        }
    );
    assert!(err.context.iter().any(|(name, _)| name == "long"));
    assert!(!err.context.iter().any(|(name, _)| name == "short"));
}

#[test]
fn error_positions_track_lines() {
    let text = "a\nb\nc";
    let rule = literal("a\nb\n") + literal("d");
    let mut target = Composite::new(ItemKind::File);
    let err = parse(&mut target, Cursor::from(text), &rule, false, false).unwrap_err();
    assert_eq!((err.at.line, err.at.column), (3, 1));
    assert!(err
        .to_string()
        .ends_with("<line 3, col 1>: expected 'd' but found 'c'"));
}

#[test]
fn partial_nodes_only_on_request() {
    let items = until_stop(
        named(ItemKind::Param, "item", one_of("abc") + zero_or_more(one_of(" "))),
        literal(";"),
    );
    let text = "a b c";

    let mut target = Composite::new(ItemKind::Params);
    let err = parse(&mut target, Cursor::from(text), &items, false, true).unwrap_err();
    assert!(err.is_end_of_input());
    assert_eq!(err.partial, vec![0..2, 2..4, 4..5]);

    let err = parse(&mut target, Cursor::from(text), &items, false, false).unwrap_err();
    assert!(err.partial.is_empty());
    assert!(target.children.is_empty());
}

#[test]
fn partial_nodes_are_not_kept_for_other_failures() {
    let rule = literal("a") + literal("b");
    let mut target = Composite::new(ItemKind::File);
    let err = parse(&mut target, Cursor::from("ax"), &rule, false, true).unwrap_err();
    assert!(!err.is_end_of_input());
    assert!(err.partial.is_empty());
}

#[test]
fn balanced_skips_quoted_closers() {
    let text = "{ \"quoted }\" more } tail";
    let rule = literal("{") + balanced(one_of("}"), false) + literal("}");
    let mut target = Composite::new(ItemKind::Block);
    let end = parse(&mut target, Cursor::from(text), &rule, false, false).unwrap();
    assert_eq!(&text[end.offset()..], " tail");
    assert_eq!(target.children[1].text(), " \"quoted }\" more ");
}

#[test]
fn trace_goes_to_the_given_sink() {
    let rule = named(
        ItemKind::Block,
        "pair",
        anon("left", literal("(")) + anon("right", literal(")")),
    );
    let mut out = Vec::new();
    {
        let mut target = Composite::new(ItemKind::File);
        let options = Options::new().trace_to(&mut out);
        parse_with(&mut target, Cursor::from("()"), &rule, options).unwrap();
    }
    let out = String::from_utf8(out).unwrap();
    assert_eq!(
        out,
        "+ parse pair at <line 1, col 1>\n\
         \x20 + parse left at <line 1, col 1>\n\
         \x20 - parsed left, now at <line 1, col 2>\n\
         \x20 + parse right at <line 1, col 2>\n\
         \x20 - parsed right, now at <line 1, col 3>\n\
         - parsed pair, now at <line 1, col 3>\n"
    );
}
