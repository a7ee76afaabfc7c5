use hcp_parser::{
    ast::{Composite, ItemKind, Node},
    grammar::grammar,
    parse, Cursor, ParseError,
};
use rstest::rstest;

fn parse_rule<'a>(name: &str, text: &'a str) -> Result<(Node<'a>, Cursor<'a>), ParseError> {
    let rule = grammar()
        .rule(name)
        .unwrap_or_else(|| panic!("no rule called {}", name));
    let mut root = Composite::new(ItemKind::File);
    let end = parse(&mut root, Cursor::from(text), rule, false, false)?;
    Ok((Node::Composite(root), end))
}

fn parse_file(text: &str) -> Node<'_> {
    match parse_rule("file", text) {
        Ok((root, end)) => {
            assert!(end.at_end(), "stopped at {}", end);
            root
        }
        Err(e) => panic!("{}", e),
    }
}

fn texts(root: &Node<'_>, kind: ItemKind) -> Vec<String> {
    root.find_all(kind).iter().map(|n| n.text()).collect()
}

#[rstest]
#[case("line_comment", "// c\n")]
#[case("block_comment", "/* a\n b */ ")]
#[case("hash_include", "#include <vector>\n")]
#[case("hash_include", "#include \"a.h\"\n")]
#[case("hash_include_impl", "#include \"a.h\" // impl\n")]
#[case("other_preprocessor", "#define X 1\n")]
#[case("using_statement", "using std::string;\n")]
#[case("enum_def", "enum E { A, B };\n")]
#[case("scoped_enum_def", "enum class E { A };\n")]
#[case("typedef_statement", "typedef unsigned int uint;\n")]
#[case("typedef_statement", "typedef void (*cb)(int);\n")]
#[case("class_decl", "class A;\n")]
#[case("access_modifier", "public:\n")]
#[case("global_var_def", "int x = 3;\n")]
#[case("static_var_def", "static const char* s = \"a;b\";\n")]
#[case("extern_var_def", "extern int n;\n")]
#[case("function_decl", "virtual void f() const override;\n")]
#[case("function_def", "int f(int a) { return a; }\n")]
#[case("template_function_def", "template <typename T> T id(T x) { return x; }\n")]
fn accepts_whole_input(#[case] rule: &str, #[case] text: &str) {
    match parse_rule(rule, text) {
        Ok((_, end)) => assert!(end.at_end(), "{} stopped at {} in {:?}", rule, end, text),
        Err(e) => panic!("{} failed on {:?}: {}", rule, text, e),
    }
}

#[rstest]
#[case("function_decl", "int f(;\n")]
#[case("class_decl", "class ;\n")]
#[case("identifier", "9lives")]
#[case("hash_include", " #include <a>\n")]
#[case("string_literal", "\"open")]
fn rejects(#[case] rule: &str, #[case] text: &str) {
    assert!(parse_rule(rule, text).is_err(), "{} accepted {:?}", rule, text);
}

#[test]
fn qualified_function_declaration() {
    let text = "x::y<z>::f(int a, int b);\n";
    let (root, end) = parse_rule("function_decl", text).unwrap();
    assert!(end.at_end());

    let decl = root.find_first(ItemKind::FunctionDecl).unwrap();
    assert_eq!(decl.text(), text);
    assert_eq!(texts(decl, ItemKind::Scope), ["x::y<z>::"]);
    assert_eq!(texts(decl, ItemKind::FunctionName), ["f"]);
    let params = decl.find_first(ItemKind::Params).unwrap();
    assert_eq!(texts(params, ItemKind::Param), ["int a", "int b"]);
}

#[test]
fn line_comment_alone() {
    let (root, end) = parse_rule("line_comment", "// c\n").unwrap();
    assert!(end.at_end());
    assert_eq!(root.children().len(), 1);
    assert_eq!(texts(&root, ItemKind::LineComment), ["// c\n"]);
}

#[test]
fn class_with_members() {
    let root = parse_file("class A {\npublic:\n  int x;\n};\n");
    let class = root.find_first(ItemKind::ClassDef).unwrap();
    assert_eq!(texts(class, ItemKind::ClassName), ["A"]);
    let members = class.find_first(ItemKind::ClassMembers).unwrap();
    assert_eq!(texts(members, ItemKind::AccessModifier), ["public:\n  "]);
    assert_eq!(texts(members, ItemKind::VarName), ["x"]);
}

#[test]
fn nested_namespaces() {
    let root = parse_file("namespace a {\nnamespace b {\nint f();\n}\n}\n");
    assert_eq!(texts(&root, ItemKind::NamespaceName), ["a", "b"]);
    assert_eq!(texts(&root, ItemKind::FunctionName), ["f"]);
    assert!(root.find_first(ItemKind::EndOfFile).is_some());
}

#[test]
fn anonymous_namespace() {
    let root = parse_file("namespace {\nint x;\n}\n");
    let ns = root.find_first(ItemKind::AnonymousNamespace).unwrap();
    assert_eq!(texts(ns, ItemKind::GlobalVarDef), ["int x;\n"]);
    assert!(root.find_first(ItemKind::NamespaceDef).is_none());
}

#[test]
fn typedefs_name_their_type() {
    let root = parse_file("typedef unsigned int uint;\ntypedef void (*cb)(int);\n");
    assert_eq!(texts(&root, ItemKind::DefinedType), ["uint", "cb"]);
    assert_eq!(root.find_all(ItemKind::Typedef).len(), 2);
}

#[test]
fn comments_and_includes_at_top_level() {
    let root = parse_file("// header\n#include <vector>\n/* note */\nint x;\n");
    assert_eq!(texts(&root, ItemKind::TargetOfHashInclude), ["vector"]);
    assert_eq!(root.find_all(ItemKind::Comments).len(), 2);
    assert_eq!(root.reconstruct(), "// header\n#include <vector>\n/* note */\nint x;\n");
}

#[test]
fn unclosed_class_reports_end_of_input() {
    let text = "class A {\nint x;\n";
    let err = parse_rule("file", text).unwrap_err();
    assert!(err.is_end_of_input());
    assert_eq!(err.at.offset, text.len());

    let names: Vec<&str> = err.context.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names.first(), Some(&"file"));
    assert!(names.contains(&"class definition"));
    assert!(names.contains(&"class members"));
    assert!(err.partial.is_empty());
}

#[test]
fn unclosed_class_keeps_partial_members_on_request() {
    let text = "class A {\nint x;\n";
    let mut root = Composite::new(ItemKind::File);
    let err = parse(
        &mut root,
        Cursor::from(text),
        &grammar().scopes.file,
        false,
        true,
    )
    .unwrap_err();
    assert!(!err.partial.is_empty());
    assert!(err.partial.iter().all(|span| span.end <= text.len()));
    assert!(root.children.is_empty());
}
