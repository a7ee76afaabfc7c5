//! A grammar for C++-like `.hcp` source, built from the combinators.
//!
//! The rules are built once, on first use, and shared from then on:
//!
//! ```
//! use hcp_parser::{ast::{Composite, ItemKind}, grammar::grammar, parse, Cursor};
//!
//! let text = "int x;\n";
//! let mut root = Composite::new(ItemKind::File);
//! let end = parse(&mut root, Cursor::from(text), &grammar().scopes.file, false, false).unwrap();
//! assert!(end.at_end());
//! ```

pub mod declarations;
pub mod lexical;
pub mod scopes;

use once_cell::sync::Lazy;

use crate::rule::Parser;

use self::{
    declarations::Declarations,
    lexical::{Lexical, LEXICAL},
    scopes::Scopes,
};

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let lexical = &*LEXICAL;
    let declarations = Declarations::build(lexical);
    let scopes = Scopes::build(lexical, &declarations);
    tracing::debug!("built grammar");
    Grammar {
        lexical,
        declarations,
        scopes,
    }
});

/// The process-wide grammar.
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

pub struct Grammar {
    pub lexical: &'static Lexical,
    pub declarations: Declarations,
    pub scopes: Scopes,
}

impl Grammar {
    /// Names accepted by [`Grammar::rule`].
    pub const RULE_NAMES: &'static [&'static str] = &[
        "file",
        "namespace_def",
        "anonymous_namespace",
        "namespace_leaf",
        "class_def",
        "class_decl",
        "function_decl",
        "function_def",
        "template_function_def",
        "function_proto",
        "params",
        "param",
        "type_ref",
        "scoped_name",
        "typedef_statement",
        "using_statement",
        "enum_def",
        "scoped_enum_def",
        "global_var_def",
        "static_var_def",
        "extern_var_def",
        "access_modifier",
        "template_preamble",
        "hash_include",
        "hash_include_impl",
        "other_preprocessor",
        "line_comment",
        "block_comment",
        "comments",
        "string_literal",
        "identifier",
        "whitespace",
        "end_of_file",
    ];

    /// Look up a rule by its snake_case name.
    pub fn rule(&self, name: &str) -> Option<&Parser> {
        let (l, d, s) = (self.lexical, &self.declarations, &self.scopes);
        Some(match name {
            "file" => &s.file,
            "namespace_def" => &s.namespace_def,
            "anonymous_namespace" => &s.anonymous_namespace,
            "namespace_leaf" => &s.namespace_leaf,
            "class_def" => &s.class_def,
            "class_decl" => &d.class_decl,
            "function_decl" => &d.function_decl,
            "function_def" => &d.function_def,
            "template_function_def" => &d.template_function_def,
            "function_proto" => &d.function_proto,
            "params" => &d.params,
            "param" => &d.param,
            "type_ref" => &d.type_ref,
            "scoped_name" => &d.scoped_name,
            "typedef_statement" => &d.typedef_statement,
            "using_statement" => &d.using_statement,
            "enum_def" => &d.enum_def,
            "scoped_enum_def" => &d.scoped_enum_def,
            "global_var_def" => &d.global_var_def,
            "static_var_def" => &d.static_var_def,
            "extern_var_def" => &d.extern_var_def,
            "access_modifier" => &d.access_modifier,
            "template_preamble" => &d.template_preamble,
            "hash_include" => &l.hash_include,
            "hash_include_impl" => &l.hash_include_impl,
            "other_preprocessor" => &l.other_preprocessor,
            "line_comment" => &l.line_comment,
            "block_comment" => &l.block_comment,
            "comments" => &l.comments,
            "string_literal" => &l.string_literal,
            "identifier" => &l.identifier,
            "whitespace" => &l.whitespace,
            "end_of_file" => &s.end_of_file,
            _ => return None,
        })
    }
}
