//! Names, types, typedefs, enums, functions, variables and class prototypes.

use crate::{
    ast::ItemKind,
    balanced::balanced,
    combinators::{alt, anon, at_least_one, named, not, optional, zero_or_more},
    grammar::lexical::Lexical,
    primitives::{literal, one_of},
    rule::Parser,
};

pub struct Declarations {
    pub class_struct_union: Parser,
    /// Leading `a::b<c>::` qualification, possibly empty.
    pub scope_ref: Parser,
    pub scoped_name: Parser,
    pub cv: Parser,
    pub type_name: Parser,
    pub type_ref: Parser,
    pub typedef_statement: Parser,
    pub using_statement: Parser,
    pub enum_def: Parser,
    pub scoped_enum_def: Parser,
    pub operator_name: Parser,
    pub destructor_name: Parser,
    pub function_qualifiers: Parser,
    pub function_post_qualifiers: Parser,
    pub block: Parser,
    pub init_list: Parser,
    pub function_impl: Parser,
    pub template_empty_preamble: Parser,
    pub template_preamble: Parser,
    pub param: Parser,
    pub params: Parser,
    pub function_proto: Parser,
    pub function_decl: Parser,
    pub function_def: Parser,
    pub template_function_def: Parser,
    pub class_proto: Parser,
    pub class_decl: Parser,
    pub var_name: Parser,
    pub var_initialiser: Parser,
    pub var_non_fp: Parser,
    pub var_fp: Parser,
    pub global_var_def: Parser,
    pub static_var_def: Parser,
    pub extern_var_def: Parser,
    pub access_modifier: Parser,
    pub not_class_struct_union: Parser,
    pub not_typedef_using_enum: Parser,
}

impl Declarations {
    pub(crate) fn build(l: &Lexical) -> Declarations {
        let ew = &l.eat_white;
        let kw = |word: &str| l.keyword(word);
        let tagged_keyword = |kind: ItemKind, word: &str| {
            named(kind, format!("\"{}\"", word), literal(word))
                + not(l.identifier_cont_char.clone())
                + ew
        };
        let bracketed = |x: Parser| literal("(") + ew + x + literal(")") + ew;
        let bracketed_text = literal("(") + balanced(literal(")"), false) + literal(")") + ew;
        let template_args = || one_of("<") + balanced(one_of(">"), true) + one_of(">");

        // names
        let class_struct_union = anon(
            "class/struct/union",
            (literal("class") | literal("struct") | literal("union"))
                + not(l.identifier_cont_char.clone()),
        );
        let typename_keyword = l.keyword_white("typename");
        let scope_ref = anon(
            "scope",
            optional(class_struct_union.clone())
                + ew
                + optional(&l.double_colon + ew)
                + zero_or_more(
                    &l.identifier + ew + optional(template_args() + ew) + &l.double_colon + ew,
                ),
        );
        let scoped_name = anon(
            "scoped name",
            optional(typename_keyword.clone())
                + &scope_ref
                + &l.identifier
                + ew
                + optional(template_args() + ew),
        );
        let unqualified_type_name =
            anon("unqualified type name", &l.identifier + zero_or_more(template_args()));

        // types
        let cv = anon(
            "const/volatile qualifiers",
            zero_or_more((kw("const") | kw("volatile")) + ew),
        );
        let type_qual = anon(
            "const/volatile/*/& type qualifier",
            (kw("const") | kw("volatile") | one_of("*&")) + ew,
        );
        let built_in_type_name = at_least_one(
            alt([
                "char16_t", "char32_t", "char", "wchar_t", "short", "int", "long", "float",
                "double", "signed", "unsigned",
            ]
            .iter()
            .map(|word| literal(word)))
                + not(l.identifier_cont_char.clone())
                + ew,
        );
        let type_name = anon("type name", built_in_type_name | &scoped_name);
        let type_ref = anon(
            "type reference",
            &cv + &type_name
                + ew
                + zero_or_more(type_qual)
                + ew
                + (not(literal(".")) | (literal("...") + ew)),
        );
        let defined_type = named(ItemKind::DefinedType, "defined type", l.identifier.clone()) + ew;

        // keywords that show up in the tree
        let keyword_static = tagged_keyword(ItemKind::KeywordStatic, "static");
        let keyword_extern = tagged_keyword(ItemKind::KeywordExtern, "extern");
        let keyword_friend = tagged_keyword(ItemKind::KeywordFriend, "friend");
        let keyword_virtual = tagged_keyword(ItemKind::KeywordVirtual, "virtual");
        let keyword_explicit = tagged_keyword(ItemKind::KeywordExplicit, "explicit");
        let keyword_override = tagged_keyword(ItemKind::KeywordOverride, "override");
        let keyword_noexcept = tagged_keyword(ItemKind::KeywordNoexcept, "noexcept");
        let keyword_throw = tagged_keyword(ItemKind::KeywordThrow, "throw");
        let keyword_catch = tagged_keyword(ItemKind::KeywordCatch, "catch");
        let keyword_inline = l.keyword_white("inline");
        let keyword_mutable = l.keyword_white("mutable");

        // function names
        let operator_keyword = l.keyword_white("operator");
        // Longer spellings first, so that `*=` isn't taken for `*`.
        let operator_symbol = alt([
            "()", "[]", "<<=", ">>=", "<<", ">>", "==", "!=", "<=", ">=", "++", "+=", "--",
            "-=", "->", "*=", "/=", "%=", "|=", "&=", "~=", "<", ">", "+", "-", "|", "&", "!",
            "%", "=", "*", "~", "/", "new", "delete",
        ]
        .iter()
        .map(|symbol| literal(symbol)));
        let unscoped_operator = &operator_keyword + &operator_symbol + ew;
        let unscoped_destructor = literal("~") + ew + &l.identifier;
        let operator_name = anon("operator name", &scope_ref + &unscoped_operator);
        let destructor_name = anon("destructor name", &scope_ref + &unscoped_destructor);
        let scope = named(ItemKind::Scope, "scope", scope_ref.clone());
        let typed_function_name = &scope
            + named(
                ItemKind::FunctionName,
                "function name",
                &unscoped_operator | &unqualified_type_name,
            );
        let untyped_function_name = &scope
            + named(
                ItemKind::FunctionName,
                "function name",
                alt([
                    unscoped_destructor,
                    unscoped_operator,
                    unqualified_type_name.clone(),
                ]),
            );
        let conversion_operator_name = &scope
            + named(
                ItemKind::FunctionName,
                "conversion operator name",
                &operator_keyword + &type_ref,
            );

        let function_qualifiers = named(
            ItemKind::FunctionQualifiers,
            "function qualifiers",
            zero_or_more(
                alt([
                    keyword_virtual,
                    keyword_explicit,
                    keyword_friend.clone(),
                    keyword_static.clone(),
                    keyword_inline,
                ]) + ew,
            ),
        );
        let throw_clause = (keyword_throw + &bracketed_text)
            | (keyword_noexcept + optional(bracketed_text.clone()));
        let function_post_qualifiers = named(
            ItemKind::FunctionQualifiers,
            "function post-qualifiers",
            &cv + zero_or_more(keyword_override | throw_clause),
        );

        // variables and parameters
        let var_name = named(ItemKind::VarName, "var name", l.identifier.clone()) + ew;
        let array_decl = one_of("[") + balanced(one_of("]"), false) + one_of("]") + ew;
        let var_initialiser = anon(
            "var initialiser",
            named(
                ItemKind::VarInitialiser,
                "variable initialiser",
                named(
                    ItemKind::VarInitialiserOpen,
                    "variable initialiser '='",
                    one_of("="),
                ) + balanced(one_of(");,"), false),
            ) | named(
                ItemKind::VarInitialiser,
                "variable initialiser",
                named(
                    ItemKind::VarInitialiserOpen,
                    "variable initialiser '{'",
                    one_of("{"),
                ) + balanced(one_of("}"), false)
                    + one_of("}"),
            ),
        );
        let no_initialiser_or = |init: &Parser| not(one_of("={")) | init;
        let var_non_fp = anon(
            "non-function pointer var",
            &type_ref
                + &var_name
                + optional(array_decl)
                + no_initialiser_or(&var_initialiser),
        );
        // Function pointer vars take params, and params can be function pointer vars.
        let var_fp = Parser::forward("function pointer var");
        let param = named(
            ItemKind::Param,
            "param",
            not(literal(")")) + alt([var_non_fp.clone(), var_fp.clone(), type_ref.clone()]) + ew,
        );
        let params = named(
            ItemKind::Params,
            "params",
            optional(&param + zero_or_more(literal(",") + ew + &param)) + ew,
        );
        let pointer_to = |name: &Parser| {
            bracketed(&scope_ref + &cv + literal("*") + ew + &cv + name)
                + bracketed(params.clone())
                + &function_post_qualifiers
        };
        var_fp.define(anon(
            "function pointer var",
            &type_ref + pointer_to(&var_name) + no_initialiser_or(&var_initialiser) + ew,
        ));

        // typedef, using, enum
        let typedef_fp = anon(
            "typedef of function pointer",
            kw("typedef")
                + &l.whitespace
                + &type_ref
                + pointer_to(&defined_type)
                + ew
                + one_of(";")
                + ew,
        );
        let typedef_non_fp = kw("typedef")
            + &l.whitespace
            + &type_ref
            + &defined_type
            + one_of(";")
            + ew;
        let typedef_statement = named(
            ItemKind::Typedef,
            "typedef statement",
            typedef_fp | typedef_non_fp,
        );
        let using_statement = named(
            ItemKind::Using,
            "using statement",
            kw("using") + &l.whitespace + balanced(one_of(";"), false) + one_of(";") + ew,
        );
        let enum_name = named(ItemKind::EnumName, "enum name", l.identifier.clone());
        let enum_body = || {
            optional(enum_name.clone())
                + ew
                + literal("{")
                + balanced(one_of("}"), false)
                + one_of("}")
                + ew
                + one_of(";")
                + ew
        };
        let scoped_enum_def = named(
            ItemKind::EnumDef,
            "scoped enum definition",
            kw("enum")
                + &l.whitespace
                + (literal("struct") | literal("class"))
                + &l.whitespace
                + enum_body(),
        );
        let enum_def = named(
            ItemKind::EnumDef,
            "enum definition",
            kw("enum") + &l.whitespace + enum_body(),
        );

        // function bodies
        let block = named(
            ItemKind::Block,
            "block",
            named(ItemKind::BlockOpen, "block open", literal("{"))
                + balanced(one_of("}"), false)
                + literal("}"),
        );
        let init_list = named(
            ItemKind::InitList,
            "initialiser list",
            literal(":") + balanced(one_of("{;:"), false),
        );
        let catch_block = keyword_catch + &bracketed_text + &block;
        let function_impl = named(
            ItemKind::FunctionImpl,
            "function implementation",
            ew + zero_or_more(l.keyword_white("try"))
                + zero_or_more(&init_list + ew)
                + &block
                + zero_or_more(ew + catch_block),
        );

        // templates
        let template_keyword = l.keyword_white("template");
        let template_empty_preamble = named(
            ItemKind::TemplateEmptyPreamble,
            "template empty preamble",
            &template_keyword + one_of("<") + ew + one_of(">") + ew,
        );
        let template_preamble = named(
            ItemKind::TemplatePreamble,
            "template preamble",
            not(template_empty_preamble.clone()) + &template_keyword + template_args() + ew,
        );

        // functions
        let conversion_operator_function_proto = &function_qualifiers
            + conversion_operator_name
            + ew
            + bracketed(params.clone());
        let typed_function_proto = &function_qualifiers
            + &type_ref
            + typed_function_name
            + ew
            + bracketed(params.clone());
        let untyped_function_proto = &function_qualifiers
            + untyped_function_name
            + ew
            + bracketed(params.clone());
        let function_initialiser = anon(
            "function initialiser",
            literal("=") + balanced(literal(";"), false),
        );
        let function_proto = anon(
            "function proto",
            alt([
                conversion_operator_function_proto,
                typed_function_proto,
                untyped_function_proto,
            ]) + &function_post_qualifiers
                + (not(literal("=")) | function_initialiser),
        );
        let function_decl = named(
            ItemKind::FunctionDecl,
            "function declaration",
            optional(&template_empty_preamble | &template_preamble)
                + &function_proto
                + ew
                + one_of(";")
                + ew,
        );
        let function_def_unnamed = &function_proto
            + &function_impl
            + named(ItemKind::Whitespace, "whitespace", ew.clone());
        let function_def = named(
            ItemKind::FunctionDef,
            "non-template function definition",
            optional(template_empty_preamble.clone()) + &function_def_unnamed,
        );
        let template_function_def = named(
            ItemKind::TemplateFunctionDef,
            "template function definition",
            at_least_one(template_preamble.clone()) + &function_def_unnamed,
        );

        // classes
        let class_name = optional(typename_keyword)
            + optional(l.double_colon.clone())
            + ew
            + zero_or_more(&unqualified_type_name + ew + &l.double_colon + ew)
            + &unqualified_type_name;
        let class_proto = anon(
            "class prototype",
            zero_or_more(&template_preamble | &template_empty_preamble)
                + optional(keyword_friend)
                + &class_struct_union
                + &l.whitespace
                + named(ItemKind::ClassName, "class name", class_name)
                + ew
                + balanced(one_of("{;"), false),
        );
        let class_decl = named(
            ItemKind::ClassForwardDecl,
            "class forward-declaration",
            &class_proto + one_of(";") + ew,
        );

        // variable definitions
        let var_def = optional(keyword_mutable) + (&var_non_fp | &var_fp) + ew;
        let global_var_def = named(
            ItemKind::GlobalVarDef,
            "global variable definition",
            &var_def + literal(";") + ew,
        );
        let static_var_def = named(
            ItemKind::StaticVarDef,
            "static variable definition",
            keyword_static + ew + &var_def + literal(";") + ew,
        );
        let extern_var_def = named(
            ItemKind::ExternVarDef,
            "extern variable definition",
            keyword_extern + ew + &var_def + literal(";") + ew,
        );
        let access_modifier = named(
            ItemKind::AccessModifier,
            "public/private/protected: marker",
            (literal("public") | literal("private") | literal("protected"))
                + ew
                + one_of(":")
                + ew,
        );

        let not_class_struct_union = not(class_struct_union.clone());
        let not_typedef_using_enum = not(kw("typedef") | kw("using") | kw("enum"));

        Declarations {
            class_struct_union,
            scope_ref,
            scoped_name,
            cv,
            type_name,
            type_ref,
            typedef_statement,
            using_statement,
            enum_def,
            scoped_enum_def,
            operator_name,
            destructor_name,
            function_qualifiers,
            function_post_qualifiers,
            block,
            init_list,
            function_impl,
            template_empty_preamble,
            template_preamble,
            param,
            params,
            function_proto,
            function_decl,
            function_def,
            template_function_def,
            class_proto,
            class_decl,
            var_name,
            var_initialiser,
            var_non_fp,
            var_fp,
            global_var_def,
            static_var_def,
            extern_var_def,
            access_modifier,
            not_class_struct_union,
            not_typedef_using_enum,
        }
    }
}
