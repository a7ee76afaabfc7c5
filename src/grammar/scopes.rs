//! Classes, namespaces and whole files. These nest, so some rules refer to themselves.

use crate::{
    ast::ItemKind,
    combinators::{alt, anon, named, not},
    grammar::{declarations::Declarations, lexical::Lexical},
    primitives::{end_of_input, one_of, until_stop},
    rule::Parser,
};

pub struct Scopes {
    pub class_def: Parser,
    pub namespace_leaf: Parser,
    pub anonymous_namespace: Parser,
    pub namespace_def: Parser,
    pub end_of_file: Parser,
    pub file: Parser,
}

impl Scopes {
    pub(crate) fn build(l: &Lexical, d: &Declarations) -> Scopes {
        let ew = &l.eat_white;

        let class_def = Parser::forward("class definition");
        let class_member = alt([
            l.comments.clone(),
            d.access_modifier.clone(),
            class_def.clone(),
            d.class_decl.clone(),
            &d.not_class_struct_union
                + alt([
                    d.typedef_statement.clone(),
                    d.scoped_enum_def.clone(),
                    d.enum_def.clone(),
                    &d.not_typedef_using_enum
                        + alt([
                            d.function_decl.clone(),
                            d.template_function_def.clone(),
                            d.function_def.clone(),
                            d.static_var_def.clone(),
                            d.extern_var_def.clone(),
                            d.global_var_def.clone(),
                        ]),
                ]),
        ]);
        let class_body = &d.class_proto
            + one_of("{")
            + ew
            + named(
                ItemKind::ClassMembers,
                "class members",
                until_stop(class_member, one_of("}")),
            )
            + one_of("}")
            + ew
            + one_of(";")
            + ew;
        let template_class_def = named(
            ItemKind::TemplateClassDef,
            "template class definition",
            &d.template_preamble + &class_body,
        );
        let plain_class_def = named(
            ItemKind::ClassDef,
            "non-template class definition",
            class_body,
        );
        class_def.define(anon(
            "class definition",
            template_class_def | plain_class_def,
        ));

        let not_function_proto = anon(
            "not function proto or template function proto",
            not(&d.function_proto | (&d.template_preamble + &d.function_proto)),
        );
        let namespace_leaf = anon(
            "namespace leaf",
            alt([
                l.comments.clone(),
                l.hash_include_impl.clone(),
                l.hash_include.clone(),
                l.other_preprocessor.clone(),
                class_def.clone(),
                d.class_decl.clone(),
                &d.not_class_struct_union
                    + alt([
                        d.typedef_statement.clone(),
                        d.using_statement.clone(),
                        d.scoped_enum_def.clone(),
                        d.enum_def.clone(),
                        &d.not_typedef_using_enum
                            + alt([
                                l.whitespace.clone(),
                                d.function_decl.clone(),
                                d.template_function_def.clone(),
                                d.function_def.clone(),
                                not_function_proto
                                    + alt([
                                        d.static_var_def.clone(),
                                        d.extern_var_def.clone(),
                                        d.global_var_def.clone(),
                                    ]),
                            ]),
                    ]),
            ]),
        );

        let namespace_keyword = l.keyword("namespace");
        let not_namespace_keyword = not(namespace_keyword.clone());
        let anonymous_namespace = named(
            ItemKind::AnonymousNamespace,
            "anonymous namespace",
            &namespace_keyword
                + ew
                + one_of("{")
                + ew
                + until_stop(namespace_leaf.clone(), one_of("}"))
                + one_of("}")
                + ew,
        );

        let namespace_def = Parser::forward("namespace");
        namespace_def.define(named(
            ItemKind::NamespaceDef,
            "namespace",
            &namespace_keyword
                + &l.whitespace
                + named(
                    ItemKind::NamespaceName,
                    "namespace name",
                    l.identifier.clone(),
                )
                + ew
                + one_of("{")
                + ew
                + named(
                    ItemKind::NamespaceMembers,
                    "namespace members",
                    until_stop(
                        alt([
                            namespace_def.clone(),
                            anonymous_namespace.clone(),
                            &not_namespace_keyword + &namespace_leaf,
                        ]) + ew,
                        one_of("}"),
                    ),
                )
                + one_of("}")
                + ew,
        ));

        let end_of_file = named(ItemKind::EndOfFile, "end of file", end_of_input());
        let file = named(
            ItemKind::File,
            "file",
            ew + until_stop(
                alt([
                    namespace_def.clone(),
                    anonymous_namespace.clone(),
                    not_namespace_keyword + &namespace_leaf,
                ]),
                end_of_file.clone(),
            ) + &end_of_file,
        );

        Scopes {
            class_def,
            namespace_leaf,
            anonymous_namespace,
            namespace_def,
            end_of_file,
            file,
        }
    }
}
