//! The syntax tree produced by a parse.
//!
//! A node is either a leaf spanning a slice of the input or a tagged composite
//! owning its children. Nodes borrow the input buffer through their cursors,
//! so a tree lives no longer than the text it was parsed from.

use std::fmt::{self, Write};

use crate::{cursor::Cursor, display::BstrFmt};

/// Tags for composite nodes built by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    LineComment,
    BlockComment,
    Comments,
    StringChars,
    StringLiteral,
    TargetOfHashInclude,
    HashInclude,
    HashIncludeImpl,
    OtherPreprocessor,
    Whitespace,
    DefinedType,
    Using,
    EnumName,
    EnumDef,
    Scope,
    FunctionName,
    Params,
    Param,
    KeywordStatic,
    KeywordExtern,
    KeywordFriend,
    KeywordVirtual,
    KeywordExplicit,
    KeywordOverride,
    KeywordNoexcept,
    KeywordThrow,
    KeywordCatch,
    FunctionQualifiers,
    BlockOpen,
    Block,
    InitList,
    FunctionImpl,
    TemplateEmptyPreamble,
    TemplatePreamble,
    FunctionDecl,
    FunctionDef,
    TemplateFunctionDef,
    ClassName,
    ClassForwardDecl,
    VarName,
    VarInitialiserOpen,
    VarInitialiser,
    Typedef,
    GlobalVarDef,
    StaticVarDef,
    ExternVarDef,
    AccessModifier,
    ClassMembers,
    ClassDef,
    TemplateClassDef,
    AnonymousNamespace,
    NamespaceName,
    NamespaceMembers,
    NamespaceDef,
    EndOfFile,
    File,
}

/// A composite node: a tag and its children, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite<'a> {
    pub kind: ItemKind,
    pub children: Vec<Node<'a>>,
}

impl<'a> Composite<'a> {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: ItemKind, children: Vec<Node<'a>>) -> Self {
        Self { kind, children }
    }

    /// Concatenated text of every leaf underneath.
    pub fn reconstruct(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.reconstruct_into(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<'a> {
    /// The input between two cursors.
    Text { start: Cursor<'a>, end: Cursor<'a> },
    Composite(Composite<'a>),
}

impl<'a> Node<'a> {
    pub fn text_between(start: Cursor<'a>, end: Cursor<'a>) -> Self {
        Node::Text { start, end }
    }

    pub fn composite(kind: ItemKind, children: Vec<Node<'a>>) -> Self {
        Node::Composite(Composite::with_children(kind, children))
    }

    /// Where this node starts. An empty composite has no extent and reports `None`.
    pub fn start(&self) -> Option<Cursor<'a>> {
        match self {
            Node::Text { start, .. } => Some(*start),
            Node::Composite(c) => c.children.iter().find_map(Node::start),
        }
    }

    pub fn end(&self) -> Option<Cursor<'a>> {
        match self {
            Node::Text { end, .. } => Some(*end),
            Node::Composite(c) => c.children.iter().rev().find_map(Node::end),
        }
    }

    /// The input bytes this node spans, from its first leaf to its last.
    pub fn bytes(&self) -> &'a [u8] {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => start.slice_to(end),
            _ => &[],
        }
    }

    /// The spanned input as (lossily decoded) text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.bytes()).into_owned()
    }

    pub fn kind(&self) -> Option<ItemKind> {
        match self {
            Node::Text { .. } => None,
            Node::Composite(c) => Some(c.kind),
        }
    }

    pub fn children(&self) -> &[Node<'a>] {
        match self {
            Node::Text { .. } => &[],
            Node::Composite(c) => &c.children,
        }
    }

    /// Depth-first, pre-order search for the first composite tagged `kind`,
    /// this node included.
    pub fn find_first(&self, kind: ItemKind) -> Option<&Node<'a>> {
        if self.kind() == Some(kind) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find_first(kind))
    }

    /// Every composite tagged `kind`, in source order. Matches are not searched
    /// for nested matches of the same kind.
    pub fn find_all(&self, kind: ItemKind) -> Vec<&Node<'a>> {
        let mut out = Vec::new();
        self.collect(kind, &mut out);
        out
    }

    fn collect<'s>(&'s self, kind: ItemKind, out: &mut Vec<&'s Node<'a>>) {
        if self.kind() == Some(kind) {
            out.push(self);
            return;
        }
        for child in self.children() {
            child.collect(kind, out);
        }
    }

    /// Concatenated text of every leaf underneath.
    ///
    /// Unlike `text`, this skips anything between leaves that no leaf covers.
    pub fn reconstruct(&self) -> String {
        let mut out = String::new();
        self.reconstruct_into(&mut out);
        out
    }

    fn reconstruct_into(&self, out: &mut String) {
        match self {
            Node::Text { start, end } => out.push_str(&String::from_utf8_lossy(start.slice_to(*end))),
            Node::Composite(c) => {
                for child in &c.children {
                    child.reconstruct_into(out);
                }
            }
        }
    }

    /// An indented outline of the tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing to a String can't fail.
        let _ = self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, w: &mut impl Write, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            w.write_str("  ")?;
        }
        match self {
            Node::Text { start, end } => {
                writeln!(w, "{:?} at {}", BstrFmt(start.slice_to(*end)), start)
            }
            Node::Composite(c) => {
                match self.start() {
                    Some(start) => writeln!(w, "{:?} at {}", c.kind, start)?,
                    None => writeln!(w, "{:?} (empty)", c.kind)?,
                }
                for child in &c.children {
                    child.dump_into(w, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}
