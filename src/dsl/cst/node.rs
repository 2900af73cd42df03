//! CST node definitions
//!
//! Statements are a sum type: each variant carries exactly its own payload. The one
//! cross-field constraint the types do not rule out (separator and gate on the same
//! repetition) is rejected by the segment builder.

use super::location::Span;
use std::fmt;

/// Discriminates node types for diagnostics, segment origins and traversal pruning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Grammar,
    Rule,
    StatementList,
    Consume,
    Skip,
    Subrule,
    Option,
    Many,
    AtLeastOne,
    Or,
    Alternative,
    RawLiteral,
    Gate,
    BacktrackPredicate,
    Error,
}

impl NodeKind {
    /// Kinds that receive an occurrence index
    pub const INDEXED: [NodeKind; 6] = [
        NodeKind::Consume,
        NodeKind::Subrule,
        NodeKind::Option,
        NodeKind::Many,
        NodeKind::AtLeastOne,
        NodeKind::Or,
    ];
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Grammar => "grammar",
            NodeKind::Rule => "rule",
            NodeKind::StatementList => "statement list",
            NodeKind::Consume => "Consume statement",
            NodeKind::Skip => "Skip statement",
            NodeKind::Subrule => "Subrule statement",
            NodeKind::Option => "Option statement",
            NodeKind::Many => "Many statement",
            NodeKind::AtLeastOne => "AtLeastOne statement",
            NodeKind::Or => "Or statement",
            NodeKind::Alternative => "alternative",
            NodeKind::RawLiteral => "raw literal",
            NodeKind::Gate => "gate",
            NodeKind::BacktrackPredicate => "backtrack predicate",
            NodeKind::Error => "unparsed fragment",
        };
        f.write_str(name)
    }
}

/// An identifier: token kind or rule name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// `#...#` text with the delimiters removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped {
    pub text: String,
    pub span: Span,
}

/// A whole grammar file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grammar {
    pub items: Vec<RootItem>,
}

impl Grammar {
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.items.iter().filter_map(|item| match item {
            RootItem::Rule(rule) => Some(rule),
            RootItem::Raw(_) => None,
        })
    }

    pub fn rules_mut(&mut self) -> impl Iterator<Item = &mut Rule> {
        self.items.iter_mut().filter_map(|item| match item {
            RootItem::Rule(rule) => Some(rule),
            RootItem::Raw(_) => None,
        })
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules().find(|rule| rule.name.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootItem {
    Rule(Rule),
    /// Top-level passthrough text, emitted into the class body as is
    Raw(Escaped),
}

/// `[=] [(#config#)] name { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub exposed: bool,
    /// Raw entries of the rule configuration object
    pub config: Vec<Escaped>,
    pub name: Ident,
    pub body: StatementList,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementList {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Consume(Consume),
    Skip(Skip),
    Subrule(Subrule),
    Option(OptionBlock),
    Many(Repetition),
    AtLeastOne(Repetition),
    Or(Choice),
    Raw(Escaped),
    /// Placeholder left by parser recovery
    Error(Span),
}

impl Statement {
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Consume(_) => NodeKind::Consume,
            Statement::Skip(_) => NodeKind::Skip,
            Statement::Subrule(_) => NodeKind::Subrule,
            Statement::Option(_) => NodeKind::Option,
            Statement::Many(_) => NodeKind::Many,
            Statement::AtLeastOne(_) => NodeKind::AtLeastOne,
            Statement::Or(_) => NodeKind::Or,
            Statement::Raw(_) => NodeKind::RawLiteral,
            Statement::Error(_) => NodeKind::Error,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Statement::Consume(s) => s.span.clone(),
            Statement::Skip(s) => s.span.clone(),
            Statement::Subrule(s) => s.span.clone(),
            Statement::Option(s) => s.span.clone(),
            Statement::Many(s) | Statement::AtLeastOne(s) => s.span.clone(),
            Statement::Or(s) => s.span.clone(),
            Statement::Raw(s) => s.span.clone(),
            Statement::Error(span) => span.clone(),
        }
    }

    /// Occurrence index, for the kinds that carry one
    pub fn index(&self) -> Option<usize> {
        match self {
            Statement::Consume(s) => s.index,
            Statement::Subrule(s) => s.index,
            Statement::Option(s) => s.index,
            Statement::Many(s) | Statement::AtLeastOne(s) => s.index,
            Statement::Or(s) => s.index,
            Statement::Skip(_) | Statement::Raw(_) | Statement::Error(_) => None,
        }
    }

    /// Mutable access to the occurrence index slot, if this kind is indexed
    pub fn index_slot(&mut self) -> Option<&mut Option<usize>> {
        match self {
            Statement::Consume(s) => Some(&mut s.index),
            Statement::Subrule(s) => Some(&mut s.index),
            Statement::Option(s) => Some(&mut s.index),
            Statement::Many(s) | Statement::AtLeastOne(s) => Some(&mut s.index),
            Statement::Or(s) => Some(&mut s.index),
            Statement::Skip(_) | Statement::Raw(_) | Statement::Error(_) => None,
        }
    }
}

/// `_[args] Token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consume {
    pub token: Ident,
    pub error: Option<Escaped>,
    pub label: Option<Escaped>,
    pub index: Option<usize>,
    pub span: Span,
}

/// `-Token`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub token: Ident,
    pub span: Span,
}

/// `*[args] rule`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subrule {
    pub rule: Ident,
    pub label: Option<Escaped>,
    /// Raw entries spliced into the options object
    pub passthrough: Option<Escaped>,
    pub index: Option<usize>,
    pub span: Span,
}

/// `?[args] content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionBlock {
    pub content: Content,
    pub gate: Option<Gate>,
    pub max_lookahead: Option<Escaped>,
    pub index: Option<usize>,
    pub span: Span,
}

/// Body of `0+` and `1+`. `error` only ever holds a value for `1+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repetition {
    pub content: Content,
    pub separator: Option<Ident>,
    pub gate: Option<Gate>,
    pub error: Option<Escaped>,
    pub max_lookahead: Option<Escaped>,
    pub index: Option<usize>,
    pub span: Span,
}

impl Repetition {
    pub fn has_arguments(&self) -> bool {
        self.separator.is_some()
            || self.gate.is_some()
            || self.error.is_some()
            || self.max_lookahead.is_some()
    }
}

/// `|[args] \ alt \ alt ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub alternatives: Vec<Alternative>,
    pub error: Option<Escaped>,
    pub max_lookahead: Option<Escaped>,
    pub description: Option<Escaped>,
    pub index: Option<usize>,
    pub span: Span,
}

impl Choice {
    pub fn has_arguments(&self) -> bool {
        self.error.is_some() || self.max_lookahead.is_some() || self.description.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub content: Content,
    pub gate: Option<Gate>,
    pub description: Option<Escaped>,
    pub span: Span,
}

/// The deferred body of a block statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Single(Box<Statement>),
    List(StatementList),
}

impl Content {
    pub fn span(&self) -> Span {
        match self {
            Content::Single(statement) => statement.span(),
            Content::List(list) => list.span.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Raw(Escaped),
    Backtrack(Backtrack),
}

/// `<rule` or `<content`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backtrack {
    pub target: BacktrackTarget,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacktrackTarget {
    Rule(Ident),
    Content(Content),
}
