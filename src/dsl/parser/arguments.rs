//! Argument blocks and their per-statement validation
//!
//! Every owner parses the same generic argument list; which kinds may appear is decided
//! afterwards, so a misplaced argument becomes a recorded syntax error rather than a
//! parse failure that would throw away the surrounding statement.

use chumsky::prelude::*;
use std::fmt;

use crate::dsl::cst::{Escaped, Gate, Ident, NodeKind, Span};
use crate::dsl::lexer::Token;

use super::ParserError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgKind {
    Gate,
    Separator,
    Error,
    MaxLookahead,
    Label,
    Raw,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgKind::Gate => "gate `>`",
            ArgKind::Separator => "separator `;`",
            ArgKind::Error => "error message `!`",
            ArgKind::MaxLookahead => "max lookahead `^`",
            ArgKind::Label => "label `@`",
            ArgKind::Raw => "raw `#...#`",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Argument {
    Gate(Gate),
    Separator(Ident),
    Error(Escaped),
    MaxLookahead(Escaped),
    Label(Escaped),
    Raw(Escaped),
}

impl Argument {
    fn kind(&self) -> ArgKind {
        match self {
            Argument::Gate(_) => ArgKind::Gate,
            Argument::Separator(_) => ArgKind::Separator,
            Argument::Error(_) => ArgKind::Error,
            Argument::MaxLookahead(_) => ArgKind::MaxLookahead,
            Argument::Label(_) => ArgKind::Label,
            Argument::Raw(_) => ArgKind::Raw,
        }
    }
}

/// Arguments sorted by kind, ready to be moved into a node
#[derive(Debug, Default)]
pub(crate) struct ArgumentSlots {
    pub gate: Option<Gate>,
    pub separator: Option<Ident>,
    pub error: Option<Escaped>,
    pub max_lookahead: Option<Escaped>,
    pub label: Option<Escaped>,
    pub raw: Option<Escaped>,
}

fn permitted(owner: NodeKind) -> &'static [ArgKind] {
    match owner {
        NodeKind::Consume => &[ArgKind::Error, ArgKind::Label],
        NodeKind::Subrule => &[ArgKind::Label, ArgKind::Raw],
        NodeKind::Option => &[ArgKind::Gate, ArgKind::MaxLookahead],
        NodeKind::Many => &[ArgKind::Separator, ArgKind::Gate, ArgKind::MaxLookahead],
        NodeKind::AtLeastOne => &[
            ArgKind::Separator,
            ArgKind::Gate,
            ArgKind::Error,
            ArgKind::MaxLookahead,
        ],
        NodeKind::Or => &[ArgKind::Error, ArgKind::MaxLookahead, ArgKind::Raw],
        NodeKind::Alternative => &[ArgKind::Gate, ArgKind::Raw],
        _ => &[],
    }
}

/// Distribute parsed arguments into slots, reporting disallowed and repeated kinds
///
/// A repeated kind is reported and the last occurrence is kept.
pub(crate) fn sort_arguments(
    owner: NodeKind,
    arguments: Vec<(Argument, Span)>,
    emit: &mut dyn FnMut(ParserError),
) -> ArgumentSlots {
    let allowed = permitted(owner);
    let mut slots = ArgumentSlots::default();

    for (argument, span) in arguments {
        let kind = argument.kind();
        if !allowed.contains(&kind) {
            emit(Simple::custom(
                span,
                format!("{} argument is not allowed on {}", kind, owner),
            ));
            continue;
        }
        let replaced = match argument {
            Argument::Gate(gate) => slots.gate.replace(gate).is_some(),
            Argument::Separator(ident) => slots.separator.replace(ident).is_some(),
            Argument::Error(text) => slots.error.replace(text).is_some(),
            Argument::MaxLookahead(text) => slots.max_lookahead.replace(text).is_some(),
            Argument::Label(text) => slots.label.replace(text).is_some(),
            Argument::Raw(text) => slots.raw.replace(text).is_some(),
        };
        if replaced {
            emit(Simple::custom(
                span,
                format!("duplicate {} argument on {}", kind, owner),
            ));
        }
    }

    slots
}

/// `( arg [,] arg ... )` or `{ arg [,] arg ... }`
///
/// The brace form is only taken when an argument marker follows `{`, otherwise the
/// brace belongs to a statement list.
pub(crate) fn arguments<G>(
    gate: G,
) -> impl Parser<Token, Vec<(Argument, Span)>, Error = ParserError> + Clone
where
    G: Parser<Token, Gate, Error = ParserError> + Clone,
{
    let argument = choice((
        just(Token::RAngle).ignore_then(gate).map(Argument::Gate),
        just(Token::Semicolon)
            .ignore_then(super::ident())
            .map(Argument::Separator),
        just(Token::Exclamation)
            .ignore_then(super::escaped())
            .map(Argument::Error),
        just(Token::Caret)
            .ignore_then(super::escaped())
            .map(Argument::MaxLookahead),
        just(Token::At)
            .ignore_then(super::escaped())
            .map(Argument::Label),
        super::escaped().map(Argument::Raw),
    ))
    .map_with_span(|argument, span| (argument, span));

    let list = argument
        .then_ignore(just(Token::Comma).or_not())
        .repeated()
        .at_least(1);

    let parenthesized = list
        .clone()
        .delimited_by(just(Token::LParen), just(Token::RParen));
    let braced = list.delimited_by(
        just(Token::LCurly).then(filter(Token::is_argument_marker).rewind()),
        just(Token::RCurly),
    );

    parenthesized.or(braced)
}
