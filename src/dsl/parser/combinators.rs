//! Parser combinators for the grammar DSL, one per production.

use chumsky::prelude::*;
use chumsky::Stream;

use crate::dsl::cst::{
    Alternative, Backtrack, BacktrackTarget, Choice, Consume, Content, Escaped, Gate, Grammar,
    Ident, NodeKind, OptionBlock, Repetition, RootItem, Rule, Skip, Span, Statement,
    StatementList, Subrule,
};
use crate::dsl::lexer::Token;

use super::arguments::{arguments, sort_arguments, Argument};
use super::ParserError;

/// Stands in the expected set for "any identifier"
pub(crate) fn any_ident() -> Token {
    Token::Ident(String::new())
}

/// Stands in the expected set for "any `#...#` literal"
pub(crate) fn any_escaped() -> Token {
    Token::Escaped(String::new())
}

/// `select!` reports nothing as expected; name the token class instead
fn expecting(class: fn() -> Token) -> impl Fn(ParserError) -> ParserError + Clone {
    move |error| {
        let span = error.span();
        let found = error.found().cloned();
        error.merge(ParserError::expected_input_found(span, [Some(class())], found))
    }
}

pub(crate) fn ident() -> impl Parser<Token, Ident, Error = ParserError> + Clone {
    select! { Token::Ident(name) => name }
        .map_err(expecting(any_ident))
        .map_with_span(|name, span| Ident { name, span })
}

pub(crate) fn escaped() -> impl Parser<Token, Escaped, Error = ParserError> + Clone {
    select! { Token::Escaped(text) => text }
        .map_err(expecting(any_escaped))
        .map_with_span(|text, span| Escaped { text, span })
}

/// `{ statement [;] ... }`
///
/// An unparseable list is skipped up to its matching brace and replaced by an error
/// placeholder, so the rest of the grammar still parses.
fn block<S>(statement: S) -> impl Parser<Token, StatementList, Error = ParserError> + Clone
where
    S: Parser<Token, Statement, Error = ParserError> + Clone,
{
    statement
        .then_ignore(just(Token::Semicolon).or_not())
        .repeated()
        .delimited_by(just(Token::LCurly), just(Token::RCurly))
        .map_with_span(|statements, span| StatementList { statements, span })
        .recover_with(nested_delimiters(
            Token::LCurly,
            Token::RCurly,
            [(Token::LParen, Token::RParen)],
            |span: Span| StatementList {
                statements: vec![Statement::Error(span.clone())],
                span,
            },
        ))
}

fn repetition(
    (arguments, content): (Vec<(Argument, Span)>, Content),
    kind: NodeKind,
    span: Span,
    emit: &mut dyn FnMut(ParserError),
) -> Repetition {
    let slots = sort_arguments(kind, arguments, emit);
    Repetition {
        content,
        separator: slots.separator,
        gate: slots.gate,
        error: slots.error,
        max_lookahead: slots.max_lookahead,
        index: None,
        span,
    }
}

pub(crate) fn statement() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    recursive(|statement| {
        let list = block(statement.clone()).boxed();

        let content = statement
            .clone()
            .map(|s| Content::Single(Box::new(s)))
            .or(list.map(Content::List))
            .boxed();

        let backtrack = just(Token::LAngle)
            .ignore_then(
                ident()
                    .map(BacktrackTarget::Rule)
                    .or(content.clone().map(BacktrackTarget::Content)),
            )
            .map_with_span(|target, span| Backtrack { target, span });

        let gate = escaped().map(Gate::Raw).or(backtrack.map(Gate::Backtrack));

        let args = arguments(gate)
            .or_not()
            .map(Option::unwrap_or_default)
            .boxed();

        let at_least_one = just(Token::OnePlus)
            .ignore_then(args.clone())
            .then(content.clone())
            .validate(|parts, span, emit| {
                Statement::AtLeastOne(repetition(parts, NodeKind::AtLeastOne, span, emit))
            });

        let many = just(Token::ZeroPlus)
            .ignore_then(args.clone())
            .then(content.clone())
            .validate(|parts, span, emit| {
                Statement::Many(repetition(parts, NodeKind::Many, span, emit))
            });

        let option = just(Token::Question)
            .ignore_then(args.clone())
            .then(content.clone())
            .validate(|(arguments, content), span, emit| {
                let slots = sort_arguments(NodeKind::Option, arguments, emit);
                Statement::Option(OptionBlock {
                    content,
                    gate: slots.gate,
                    max_lookahead: slots.max_lookahead,
                    index: None,
                    span,
                })
            });

        let alternative = just(Token::Backslash)
            .ignore_then(args.clone())
            .then(content)
            .validate(|(arguments, content), span, emit| {
                let slots = sort_arguments(NodeKind::Alternative, arguments, emit);
                Alternative {
                    content,
                    gate: slots.gate,
                    description: slots.raw,
                    span,
                }
            });

        let or = just(Token::VBar)
            .ignore_then(args.clone())
            .then(alternative.repeated().at_least(1))
            .validate(|(arguments, alternatives), span, emit| {
                let slots = sort_arguments(NodeKind::Or, arguments, emit);
                Statement::Or(Choice {
                    alternatives,
                    error: slots.error,
                    max_lookahead: slots.max_lookahead,
                    description: slots.raw,
                    index: None,
                    span,
                })
            });

        let consume = just(Token::Underscore)
            .ignore_then(args.clone())
            .then(ident())
            .validate(|(arguments, token), span, emit| {
                let slots = sort_arguments(NodeKind::Consume, arguments, emit);
                Statement::Consume(Consume {
                    token,
                    error: slots.error,
                    label: slots.label,
                    index: None,
                    span,
                })
            });

        let skip = just(Token::Minus)
            .ignore_then(ident())
            .map_with_span(|token, span| Statement::Skip(Skip { token, span }));

        let subrule = just(Token::Asterisk)
            .ignore_then(args)
            .then(ident())
            .validate(|(arguments, rule), span, emit| {
                let slots = sort_arguments(NodeKind::Subrule, arguments, emit);
                Statement::Subrule(Subrule {
                    rule,
                    label: slots.label,
                    passthrough: slots.raw,
                    index: None,
                    span,
                })
            });

        let raw = escaped().map(Statement::Raw);

        choice((
            at_least_one,
            many,
            option,
            or,
            consume,
            skip,
            subrule,
            raw,
        ))
        .boxed()
    })
}

/// `[=] [(#config# ...)] name { ... }`
pub(crate) fn rule() -> impl Parser<Token, Rule, Error = ParserError> + Clone {
    let config = escaped()
        .repeated()
        .at_least(1)
        .delimited_by(just(Token::LParen), just(Token::RParen));

    just(Token::Equals)
        .or_not()
        .then(config.or_not())
        .then(ident())
        .then(block(statement()))
        .map_with_span(|(((exposed, config), name), body), span| Rule {
            exposed: exposed.is_some(),
            config: config.unwrap_or_default(),
            name,
            body,
            span,
        })
}

fn root_item() -> impl Parser<Token, RootItem, Error = ParserError> + Clone {
    rule().map(RootItem::Rule).or(escaped().map(RootItem::Raw))
}

/// Tokens after the last item that no item could resync on
///
/// They are reparsed on their own to report why they do not form a rule, then dropped,
/// so the rules before them survive.
fn trailing_input() -> impl Parser<Token, (), Error = ParserError> {
    any()
        .map_with_span(|token, span: Span| (token, span))
        .repeated()
        .validate(|leftover, span: Span, emit| {
            if leftover.is_empty() {
                return;
            }
            let eoi = span.end..span.end;
            let stream = Stream::from_iter(eoi, leftover.into_iter());
            match root_item().then_ignore(end()).parse(stream) {
                Err(errors) => {
                    for error in errors {
                        emit(error);
                    }
                }
                Ok(_) => emit(ParserError::custom(span, "unexpected input after the last rule")),
            }
        })
        .ignored()
}

/// Whole grammar file; junk between rules is skipped token by token
pub(crate) fn grammar() -> impl Parser<Token, Grammar, Error = ParserError> {
    root_item()
        .recover_with(skip_then_retry_until::<Token, 0>([]))
        .repeated()
        .then_ignore(trailing_input())
        .then_ignore(end())
        .map(|items| Grammar { items })
}
