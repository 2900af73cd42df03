//! Public API for the parser.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use chumsky::Stream;

use crate::dsl::cst::{Grammar, Span};
use crate::dsl::error::{Diagnostic, SyntaxError};
use crate::dsl::lexer::{tokenize_with_spans, Token};

use super::combinators::{any_escaped, any_ident, grammar};
use super::ParserError;

/// A best-effort tree and everything that went wrong building it
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub grammar: Grammar,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a spanned token stream; `source_len` places the end-of-input span
///
/// Never fails: when nothing could be recovered the grammar is empty and the errors
/// say why.
pub fn parse_tokens(tokens: Vec<(Token, Span)>, source_len: usize) -> (Grammar, Vec<SyntaxError>) {
    let stream = Stream::from_iter(source_len..source_len, tokens.into_iter());
    let (grammar, errors) = grammar().parse_recovery(stream);
    (
        grammar.unwrap_or_default(),
        errors.into_iter().map(syntax_error).collect(),
    )
}

/// Lex and parse grammar source text
pub fn parse_source(source: &str) -> Parsed {
    let lexed = tokenize_with_spans(source);
    let (grammar, syntax_errors) = parse_tokens(lexed.tokens, source.len());

    let mut diagnostics: Vec<Diagnostic> = lexed.errors.into_iter().map(Diagnostic::from).collect();
    diagnostics.extend(syntax_errors.into_iter().map(Diagnostic::from));
    diagnostics.sort_by_key(|d| (d.span().start, d.span().end));

    Parsed {
        grammar,
        diagnostics,
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => format!("`{}`", token),
        None => "end of input".to_string(),
    }
}

fn describe_expected(token: Option<&Token>) -> String {
    match token {
        Some(token) if *token == any_ident() => "identifier".to_string(),
        Some(token) if *token == any_escaped() => "`#...#` literal".to_string(),
        other => describe(other),
    }
}

fn syntax_error(error: ParserError) -> SyntaxError {
    let message = match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => {
            format!("unclosed delimiter `{}`", delimiter)
        }
        SimpleReason::Unexpected => {
            let mut expected: Vec<String> = error
                .expected()
                .map(|token| describe_expected(token.as_ref()))
                .collect();
            expected.sort();
            expected.dedup();
            let found = describe(error.found());
            if expected.is_empty() {
                format!("unexpected {}", found)
            } else {
                format!("expected {}, found {}", expected.join(" or "), found)
            }
        }
    };
    SyntaxError::new(error.span(), message)
}
