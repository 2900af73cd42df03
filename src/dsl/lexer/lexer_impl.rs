//! Lexer implementation
//!
//! Drives the logos lexer over a source string, keeping each token's byte span and
//! collecting unrecognized input instead of stopping at it.

use crate::dsl::cst::Span;
use crate::dsl::error::LexicalError;
use crate::dsl::lexer::tokens::Token;
use logos::Logos;

/// Tokens with their spans, plus whatever could not be tokenized
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lexed {
    pub tokens: Vec<(Token, Span)>,
    pub errors: Vec<LexicalError>,
}

impl Lexed {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Tokenize source text, preserving spans for the parser
///
/// Adjacent unrecognized characters are reported as one error.
pub fn tokenize_with_spans(source: &str) -> Lexed {
    let mut lexer = Token::lexer(source);
    let mut lexed = Lexed::default();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => lexed.tokens.push((token, span)),
            Err(()) => match lexed.errors.last_mut() {
                Some(previous) if previous.span.end == span.start => {
                    previous.span.end = span.end;
                    previous.text.push_str(&source[span]);
                }
                _ => lexed.errors.push(LexicalError {
                    text: source[span.clone()].to_string(),
                    span,
                }),
            },
        }
    }

    lexed
}
