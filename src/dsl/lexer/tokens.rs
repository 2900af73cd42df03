//! Token definitions for the grammar DSL
//!
//! The tokens are defined using the logos derive macro. Whitespace is skipped at the
//! lexer level and never reaches the parser.
//!
//! Identifiers never start with `_`: the consume marker binds first, so `_Bar` lexes as
//! `Underscore` followed by `Ident("Bar")`. Identifier characters are ASCII only.
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible tokens of the grammar DSL
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Serialize)]
#[logos(skip r"\s+")]
pub enum Token {
    /// `#...#` passthrough text; the payload excludes the delimiters.
    #[regex(r"#[^#]*#", |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_owned()
    })]
    Escaped(String),

    // Statement markers
    #[token("1+")]
    OnePlus,
    #[token("0+")]
    ZeroPlus,
    #[token("?")]
    Question,
    #[token("|")]
    VBar,
    #[token("\\")]
    Backslash,
    #[token("_")]
    Underscore,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("<")]
    LAngle,
    #[token("=")]
    Equals,

    // Argument markers
    #[token(";")]
    Semicolon,
    #[token(">")]
    RAngle,
    #[token("!")]
    Exclamation,
    #[token("^")]
    Caret,
    #[token("@")]
    At,

    #[regex(r"[A-Za-z0-9][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Ident(String),

    // Punctuation
    #[token(",")]
    Comma,
    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

impl Token {
    /// Check if this token opens an argument inside a brace-delimited argument block
    pub fn is_argument_marker(&self) -> bool {
        matches!(
            self,
            Token::Semicolon | Token::RAngle | Token::Exclamation | Token::Caret | Token::At
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Escaped(text) => write!(f, "#{}#", text),
            Token::Ident(name) => write!(f, "{}", name),
            Token::OnePlus => write!(f, "1+"),
            Token::ZeroPlus => write!(f, "0+"),
            Token::Question => write!(f, "?"),
            Token::VBar => write!(f, "|"),
            Token::Backslash => write!(f, "\\"),
            Token::Underscore => write!(f, "_"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::LAngle => write!(f, "<"),
            Token::Equals => write!(f, "="),
            Token::Semicolon => write!(f, ";"),
            Token::RAngle => write!(f, ">"),
            Token::Exclamation => write!(f, "!"),
            Token::Caret => write!(f, "^"),
            Token::At => write!(f, "@"),
            Token::Comma => write!(f, ","),
            Token::LCurly => write!(f, "{{"),
            Token::RCurly => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        Token::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_escaped_strips_delimiters() {
        assert_eq!(
            lex_all("#a > b#"),
            vec![Token::Escaped("a > b".to_string())]
        );
    }

    #[test]
    fn test_empty_escaped() {
        assert_eq!(lex_all("##"), vec![Token::Escaped(String::new())]);
    }

    #[test]
    fn test_underscore_binds_before_identifier() {
        assert_eq!(
            lex_all("_Bar"),
            vec![Token::Underscore, Token::Ident("Bar".to_string())]
        );
    }

    #[test]
    fn test_repetition_markers_beat_digit_identifiers() {
        assert_eq!(lex_all("1+"), vec![Token::OnePlus]);
        assert_eq!(lex_all("0+"), vec![Token::ZeroPlus]);
        assert_eq!(lex_all("1"), vec![Token::Ident("1".to_string())]);
    }

    #[test]
    fn test_identifier_keeps_inner_underscores() {
        assert_eq!(
            lex_all("foo_bar2"),
            vec![Token::Ident("foo_bar2".to_string())]
        );
    }

    #[test]
    fn test_whitespace_is_skipped() {
        assert_eq!(
            lex_all(" {\n\t_A ; }"),
            vec![
                Token::LCurly,
                Token::Underscore,
                Token::Ident("A".to_string()),
                Token::Semicolon,
                Token::RCurly,
            ]
        );
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let results: Vec<_> = Token::lexer("$").collect();
        assert_eq!(results, vec![Err(())]);
    }

    #[test]
    fn test_display_roundtrips_punctuation() {
        let rendered: Vec<String> = lex_all("{ } ( ) \\ 1+")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(rendered, vec!["{", "}", "(", ")", "\\", "1+"]);
    }

    #[test]
    fn test_argument_markers() {
        for marker in [";", ">", "!", "^", "@"] {
            let tokens = lex_all(marker);
            assert!(tokens[0].is_argument_marker(), "{} should be a marker", marker);
        }
        assert!(!Token::LCurly.is_argument_marker());
    }
}
