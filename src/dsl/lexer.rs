//! Lexer module for the grammar DSL
//!
//! A single logos pass produces the whole token stream: the DSL has no layout-sensitive
//! constructs, so there is no token transformation stage after it. Whitespace is
//! skipped by the lexer; unrecognized characters are collected as [`LexicalError`]s
//! and lexing resumes right after them.
//!
//! [`LexicalError`]: crate::dsl::error::LexicalError

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize_with_spans, Lexed};
pub use tokens::Token;
