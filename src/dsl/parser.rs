//! Parser module for the grammar DSL
//!
//! A recursive-descent parser built from chumsky combinators, one combinator per CST
//! node kind. Parsing recovers from errors: an unparseable `{ ... }` block is skipped
//! to its matching brace and stands in the tree as an error placeholder, junk between
//! rules is skipped token by token, and leftovers after the last rule are reported
//! and dropped. The caller always gets a tree back and decides, based on the
//! collected diagnostics, whether to generate from it.
//!
//! ## Testing
//!
//! Parser tests assert on trees through the fluent API in the
//! [testing module](crate::dsl::testing).

pub mod api;
mod arguments;
mod combinators;

use chumsky::error::Simple;

use crate::dsl::lexer::Token;

pub(crate) use combinators::{escaped, ident};

/// Type alias for parser error
pub(crate) type ParserError = Simple<Token>;

pub use api::{parse_source, parse_tokens, Parsed};
