//! The grammar DSL and its compilation pipeline
//!
//! Stages, leaves first:
//!
//! - [`lexer`]: source text to `(Token, Span)` pairs, whitespace dropped.
//! - [`parser`]: recovering combinator parser producing a [`cst::Grammar`] plus diagnostics.
//! - [`indexer`]: assigns per-rule occurrence indices to statements, in place.
//! - [`codegen`]: segment builder, type deriver and assembler.
//!
//! [`processor`] glues the stages together and is what the binary drives.

pub mod codegen;
pub mod config;
pub mod cst;
pub mod error;
pub mod indexer;
pub mod lexer;
pub mod parser;
pub mod processor;
#[cfg(test)]
pub mod testing;

pub use config::GeneratorConfig;
pub use error::{CompileError, Diagnostic, GenerateError};
pub use processor::{compile, Artifacts, Compiler, Targets};
