//! chevgen compiles a terse grammar-description language into Chevrotain parser code.
//!
//! A grammar is written once as a set of rules; the compiler emits a parser class that
//! wires Chevrotain's primitives (`CONSUME`, `SUBRULE`, `OPTION`, `MANY`, `OR`, ...)
//! together, plus structural type declarations for every CST node the parser produces.
//!
//! See [`dsl`] for the pipeline stages.

pub mod dsl;
