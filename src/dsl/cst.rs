//! Concrete syntax tree of the grammar DSL
//!
//! The parser produces a [`Grammar`]; the indexer fills in occurrence indices; the code
//! generators only read it afterwards.

pub mod location;
pub mod node;
pub mod visit;

pub use location::{Position, SourceLocation, Span};
pub use node::{
    Alternative, Backtrack, BacktrackTarget, Choice, Consume, Content, Escaped, Gate, Grammar,
    Ident, NodeKind, OptionBlock, Repetition, RootItem, Rule, Skip, Statement, StatementList,
    Subrule,
};
pub use visit::Walker;
