//! Code generation from an indexed grammar
//!
//! [`builder`] turns rules into a [`segment::Segment`] tree, [`typing`] derives one node
//! interface per rule, and [`assembler`] wraps both into complete files.

pub mod assembler;
pub mod builder;
pub mod formatter;
pub mod segment;
pub mod typing;

pub use assembler::{lexer_tokens, AssembleError, Assembler};
pub use builder::SegmentBuilder;
pub use formatter::{BraceFormatter, CommandFormatter, FormatError, Formatter, Verbatim};
pub use segment::{Origin, Segment};
pub use typing::{derive_types, RuleType};
