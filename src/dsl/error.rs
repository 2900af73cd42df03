//! Error types for the compilation pipeline
//!
//! Lexical and syntax errors are collected next to a best-effort tree and never abort
//! parsing. Generation errors are fatal for the compile that raised them.

use crate::dsl::config::ConfigError;
use crate::dsl::codegen::formatter::FormatError;
use crate::dsl::cst::{NodeKind, Position, SourceLocation, Span};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The tokenizer met text no token matches
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
#[error("unrecognized input {text:?}")]
pub struct LexicalError {
    pub span: Span,
    pub text: String,
}

/// The parser could not match a production, or an argument is not allowed where it appears
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

/// A recoverable problem found while reading the grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

impl Diagnostic {
    pub fn span(&self) -> &Span {
        match self {
            Diagnostic::Lexical(e) => &e.span,
            Diagnostic::Syntax(e) => &e.span,
        }
    }

    pub fn locate(self, location: &SourceLocation) -> LocatedDiagnostic {
        LocatedDiagnostic {
            position: location.start_of(self.span()),
            diagnostic: self,
        }
    }
}

/// A diagnostic paired with its line/column for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDiagnostic {
    pub position: Position,
    pub diagnostic: Diagnostic,
}

impl fmt::Display for LocatedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.diagnostic)
    }
}

/// Fatal problems met while generating code from a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("malformed tree in rule `{rule}`: {kind} {problem}")]
    MalformedTree {
        rule: String,
        kind: NodeKind,
        problem: String,
        span: Span,
    },
    #[error("{kind} in rule `{rule}` cannot have both a separator and a gate")]
    ConflictingArguments {
        rule: String,
        kind: NodeKind,
        span: Span,
    },
}

impl GenerateError {
    pub fn malformed(rule: &str, kind: NodeKind, problem: impl Into<String>, span: Span) -> Self {
        GenerateError::MalformedTree {
            rule: rule.to_string(),
            kind,
            problem: problem.into(),
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            GenerateError::MalformedTree { span, .. } => span,
            GenerateError::ConflictingArguments { span, .. } => span,
        }
    }
}

/// Everything that can stop a compile
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{}", render_rejected(.0))]
    Rejected(Vec<LocatedDiagnostic>),
    #[error("{position}: {source}")]
    Generate {
        position: Position,
        #[source]
        source: GenerateError,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
}

fn render_rejected(diagnostics: &[LocatedDiagnostic]) -> String {
    let mut out = format!("grammar has {} error(s)", diagnostics.len());
    for diagnostic in diagnostics {
        out.push_str("\n  ");
        out.push_str(&diagnostic.to_string());
    }
    out
}
