//! Compilation pipeline
//!
//! Source text goes through lexing, parsing, indexing and assembly. Lexical and syntax
//! problems are collected; a compile that collected any refuses to generate and reports
//! all of them with line/column positions. Generation either yields complete files or
//! fails.

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::dsl::codegen::assembler::{AssembleError, Assembler};
use crate::dsl::codegen::formatter::{BraceFormatter, Formatter};
use crate::dsl::config::GeneratorConfig;
use crate::dsl::cst::{Grammar, SourceLocation};
use crate::dsl::error::{CompileError, Diagnostic, GenerateError, LexicalError};
use crate::dsl::indexer::index_grammar;
use crate::dsl::lexer::{tokenize_with_spans, Token};
use crate::dsl::parser::parse_source;

/// What to do when the tokenizer meets unrecognized input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexPolicy {
    /// Keep going and report lexical errors together with syntax errors
    #[default]
    Recover,
    /// Stop before parsing and report only the lexical errors
    Strict,
}

/// Which artifacts a compile produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub parser: bool,
    pub typing: bool,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            parser: true,
            typing: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub parser: Option<String>,
    pub typing: Option<String>,
}

pub struct Compiler {
    config: GeneratorConfig,
    formatter: Box<dyn Formatter>,
    lex_policy: LexPolicy,
    targets: Targets,
}

impl Compiler {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            formatter: Box::new(BraceFormatter::default()),
            lex_policy: LexPolicy::default(),
            targets: Targets::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_lex_policy(mut self, policy: LexPolicy) -> Self {
        self.lex_policy = policy;
        self
    }

    pub fn with_targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }

    /// Parse and index, rejecting any source that produced diagnostics
    pub fn analyze(&self, source: &str) -> Result<Grammar, CompileError> {
        let location = SourceLocation::new(source);
        let reject = |diagnostics: Vec<Diagnostic>| {
            CompileError::Rejected(
                diagnostics
                    .into_iter()
                    .map(|diagnostic| diagnostic.locate(&location))
                    .collect(),
            )
        };

        if self.lex_policy == LexPolicy::Strict {
            let lexed = tokenize_with_spans(source);
            if !lexed.is_clean() {
                return Err(reject(
                    lexed.errors.into_iter().map(Diagnostic::from).collect(),
                ));
            }
        }

        let parsed = parse_source(source);
        if !parsed.is_clean() {
            debug!(count = parsed.diagnostics.len(), "rejecting grammar");
            return Err(reject(parsed.diagnostics));
        }

        let mut grammar = parsed.grammar;
        index_grammar(&mut grammar).map_err(|error| generate_error(&location, error))?;
        debug!(rules = grammar.rules().count(), "parsed and indexed grammar");
        Ok(grammar)
    }

    #[instrument(skip_all, fields(len = source.len()))]
    pub fn compile(&self, source: &str) -> Result<Artifacts, CompileError> {
        let location = SourceLocation::new(source);
        let grammar = self.analyze(source)?;
        let assembler = Assembler::new(&self.config, self.formatter.as_ref());

        let parser = if self.targets.parser {
            Some(assembler.parser_file(&grammar).map_err(|error| match error {
                AssembleError::Generate(error) => generate_error(&location, error),
                AssembleError::Format(error) => CompileError::Format(error),
            })?)
        } else {
            None
        };
        let typing = if self.targets.typing {
            Some(
                assembler
                    .typing_file(&grammar)
                    .map_err(|error| generate_error(&location, error))?,
            )
        } else {
            None
        };

        info!(
            parser = parser.is_some(),
            typing = typing.is_some(),
            "compiled grammar"
        );
        Ok(Artifacts { parser, typing })
    }

    pub fn compile_file(&self, path: impl AsRef<Path>) -> Result<Artifacts, CompileError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| CompileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.compile(&source)
    }
}

fn generate_error(location: &SourceLocation, error: GenerateError) -> CompileError {
    CompileError::Generate {
        position: location.start_of(error.span()),
        source: error,
    }
}

/// Compile with the built-in formatter and both artifacts
pub fn compile(source: &str, config: &GeneratorConfig) -> Result<Artifacts, CompileError> {
    Compiler::new(config.clone()).compile(source)
}

/// Output format for a token dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    /// One token per line: `start..end token`
    Simple,
    Json,
}

#[derive(serde::Serialize)]
struct SpannedToken<'a> {
    token: &'a Token,
    start: usize,
    end: usize,
}

#[derive(serde::Serialize)]
struct TokenDump<'a> {
    tokens: Vec<SpannedToken<'a>>,
    errors: &'a [LexicalError],
}

/// Dump the token stream of `source`; lexical errors are listed after the tokens
///
/// JSON output is an object with `tokens` and `errors` arrays.
pub fn format_tokens(source: &str, format: TokenFormat) -> Result<String, serde_json::Error> {
    let lexed = tokenize_with_spans(source);
    match format {
        TokenFormat::Simple => {
            let mut out = String::new();
            for (token, span) in &lexed.tokens {
                out.push_str(&format!("{}..{} {}\n", span.start, span.end, token));
            }
            for error in &lexed.errors {
                out.push_str(&format!(
                    "{}..{} error: {}\n",
                    error.span.start, error.span.end, error
                ));
            }
            Ok(out)
        }
        TokenFormat::Json => {
            let tokens: Vec<SpannedToken> = lexed
                .tokens
                .iter()
                .map(|(token, span)| SpannedToken {
                    token,
                    start: span.start,
                    end: span.end,
                })
                .collect();
            serde_json::to_string_pretty(&TokenDump {
                tokens,
                errors: &lexed.errors,
            })
        }
    }
}
