//! Assembler: complete parser and typing files
//!
//! The parser file is the header comment, the import lines (module mode only) and the
//! formatted class. The typing file is the header comment, the typing import (module
//! mode only) and the derived node interfaces; it never goes through the formatter.

use std::collections::BTreeSet;
use std::convert::Infallible;

use thiserror::Error;
use tracing::debug;

use crate::dsl::config::GeneratorConfig;
use crate::dsl::cst::{Grammar, Statement, Walker};
use crate::dsl::error::GenerateError;
use crate::dsl::indexer::is_indexed;

use super::builder::SegmentBuilder;
use super::formatter::{FormatError, Formatter};
use super::typing::derive_types;

pub const HEADER: &str = "/**\n * This file is generated with chevgen\n */\n\n";
pub const PARSER_IMPORT: &str = "import { CstParser, IParserConfig, TokenVocabulary } from 'chevrotain'\n";
pub const TYPING_IMPORT: &str = "import { CstNode, IToken } from 'chevrotain'\n";

const TYPED_SIGNATURE: &str = "tokenVocabulary: TokenVocabulary, config?: IParserConfig";
const UNTYPED_SIGNATURE: &str = "tokenVocabulary, config";

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Format(#[from] FormatError),
}

pub struct Assembler<'a> {
    config: &'a GeneratorConfig,
    formatter: &'a dyn Formatter,
}

impl<'a> Assembler<'a> {
    pub fn new(config: &'a GeneratorConfig, formatter: &'a dyn Formatter) -> Self {
        Self { config, formatter }
    }

    /// Expects an indexed grammar
    pub fn parser_file(&self, grammar: &Grammar) -> Result<String, AssembleError> {
        debug_assert!(is_indexed(grammar), "parser_file needs an indexed grammar");
        let body = SegmentBuilder::new(self.config.use_js).build(grammar)?;
        let class = self.wrap_in_class(&body.concat());
        let formatted = self.formatter.format(&class)?;
        debug!(
            unformatted = class.len(),
            formatted = formatted.len(),
            "assembled parser class"
        );

        let mut out = String::from(HEADER);
        if self.config.use_module {
            out.push_str(PARSER_IMPORT);
            if let Some(path) = &self.config.lexer_import_path {
                out.push_str(&format!(
                    "import {{ {} }} from '{}'\n",
                    lexer_tokens(grammar).join(", "),
                    path
                ));
            }
        }
        out.push_str(&formatted);
        Ok(out)
    }

    pub fn typing_file(&self, grammar: &Grammar) -> Result<String, GenerateError> {
        let declarations = derive_types(
            grammar,
            self.config.use_module,
            &self.config.extra_node_properties,
        )?;
        let mut out = String::from(HEADER);
        if self.config.use_module {
            out.push_str(TYPING_IMPORT);
        }
        out.push_str(&declarations);
        out.push('\n');
        Ok(out)
    }

    fn wrap_in_class(&self, rules: &str) -> String {
        let export = if self.config.use_module { "export " } else { "" };
        let signature = if self.config.use_js {
            UNTYPED_SIGNATURE
        } else {
            TYPED_SIGNATURE
        };
        format!(
            "{export}class {name} extends CstParser {{\n    constructor({signature}) {{\n        super(tokenVocabulary, config);\n        this.performSelfAnalysis();\n    }}\n{rules}}}\n",
            export = export,
            name = self.config.parser_class_name,
            signature = signature,
            rules = rules,
        )
    }
}

/// Every token kind the grammar names, sorted and distinct
///
/// Consumed, skipped and separator tokens all count, predicate interiors included.
pub fn lexer_tokens(grammar: &Grammar) -> Vec<String> {
    let mut tokens = BTreeSet::new();
    for rule in grammar.rules() {
        let _ = Walker::new().walk(&rule.body, &mut |statement: &Statement| {
            match statement {
                Statement::Consume(consume) => {
                    tokens.insert(consume.token.name.clone());
                }
                Statement::Skip(skip) => {
                    tokens.insert(skip.token.name.clone());
                }
                Statement::Many(rep) | Statement::AtLeastOne(rep) => {
                    if let Some(separator) = &rep.separator {
                        tokens.insert(separator.name.clone());
                    }
                }
                _ => {}
            }
            Ok::<_, Infallible>(())
        });
    }
    tokens.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::codegen::formatter::{BraceFormatter, Verbatim};
    use crate::dsl::indexer::index_grammar;
    use crate::dsl::testing::parse_clean;

    fn indexed(source: &str) -> Grammar {
        let mut grammar = parse_clean(source);
        index_grammar(&mut grammar).unwrap();
        grammar
    }

    #[test]
    fn test_lexer_tokens_are_sorted_and_distinct() {
        let grammar = indexed(r"a { _Zed -Ws 0+(;Comma) *b ?(><{ _Peek }) _Zed } b { _Alpha }");
        assert_eq!(lexer_tokens(&grammar), vec!["Alpha", "Comma", "Peek", "Ws", "Zed"]);
    }

    #[test]
    fn test_script_mode_parser_file() {
        let config = GeneratorConfig::default();
        let grammar = indexed("=foo { _Bar }");
        let out = Assembler::new(&config, &BraceFormatter::default())
            .parser_file(&grammar)
            .unwrap();
        insta::assert_snapshot!(out, @r###"
        /**
         * This file is generated with chevgen
         */

        class GeneratedParser extends CstParser {
            constructor(tokenVocabulary: TokenVocabulary, config?: IParserConfig) {
                super(tokenVocabulary, config);
                this.performSelfAnalysis();
            }
            public foo = this.RULE("foo", () => {
                this.CONSUME(Bar);
            });
        }
        "###);
    }

    #[test]
    fn test_module_mode_imports() {
        let config = GeneratorConfig {
            use_module: true,
            lexer_import_path: Some("./lexer".to_string()),
            ..GeneratorConfig::default()
        };
        let grammar = indexed("foo { _B _A }");
        let out = Assembler::new(&config, &Verbatim).parser_file(&grammar).unwrap();
        let expected_prefix = format!(
            "{}{}import {{ A, B }} from './lexer'\nexport class GeneratedParser",
            HEADER, PARSER_IMPORT
        );
        assert!(out.starts_with(&expected_prefix), "{}", out);
    }

    #[test]
    fn test_js_mode_signature_and_class_name() {
        let config = GeneratorConfig {
            use_js: true,
            parser_class_name: "ExprParser".to_string(),
            ..GeneratorConfig::default()
        };
        let out = Assembler::new(&config, &Verbatim)
            .parser_file(&indexed("foo { }"))
            .unwrap();
        assert!(out.contains("class ExprParser extends CstParser {\n    constructor(tokenVocabulary, config) {"));
        assert!(out.contains("foo = this.RULE(\"foo\", () => {});\n}"));
        assert!(!out.contains("private"));
    }

    #[test]
    fn test_lexer_import_needs_module_mode() {
        let config = GeneratorConfig {
            lexer_import_path: Some("./lexer".to_string()),
            ..GeneratorConfig::default()
        };
        let out = Assembler::new(&config, &Verbatim)
            .parser_file(&indexed("foo { _A }"))
            .unwrap();
        assert!(!out.contains("import"));
    }

    #[test]
    fn test_typing_file() {
        let config = GeneratorConfig {
            use_module: true,
            ..GeneratorConfig::default()
        };
        let out = Assembler::new(&config, &Verbatim)
            .typing_file(&indexed("foo { _A } bar { *foo }"))
            .unwrap();
        assert!(out.starts_with(&format!("{}{}export interface fooNode", HEADER, TYPING_IMPORT)));
        assert!(out.ends_with("foo?: fooNode[]\n    }\n}\n"));
    }

    #[test]
    fn test_generate_error_surfaces() {
        let config = GeneratorConfig::default();
        let grammar = indexed("foo { 0+{;Comma >#ok#} _A }");
        let err = Assembler::new(&config, &Verbatim)
            .parser_file(&grammar)
            .unwrap_err();
        assert!(matches!(
            err,
            AssembleError::Generate(GenerateError::ConflictingArguments { .. })
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "indexed grammar")]
    fn test_unindexed_grammar_is_refused() {
        let config = GeneratorConfig::default();
        let _ = Assembler::new(&config, &Verbatim).parser_file(&parse_clean("foo { _A }"));
    }
}
