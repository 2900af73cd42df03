//! Occurrence indexing
//!
//! Chevrotain tells repeated uses of one primitive inside a rule apart by an occurrence
//! index (`CONSUME`, `CONSUME1`, ...). This pass walks each rule body in pre-order and
//! source order, predicate interiors included, and numbers statements per kind from 0.
//! Counters live in a [`RuleIndexer`] created per rule, so rules never share state.

use std::collections::BTreeMap;
use std::convert::Infallible;

use tracing::trace;

use crate::dsl::cst::{Grammar, NodeKind, Rule, Statement, Walker};
use crate::dsl::error::GenerateError;

/// Per-rule occurrence counters
#[derive(Debug, Default)]
pub struct RuleIndexer {
    counters: BTreeMap<NodeKind, usize>,
}

impl RuleIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next index for `kind`
    pub fn next(&mut self, kind: NodeKind) -> usize {
        let counter = self.counters.entry(kind).or_insert(0);
        let index = *counter;
        *counter += 1;
        index
    }

    /// Number every indexed statement of `rule`, overwriting previous indices
    pub fn index_rule(mut self, rule: &mut Rule) -> Result<Self, GenerateError> {
        let rule_name = rule.name.name.clone();
        Walker::new().walk_mut(&mut rule.body, &mut |statement: &mut Statement| {
            let kind = statement.kind();
            if let Statement::Error(span) = statement {
                return Err(GenerateError::malformed(
                    &rule_name,
                    kind,
                    "left by a syntax error cannot be indexed",
                    span.clone(),
                ));
            }
            if let Some(slot) = statement.index_slot() {
                *slot = Some(self.next(kind));
            }
            Ok(())
        })?;
        trace!(rule = %rule_name, counters = ?self.counters, "indexed rule");
        Ok(self)
    }
}

/// Index every rule of the grammar in place
pub fn index_grammar(grammar: &mut Grammar) -> Result<(), GenerateError> {
    for rule in grammar.rules_mut() {
        RuleIndexer::new().index_rule(rule)?;
    }
    Ok(())
}

/// Whether every indexable statement already carries an index
pub fn is_indexed(grammar: &Grammar) -> bool {
    let mut complete = true;
    for rule in grammar.rules() {
        let _ = Walker::new().walk(&rule.body, &mut |statement: &Statement| {
            let missing =
                NodeKind::INDEXED.contains(&statement.kind()) && statement.index().is_none();
            complete &= !missing;
            Ok::<_, Infallible>(())
        });
    }
    complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::parser::parse_source;
    use crate::dsl::testing::{assert_grammar, parse_clean};

    fn indexed(source: &str) -> Grammar {
        let mut grammar = parse_clean(source);
        index_grammar(&mut grammar).unwrap();
        grammar
    }

    #[test]
    fn test_repeated_consumes_count_up() {
        let grammar = indexed("foo { _A; _A }");
        assert_grammar(&grammar).rule(0, |r| {
            r.statement(0, |s| s.consumes("A").index(Some(0)))
                .statement(1, |s| s.consumes("A").index(Some(1)));
        });
    }

    #[test]
    fn test_counters_are_per_kind() {
        let grammar = indexed("foo { _A *b _C *d ? _E }");
        assert_grammar(&grammar).rule(0, |r| {
            r.statement(0, |s| s.index(Some(0)))
                .statement(1, |s| s.index(Some(0)))
                .statement(2, |s| s.index(Some(1)))
                .statement(3, |s| s.index(Some(1)))
                .statement(4, |s| {
                    s.index(Some(0))
                        .content(|c| c.single(|s| {
                            s.index(Some(2));
                        }));
                });
        });
    }

    #[test]
    fn test_counters_reset_per_rule() {
        let grammar = indexed("a { _X _X } b { _X }");
        assert_grammar(&grammar)
            .rule(0, |r| {
                r.statement(1, |s| s.index(Some(1)));
            })
            .rule(1, |r| {
                r.statement(0, |s| s.index(Some(0)));
            });
    }

    #[test]
    fn test_gate_interior_is_numbered_before_content() {
        let grammar = indexed("r { ?(><_A) _A }");
        let rule = grammar.rule("r").unwrap();
        match &rule.body.statements[0] {
            Statement::Option(option) => {
                assert_eq!(option.index, Some(0));
                match &option.gate {
                    Some(crate::dsl::cst::Gate::Backtrack(backtrack)) => {
                        match &backtrack.target {
                            crate::dsl::cst::BacktrackTarget::Content(
                                crate::dsl::cst::Content::Single(inner),
                            ) => assert_eq!(inner.index(), Some(0)),
                            other => panic!("unexpected target {:?}", other),
                        }
                    }
                    other => panic!("unexpected gate {:?}", other),
                }
            }
            other => panic!("expected Option, found {:?}", other),
        }
        assert_grammar(&grammar).rule(0, |r| {
            r.statement(0, |s| {
                s.content(|c| c.single(|s| {
                    s.index(Some(1));
                }));
            });
        });
    }

    #[test]
    fn test_skip_and_raw_are_not_indexed() {
        let grammar = indexed("r { -Ws #x# _A }");
        assert_grammar(&grammar).rule(0, |r| {
            r.statement(0, |s| s.index(None))
                .statement(1, |s| s.index(None))
                .statement(2, |s| s.index(Some(0)));
        });
        assert!(is_indexed(&grammar));
    }

    #[test]
    fn test_reindexing_is_stable() {
        let mut grammar = indexed(r"r { | \ _A \ 0+ _A }");
        let first = grammar.clone();
        index_grammar(&mut grammar).unwrap();
        assert_eq!(grammar, first);
    }

    #[test]
    fn test_error_placeholder_is_malformed() {
        let mut grammar = parse_source("foo { _ }").grammar;
        let err = index_grammar(&mut grammar).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::MalformedTree { ref rule, kind: NodeKind::Error, .. } if rule == "foo"
        ));
    }

    #[test]
    fn test_rule_indexer_continues_after_a_rule() {
        let mut grammar = parse_clean("r { _A 0+ { _B } }");
        let rule = grammar.rules_mut().next().unwrap();
        let mut indexer = RuleIndexer::new().index_rule(rule).unwrap();
        assert_eq!(indexer.next(NodeKind::Consume), 2);
        assert_eq!(indexer.next(NodeKind::Many), 1);
        assert_eq!(indexer.next(NodeKind::Or), 0);
    }
}
