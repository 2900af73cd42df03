//! Type deriver: one structural CST node type per rule
//!
//! Fields mirror the children Chevrotain records for a rule: every token kind consumed
//! and every rule invoked directly in the body. Backtrack predicates are pruned from the
//! walk; what they consume is matched speculatively and never kept as a child.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::dsl::cst::{Grammar, NodeKind, Rule, Statement, Walker};
use crate::dsl::error::GenerateError;

/// The children of one rule's node, in first-appearance order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleType {
    pub rule: String,
    pub tokens: Vec<String>,
    pub subrules: Vec<String>,
}

pub fn node_type_name(rule: &str) -> String {
    format!("{}Node", rule)
}

fn push_distinct(names: &mut Vec<String>, seen: &mut BTreeSet<String>, name: &str) {
    if seen.insert(name.to_string()) {
        names.push(name.to_string());
    }
}

impl RuleType {
    pub fn derive(rule: &Rule) -> Result<Self, GenerateError> {
        let name = &rule.name.name;
        let mut tokens = Vec::new();
        let mut subrules = Vec::new();
        let mut seen_tokens = BTreeSet::new();
        let mut seen_subrules = BTreeSet::new();

        Walker::pruning([NodeKind::BacktrackPredicate]).walk(
            &rule.body,
            &mut |statement: &Statement| {
                match statement {
                    Statement::Consume(consume) => {
                        push_distinct(&mut tokens, &mut seen_tokens, &consume.token.name)
                    }
                    Statement::Subrule(subrule) => {
                        push_distinct(&mut subrules, &mut seen_subrules, &subrule.rule.name)
                    }
                    Statement::Error(span) => {
                        return Err(GenerateError::malformed(
                            name,
                            NodeKind::Error,
                            "left by a syntax error has no type",
                            span.clone(),
                        ))
                    }
                    _ => {}
                }
                Ok(())
            },
        )?;

        Ok(Self {
            rule: name.clone(),
            tokens,
            subrules,
        })
    }

    /// Render as an interface extending `CstNode`
    pub fn render(&self, export: bool, extra: &IndexMap<String, String>) -> String {
        let mut out = String::new();
        if export {
            out.push_str("export ");
        }
        out.push_str(&format!(
            "interface {} extends CstNode {{\n",
            node_type_name(&self.rule)
        ));

        let fields: Vec<String> = self
            .tokens
            .iter()
            .map(|token| format!("{}?: IToken[]", token))
            .chain(
                self.subrules
                    .iter()
                    .map(|rule| format!("{}?: {}[]", rule, node_type_name(rule))),
            )
            .collect();
        if fields.is_empty() {
            out.push_str("    readonly children: {}\n");
        } else {
            out.push_str("    readonly children: {\n");
            for field in &fields {
                out.push_str(&format!("        {}\n", field));
            }
            out.push_str("    }\n");
        }

        for (name, type_text) in extra {
            out.push_str(&format!("    {}?: {}\n", name, type_text));
        }
        out.push('}');
        out
    }
}

/// Declarations for every rule, separated by blank lines
pub fn derive_types(
    grammar: &Grammar,
    export: bool,
    extra: &IndexMap<String, String>,
) -> Result<String, GenerateError> {
    let declarations = grammar
        .rules()
        .map(|rule| RuleType::derive(rule).map(|ty| ty.render(export, extra)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(declarations.join("\n\n"))
}
