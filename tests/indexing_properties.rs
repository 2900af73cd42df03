//! Property-based tests for occurrence indexing and generation determinism
//!
//! Rule bodies are generated as small statement trees, rendered to DSL source, then
//! compiled. Whatever the nesting, each statement kind is numbered 0..k-1 in pre-order
//! within its rule.

use std::collections::BTreeMap;
use std::convert::Infallible;

use chevgen::dsl::cst::{NodeKind, Rule, Statement, Walker};
use chevgen::dsl::processor::Compiler;
use chevgen::dsl::GeneratorConfig;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Item {
    Consume(usize),
    Subrule(usize),
    Many(Vec<Item>),
    Option(Vec<Item>),
    Guarded(Vec<Item>, Vec<Item>),
    Or(Vec<Vec<Item>>),
}

fn render(items: &[Item]) -> String {
    let parts: Vec<String> = items.iter().map(render_item).collect();
    format!("{{ {} }}", parts.join(" "))
}

fn render_item(item: &Item) -> String {
    match item {
        Item::Consume(n) => format!("_T{}", n),
        Item::Subrule(n) => format!("*r{}", n),
        Item::Many(items) => format!("0+ {}", render(items)),
        Item::Option(items) => format!("? {}", render(items)),
        Item::Guarded(predicate, items) => {
            format!("?(>< {}) {}", render(predicate), render(items))
        }
        Item::Or(alternatives) => {
            let alternatives: Vec<String> = alternatives
                .iter()
                .map(|items| format!("\\ {}", render(items)))
                .collect();
            format!("| {}", alternatives.join(" "))
        }
    }
}

fn item() -> impl Strategy<Value = Item> {
    let leaf = prop_oneof![
        (0..3usize).prop_map(Item::Consume),
        (0..3usize).prop_map(Item::Subrule),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        let list = prop::collection::vec(inner, 0..4);
        prop_oneof![
            list.clone().prop_map(Item::Many),
            list.clone().prop_map(Item::Option),
            (list.clone(), list.clone()).prop_map(|(p, b)| Item::Guarded(p, b)),
            prop::collection::vec(list, 1..3).prop_map(Item::Or),
        ]
    })
}

fn body() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec(item(), 0..6)
}

fn indices_by_kind(rule: &Rule) -> BTreeMap<NodeKind, Vec<usize>> {
    let mut seen: BTreeMap<NodeKind, Vec<usize>> = BTreeMap::new();
    let _ = Walker::new().walk(&rule.body, &mut |statement: &Statement| {
        if let Some(index) = statement.index() {
            seen.entry(statement.kind()).or_default().push(index);
        }
        Ok::<_, Infallible>(())
    });
    seen
}

proptest! {
    #[test]
    fn test_indices_are_dense_in_preorder(items in body()) {
        let source = format!("r {}", render(&items));
        let grammar = Compiler::new(GeneratorConfig::default()).analyze(&source).unwrap();
        let rule = grammar.rules().next().unwrap();

        for (kind, indices) in indices_by_kind(rule) {
            let expected: Vec<usize> = (0..indices.len()).collect();
            prop_assert_eq!(indices, expected, "{} in {}", kind, source);
        }
    }

    #[test]
    fn test_rules_are_indexed_independently(first in body(), second in body()) {
        let source = format!("a {} b {} c {}", render(&first), render(&second), render(&first));
        let grammar = Compiler::new(GeneratorConfig::default()).analyze(&source).unwrap();
        let rules: Vec<&Rule> = grammar.rules().collect();

        prop_assert_eq!(rules.len(), 3);
        prop_assert_eq!(indices_by_kind(rules[0]), indices_by_kind(rules[2]));
    }

    #[test]
    fn test_generation_is_deterministic(items in body()) {
        let source = format!("=r {}", render(&items));
        let compiler = Compiler::new(GeneratorConfig::default());
        let first = compiler.compile(&source).unwrap();
        let second = compiler.compile(&source).unwrap();
        prop_assert_eq!(first, second);
    }
}
