//! Test helpers: clean parsing and a fluent assertion API for grammar trees
//!
//! ```rust,ignore
//! let grammar = parse_clean("=foo { _Bar *baz }");
//! assert_grammar(&grammar).rule_count(1).rule(0, |r| {
//!     r.named("foo")
//!         .exposed(true)
//!         .statement(0, |s| s.consumes("Bar").index(Some(0)))
//!         .statement(1, |s| s.invokes("baz"));
//! });
//! ```

use crate::dsl::cst::{
    BacktrackTarget, Content, Gate, Grammar, NodeKind, Rule, Statement, StatementList,
};
use crate::dsl::parser::parse_source;

/// Parse source that must be free of diagnostics
pub fn parse_clean(source: &str) -> Grammar {
    let parsed = parse_source(source);
    assert!(
        parsed.is_clean(),
        "expected {:?} to parse cleanly, got: {:#?}",
        source,
        parsed.diagnostics
    );
    parsed.grammar
}

pub fn assert_grammar(grammar: &Grammar) -> GrammarAssertion<'_> {
    GrammarAssertion { grammar }
}

pub struct GrammarAssertion<'a> {
    grammar: &'a Grammar,
}

impl<'a> GrammarAssertion<'a> {
    pub fn item_count(self, expected: usize) -> Self {
        assert_eq!(self.grammar.items.len(), expected, "root item count");
        self
    }

    pub fn rule_count(self, expected: usize) -> Self {
        assert_eq!(self.grammar.rules().count(), expected, "rule count");
        self
    }

    /// Assert on the `index`-th rule, skipping top-level raw literals
    pub fn rule<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(RuleAssertion<'a>),
    {
        let rule = self
            .grammar
            .rules()
            .nth(index)
            .unwrap_or_else(|| panic!("rule index {} out of bounds", index));
        assertion(RuleAssertion { rule });
        self
    }
}

pub struct RuleAssertion<'a> {
    rule: &'a Rule,
}

impl<'a> RuleAssertion<'a> {
    pub fn named(self, expected: &str) -> Self {
        assert_eq!(self.rule.name.name, expected, "rule name");
        self
    }

    pub fn exposed(self, expected: bool) -> Self {
        assert_eq!(
            self.rule.exposed, expected,
            "rule `{}` exposure",
            self.rule.name.name
        );
        self
    }

    pub fn config(self, expected: &[&str]) -> Self {
        let actual: Vec<&str> = self.rule.config.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(actual, expected, "rule `{}` config", self.rule.name.name);
        self
    }

    pub fn statement_count(self, expected: usize) -> Self {
        assert_eq!(
            self.rule.body.statements.len(),
            expected,
            "rule `{}` statement count",
            self.rule.name.name
        );
        self
    }

    pub fn statement<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(StatementAssertion<'a>) -> R,
    {
        let _ = assertion(nth_statement(
            &self.rule.body,
            index,
            format!("{}[{}]", self.rule.name.name, index),
        ));
        self
    }
}

fn nth_statement(list: &StatementList, index: usize, context: String) -> StatementAssertion<'_> {
    let statement = list.statements.get(index).unwrap_or_else(|| {
        panic!(
            "{}: statement index out of bounds (list has {})",
            context,
            list.statements.len()
        )
    });
    StatementAssertion { statement, context }
}

pub struct StatementAssertion<'a> {
    statement: &'a Statement,
    context: String,
}

impl<'a> StatementAssertion<'a> {
    pub fn kind(self, expected: NodeKind) -> Self {
        assert_eq!(self.statement.kind(), expected, "{}: kind", self.context);
        self
    }

    pub fn index(self, expected: Option<usize>) -> Self {
        assert_eq!(self.statement.index(), expected, "{}: index", self.context);
        self
    }

    pub fn consumes(self, token: &str) -> Self {
        match self.statement {
            Statement::Consume(c) => assert_eq!(c.token.name, token, "{}", self.context),
            other => panic!("{}: expected Consume, found {}", self.context, other.kind()),
        }
        self
    }

    pub fn skips(self, token: &str) -> Self {
        match self.statement {
            Statement::Skip(s) => assert_eq!(s.token.name, token, "{}", self.context),
            other => panic!("{}: expected Skip, found {}", self.context, other.kind()),
        }
        self
    }

    pub fn invokes(self, rule: &str) -> Self {
        match self.statement {
            Statement::Subrule(s) => assert_eq!(s.rule.name, rule, "{}", self.context),
            other => panic!("{}: expected Subrule, found {}", self.context, other.kind()),
        }
        self
    }

    pub fn raw(self, text: &str) -> Self {
        match self.statement {
            Statement::Raw(e) => assert_eq!(e.text, text, "{}", self.context),
            other => panic!("{}: expected raw literal, found {}", self.context, other.kind()),
        }
        self
    }

    pub fn separator(self, expected: Option<&str>) -> Self {
        match self.statement {
            Statement::Many(r) | Statement::AtLeastOne(r) => assert_eq!(
                r.separator.as_ref().map(|s| s.name.as_str()),
                expected,
                "{}: separator",
                self.context
            ),
            other => panic!("{}: {} has no separator", self.context, other.kind()),
        }
        self
    }

    /// Raw gate text, or `<rule` / `<...` for backtrack gates
    pub fn gate(self, expected: Option<&str>) -> Self {
        let gate = match self.statement {
            Statement::Option(o) => o.gate.as_ref(),
            Statement::Many(r) | Statement::AtLeastOne(r) => r.gate.as_ref(),
            other => panic!("{}: {} has no gate", self.context, other.kind()),
        };
        assert_eq!(
            gate.map(describe_gate).as_deref(),
            expected,
            "{}: gate",
            self.context
        );
        self
    }

    pub fn alternative_count(self, expected: usize) -> Self {
        match self.statement {
            Statement::Or(choice) => assert_eq!(
                choice.alternatives.len(),
                expected,
                "{}: alternatives",
                self.context
            ),
            other => panic!("{}: expected Or, found {}", self.context, other.kind()),
        }
        self
    }

    /// Assert on the content of an Option, Many or AtLeastOne
    pub fn content<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ContentAssertion<'a>),
    {
        let content = match self.statement {
            Statement::Option(o) => &o.content,
            Statement::Many(r) | Statement::AtLeastOne(r) => &r.content,
            other => panic!("{}: {} has no content", self.context, other.kind()),
        };
        assertion(ContentAssertion {
            content,
            context: format!("{}.content", self.context),
        });
        self
    }

    pub fn alternative<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ContentAssertion<'a>),
    {
        let content = match self.statement {
            Statement::Or(choice) => &choice
                .alternatives
                .get(index)
                .unwrap_or_else(|| panic!("{}: alternative {} missing", self.context, index))
                .content,
            other => panic!("{}: expected Or, found {}", self.context, other.kind()),
        };
        assertion(ContentAssertion {
            content,
            context: format!("{}.alt[{}]", self.context, index),
        });
        self
    }
}

fn describe_gate(gate: &Gate) -> String {
    match gate {
        Gate::Raw(text) => text.text.clone(),
        Gate::Backtrack(backtrack) => match &backtrack.target {
            BacktrackTarget::Rule(rule) => format!("<{}", rule.name),
            BacktrackTarget::Content(_) => "<...".to_string(),
        },
    }
}

pub struct ContentAssertion<'a> {
    content: &'a Content,
    context: String,
}

impl<'a> ContentAssertion<'a> {
    /// Assert the content is a single statement, not a list
    pub fn single<F, R>(self, assertion: F)
    where
        F: FnOnce(StatementAssertion<'a>) -> R,
    {
        match self.content {
            Content::Single(statement) => {
                assertion(StatementAssertion {
                    statement,
                    context: self.context,
                });
            }
            Content::List(_) => panic!("{}: expected a single statement, found a list", self.context),
        }
    }

    /// Assert the content is a list and inspect it
    pub fn list<F>(self, assertion: F)
    where
        F: FnOnce(ListAssertion<'a>),
    {
        match self.content {
            Content::List(list) => assertion(ListAssertion {
                list,
                context: self.context,
            }),
            Content::Single(_) => panic!("{}: expected a list, found a single statement", self.context),
        }
    }
}

pub struct ListAssertion<'a> {
    list: &'a StatementList,
    context: String,
}

impl<'a> ListAssertion<'a> {
    pub fn statement_count(self, expected: usize) -> Self {
        assert_eq!(
            self.list.statements.len(),
            expected,
            "{}: statement count",
            self.context
        );
        self
    }

    pub fn statement<F, R>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(StatementAssertion<'a>) -> R,
    {
        let context = format!("{}[{}]", self.context, index);
        let _ = assertion(nth_statement(self.list, index, context));
        self
    }
}
