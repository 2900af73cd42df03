//! Segment builder: indexed CST to Chevrotain rule declarations
//!
//! A pure, structure-preserving translation. An unset or zero occurrence index renders
//! the uppercase call (`this.CONSUME(T)`); index `n > 0` renders the indexed lowercase
//! call (`this.consume(n, T)`).

use crate::dsl::cst::{
    Alternative, Backtrack, BacktrackTarget, Choice, Consume, Content, Escaped, Gate, Grammar,
    Ident, NodeKind, OptionBlock, Repetition, RootItem, Rule, Span, Statement, StatementList,
    Subrule,
};
use crate::dsl::error::GenerateError;

use super::segment::Segment;

#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentBuilder {
    /// Emit plain JavaScript: rule fields carry no visibility modifier
    pub use_js: bool,
}

impl SegmentBuilder {
    pub fn new(use_js: bool) -> Self {
        Self { use_js }
    }

    /// Build the class body for a whole grammar
    ///
    /// Rules are terminated with `;`; top-level raw literals are emitted bare.
    pub fn build(&self, grammar: &Grammar) -> Result<Segment, GenerateError> {
        let mut items = Vec::with_capacity(grammar.items.len());
        let mut end = 0;
        for item in &grammar.items {
            match item {
                RootItem::Rule(rule) => {
                    end = rule.span.end;
                    items.push(Segment::group(
                        NodeKind::Rule,
                        rule.span.clone(),
                        vec![
                            self.build_rule(rule)?,
                            Segment::text(NodeKind::Rule, rule.span.clone(), ";\n"),
                        ],
                    ));
                }
                RootItem::Raw(raw) => {
                    end = raw.span.end;
                    items.push(Segment::text(
                        NodeKind::RawLiteral,
                        raw.span.clone(),
                        format!("{}\n", raw.text),
                    ));
                }
            }
        }
        Ok(Segment::group(NodeKind::Grammar, 0..end, items))
    }

    pub fn build_rule(&self, rule: &Rule) -> Result<Segment, GenerateError> {
        let scope = RuleScope {
            rule: &rule.name.name,
        };
        scope.check_ident(&rule.name, NodeKind::Rule)?;

        let span = rule.span.clone();
        let name = &rule.name.name;
        let declaration = if self.use_js {
            format!("{} = this.RULE(\"{}\", ", name, name)
        } else {
            let visibility = if rule.exposed { "public" } else { "private" };
            format!("{} {} = this.RULE(\"{}\", ", visibility, name, name)
        };

        let mut parts = vec![
            Segment::text(NodeKind::Rule, span.clone(), declaration),
            scope.statement_list(&rule.body)?,
        ];
        if !rule.config.is_empty() {
            let entries = rule
                .config
                .iter()
                .map(|entry| raw(NodeKind::Rule, entry))
                .collect();
            parts.push(Segment::text(NodeKind::Rule, span.clone(), ", "));
            parts.push(object(NodeKind::Rule, span.clone(), entries));
        }
        parts.push(Segment::text(NodeKind::Rule, span.clone(), ")"));
        Ok(Segment::group(NodeKind::Rule, span, parts))
    }
}

/// Translation state for one rule; the name goes into every error raised below it
struct RuleScope<'a> {
    rule: &'a str,
}

impl RuleScope<'_> {
    fn malformed(&self, kind: NodeKind, problem: &str, span: Span) -> GenerateError {
        GenerateError::malformed(self.rule, kind, problem, span)
    }

    fn check_ident(&self, ident: &Ident, kind: NodeKind) -> Result<(), GenerateError> {
        if ident.name.is_empty() {
            return Err(self.malformed(kind, "has an empty identifier", ident.span.clone()));
        }
        Ok(())
    }

    fn statement(&self, statement: &Statement) -> Result<Segment, GenerateError> {
        match statement {
            Statement::Consume(consume) => self.consume(consume),
            Statement::Skip(skip) => {
                self.check_ident(&skip.token, NodeKind::Skip)?;
                Ok(Segment::text(
                    NodeKind::Skip,
                    skip.span.clone(),
                    format!("this.SKIP({})", skip.token.name),
                ))
            }
            Statement::Subrule(subrule) => self.subrule(subrule),
            Statement::Option(option) => self.option(option),
            Statement::Many(rep) => self.repetition(rep, NodeKind::Many),
            Statement::AtLeastOne(rep) => self.repetition(rep, NodeKind::AtLeastOne),
            Statement::Or(choice) => self.or(choice),
            Statement::Raw(text) => Ok(raw(NodeKind::RawLiteral, text)),
            Statement::Error(span) => Err(self.malformed(
                NodeKind::Error,
                "left by a syntax error cannot be generated",
                span.clone(),
            )),
        }
    }

    /// `() => { a; b; }`
    fn statement_list(&self, list: &StatementList) -> Result<Segment, GenerateError> {
        let span = list.span.clone();
        if list.statements.is_empty() {
            return Ok(Segment::text(NodeKind::StatementList, span, "() => {}"));
        }
        let mut parts = vec![Segment::text(
            NodeKind::StatementList,
            span.clone(),
            "() => { ",
        )];
        for statement in &list.statements {
            parts.push(self.statement(statement)?);
            parts.push(Segment::text(NodeKind::StatementList, span.clone(), "; "));
        }
        parts.push(Segment::text(NodeKind::StatementList, span.clone(), "}"));
        Ok(Segment::group(NodeKind::StatementList, span, parts))
    }

    /// Deferred block: `() => stmt` or `() => { ... }`
    fn content(&self, content: &Content) -> Result<Segment, GenerateError> {
        match content {
            Content::Single(statement) => {
                let span = statement.span();
                Ok(Segment::group(
                    statement.kind(),
                    span.clone(),
                    vec![
                        Segment::text(statement.kind(), span, "() => "),
                        self.statement(statement)?,
                    ],
                ))
            }
            Content::List(list) => self.statement_list(list),
        }
    }

    fn consume(&self, consume: &Consume) -> Result<Segment, GenerateError> {
        let kind = NodeKind::Consume;
        let span = consume.span.clone();
        self.check_ident(&consume.token, kind)?;

        let mut args = vec![Segment::text(
            kind,
            consume.token.span.clone(),
            consume.token.name.clone(),
        )];
        let mut entries = Vec::new();
        if let Some(error) = &consume.error {
            entries.push(entry(kind, "ERR_MSG", raw(kind, error)));
        }
        if let Some(label) = &consume.label {
            entries.push(entry(kind, "LABEL", raw(kind, label)));
        }
        if !entries.is_empty() {
            args.push(object(kind, span.clone(), entries));
        }
        Ok(call(kind, span, ("CONSUME", "consume"), consume.index, args))
    }

    fn subrule(&self, subrule: &Subrule) -> Result<Segment, GenerateError> {
        let kind = NodeKind::Subrule;
        let span = subrule.span.clone();
        self.check_ident(&subrule.rule, kind)?;

        let mut args = vec![Segment::text(
            kind,
            subrule.rule.span.clone(),
            format!("this.{}", subrule.rule.name),
        )];
        let mut entries = Vec::new();
        if let Some(label) = &subrule.label {
            entries.push(entry(kind, "LABEL", raw(kind, label)));
        }
        if let Some(passthrough) = &subrule.passthrough {
            entries.push(raw(kind, passthrough));
        }
        if !entries.is_empty() {
            args.push(object(kind, span.clone(), entries));
        }
        Ok(call(kind, span, ("SUBRULE", "subrule"), subrule.index, args))
    }

    fn option(&self, option: &OptionBlock) -> Result<Segment, GenerateError> {
        let kind = NodeKind::Option;
        let span = option.span.clone();
        let content = self.content(&option.content)?;

        let argument = if option.gate.is_none() && option.max_lookahead.is_none() {
            content
        } else {
            let mut entries = vec![entry(kind, "DEF", content)];
            if let Some(gate) = &option.gate {
                entries.push(entry(kind, "GATE", self.gate(gate)?));
            }
            if let Some(max_lookahead) = &option.max_lookahead {
                entries.push(entry(kind, "MAX_LOOKAHEAD", raw(kind, max_lookahead)));
            }
            object(kind, span.clone(), entries)
        };
        Ok(call(kind, span, ("OPTION", "option"), option.index, vec![argument]))
    }

    fn repetition(&self, rep: &Repetition, kind: NodeKind) -> Result<Segment, GenerateError> {
        let span = rep.span.clone();
        if rep.separator.is_some() && rep.gate.is_some() {
            return Err(GenerateError::ConflictingArguments {
                rule: self.rule.to_string(),
                kind,
                span,
            });
        }

        let names = match (kind, rep.separator.is_some()) {
            (NodeKind::AtLeastOne, false) => ("AT_LEAST_ONE", "atLeastOne"),
            (NodeKind::AtLeastOne, true) => ("AT_LEAST_ONE_SEP", "atLeastOneSep"),
            (_, false) => ("MANY", "many"),
            (_, true) => ("MANY_SEP", "manySep"),
        };
        let content = self.content(&rep.content)?;

        let argument = if !rep.has_arguments() {
            content
        } else {
            let mut entries = vec![entry(kind, "DEF", content)];
            if let Some(separator) = &rep.separator {
                self.check_ident(separator, kind)?;
                entries.push(entry(
                    kind,
                    "SEP",
                    Segment::text(kind, separator.span.clone(), separator.name.clone()),
                ));
            }
            if let Some(gate) = &rep.gate {
                entries.push(entry(kind, "GATE", self.gate(gate)?));
            }
            if let Some(error) = &rep.error {
                entries.push(entry(kind, "ERR_MSG", raw(kind, error)));
            }
            if let Some(max_lookahead) = &rep.max_lookahead {
                entries.push(entry(kind, "MAX_LOOKAHEAD", raw(kind, max_lookahead)));
            }
            object(kind, span.clone(), entries)
        };
        Ok(call(kind, span, names, rep.index, vec![argument]))
    }

    fn or(&self, choice: &Choice) -> Result<Segment, GenerateError> {
        let kind = NodeKind::Or;
        let span = choice.span.clone();
        if choice.alternatives.is_empty() {
            return Err(self.malformed(kind, "has no alternatives", span));
        }

        let alternatives = choice
            .alternatives
            .iter()
            .map(|alternative| self.alternative(alternative))
            .collect::<Result<Vec<_>, _>>()?;
        let list = array(kind, span.clone(), alternatives);

        let argument = if !choice.has_arguments() {
            list
        } else {
            let mut entries = vec![entry(kind, "DEF", list)];
            if let Some(error) = &choice.error {
                entries.push(entry(kind, "ERR_MSG", raw(kind, error)));
            }
            if let Some(max_lookahead) = &choice.max_lookahead {
                entries.push(entry(kind, "MAX_LOOKAHEAD", raw(kind, max_lookahead)));
            }
            if let Some(description) = &choice.description {
                entries.push(raw(kind, description));
            }
            object(kind, span.clone(), entries)
        };
        Ok(call(kind, span, ("OR", "or"), choice.index, vec![argument]))
    }

    fn alternative(&self, alternative: &Alternative) -> Result<Segment, GenerateError> {
        let kind = NodeKind::Alternative;
        let mut entries = vec![entry(kind, "ALT", self.content(&alternative.content)?)];
        if let Some(gate) = &alternative.gate {
            entries.push(entry(kind, "GATE", self.gate(gate)?));
        }
        if let Some(description) = &alternative.description {
            entries.push(raw(kind, description));
        }
        Ok(object(kind, alternative.span.clone(), entries))
    }

    fn gate(&self, gate: &Gate) -> Result<Segment, GenerateError> {
        match gate {
            Gate::Raw(text) => Ok(raw(NodeKind::Gate, text)),
            Gate::Backtrack(backtrack) => self.backtrack(backtrack),
        }
    }

    fn backtrack(&self, backtrack: &Backtrack) -> Result<Segment, GenerateError> {
        let kind = NodeKind::BacktrackPredicate;
        let span = backtrack.span.clone();
        let argument = match &backtrack.target {
            BacktrackTarget::Rule(rule) => {
                self.check_ident(rule, kind)?;
                Segment::text(kind, rule.span.clone(), format!("this.{}", rule.name))
            }
            BacktrackTarget::Content(content) => self.content(content)?,
        };
        Ok(call(kind, span, ("BACKTRACK", "BACKTRACK"), None, vec![argument]))
    }
}

fn raw(kind: NodeKind, text: &Escaped) -> Segment {
    Segment::text(kind, text.span.clone(), text.text.clone())
}

/// `this.NAME(args)` or, for a non-zero index, `this.name(n, args)`
fn call(
    kind: NodeKind,
    span: Span,
    (upper, lower): (&str, &str),
    index: Option<usize>,
    args: Vec<Segment>,
) -> Segment {
    let mut parts = Vec::with_capacity(args.len() * 2 + 2);
    let mut separate = false;
    match index {
        Some(n) if n > 0 => {
            parts.push(Segment::text(kind, span.clone(), format!("this.{}({}", lower, n)));
            separate = true;
        }
        _ => parts.push(Segment::text(kind, span.clone(), format!("this.{}(", upper))),
    }
    for arg in args {
        if separate {
            parts.push(Segment::text(kind, span.clone(), ", "));
        }
        parts.push(arg);
        separate = true;
    }
    parts.push(Segment::text(kind, span.clone(), ")"));
    Segment::group(kind, span, parts)
}

/// `KEY: value`
fn entry(kind: NodeKind, key: &str, value: Segment) -> Segment {
    let span = value.origin.span.clone();
    Segment::group(
        kind,
        span.clone(),
        vec![Segment::text(kind, span, format!("{}: ", key)), value],
    )
}

fn delimited(kind: NodeKind, span: Span, (open, close): (&str, &str), items: Vec<Segment>) -> Segment {
    let mut parts = vec![Segment::text(kind, span.clone(), open)];
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            parts.push(Segment::text(kind, span.clone(), ", "));
        }
        parts.push(item);
    }
    parts.push(Segment::text(kind, span.clone(), close));
    Segment::group(kind, span, parts)
}

/// `{ a, b }`
fn object(kind: NodeKind, span: Span, entries: Vec<Segment>) -> Segment {
    delimited(kind, span, ("{ ", " }"), entries)
}

/// `[a, b]`
fn array(kind: NodeKind, span: Span, items: Vec<Segment>) -> Segment {
    delimited(kind, span, ("[", "]"), items)
}
