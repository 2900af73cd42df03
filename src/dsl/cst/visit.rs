//! Depth-first statement traversal with an explicit prune set
//!
//! The walker visits statements in pre-order and source order: a statement is visited
//! before anything nested in it, and a block's gate is walked before its content. Any
//! node whose kind is in the prune set is neither visited nor descended into, which is
//! how callers keep lookahead-only statements out of a pass.

use super::node::{
    Alternative, Backtrack, BacktrackTarget, Content, Gate, NodeKind, Statement, StatementList,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Walker {
    prune: BTreeSet<NodeKind>,
}

impl Walker {
    /// A walker that descends everywhere
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pruning(kinds: impl IntoIterator<Item = NodeKind>) -> Self {
        Self {
            prune: kinds.into_iter().collect(),
        }
    }

    pub fn prunes(&self, kind: NodeKind) -> bool {
        self.prune.contains(&kind)
    }

    pub fn walk<E, F>(&self, list: &StatementList, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Statement) -> Result<(), E>,
    {
        if self.prunes(NodeKind::StatementList) {
            return Ok(());
        }
        for statement in &list.statements {
            self.walk_statement(statement, visit)?;
        }
        Ok(())
    }

    pub fn walk_statement<E, F>(&self, statement: &Statement, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Statement) -> Result<(), E>,
    {
        if self.prunes(statement.kind()) {
            return Ok(());
        }
        visit(statement)?;
        match statement {
            Statement::Option(block) => {
                self.walk_gate(block.gate.as_ref(), visit)?;
                self.walk_content(&block.content, visit)
            }
            Statement::Many(rep) | Statement::AtLeastOne(rep) => {
                self.walk_gate(rep.gate.as_ref(), visit)?;
                self.walk_content(&rep.content, visit)
            }
            Statement::Or(choice) => {
                for alternative in &choice.alternatives {
                    self.walk_alternative(alternative, visit)?;
                }
                Ok(())
            }
            Statement::Consume(_)
            | Statement::Skip(_)
            | Statement::Subrule(_)
            | Statement::Raw(_)
            | Statement::Error(_) => Ok(()),
        }
    }

    fn walk_alternative<E, F>(&self, alternative: &Alternative, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Statement) -> Result<(), E>,
    {
        if self.prunes(NodeKind::Alternative) {
            return Ok(());
        }
        self.walk_gate(alternative.gate.as_ref(), visit)?;
        self.walk_content(&alternative.content, visit)
    }

    fn walk_gate<E, F>(&self, gate: Option<&Gate>, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Statement) -> Result<(), E>,
    {
        match gate {
            Some(Gate::Backtrack(backtrack)) if !self.prunes(NodeKind::Gate) => {
                self.walk_backtrack(backtrack, visit)
            }
            _ => Ok(()),
        }
    }

    fn walk_backtrack<E, F>(&self, backtrack: &Backtrack, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Statement) -> Result<(), E>,
    {
        if self.prunes(NodeKind::BacktrackPredicate) {
            return Ok(());
        }
        match &backtrack.target {
            BacktrackTarget::Rule(_) => Ok(()),
            BacktrackTarget::Content(content) => self.walk_content(content, visit),
        }
    }

    fn walk_content<E, F>(&self, content: &Content, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&Statement) -> Result<(), E>,
    {
        match content {
            Content::Single(statement) => self.walk_statement(statement, visit),
            Content::List(list) => self.walk(list, visit),
        }
    }

    /// Same traversal order as [`Walker::walk`], handing out mutable statements
    pub fn walk_mut<E, F>(&self, list: &mut StatementList, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Statement) -> Result<(), E>,
    {
        if self.prunes(NodeKind::StatementList) {
            return Ok(());
        }
        for statement in &mut list.statements {
            self.walk_statement_mut(statement, visit)?;
        }
        Ok(())
    }

    fn walk_statement_mut<E, F>(&self, statement: &mut Statement, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Statement) -> Result<(), E>,
    {
        if self.prunes(statement.kind()) {
            return Ok(());
        }
        visit(statement)?;
        match statement {
            Statement::Option(block) => {
                self.walk_gate_mut(block.gate.as_mut(), visit)?;
                self.walk_content_mut(&mut block.content, visit)
            }
            Statement::Many(rep) | Statement::AtLeastOne(rep) => {
                self.walk_gate_mut(rep.gate.as_mut(), visit)?;
                self.walk_content_mut(&mut rep.content, visit)
            }
            Statement::Or(choice) => {
                if self.prunes(NodeKind::Alternative) {
                    return Ok(());
                }
                for alternative in &mut choice.alternatives {
                    self.walk_gate_mut(alternative.gate.as_mut(), visit)?;
                    self.walk_content_mut(&mut alternative.content, visit)?;
                }
                Ok(())
            }
            Statement::Consume(_)
            | Statement::Skip(_)
            | Statement::Subrule(_)
            | Statement::Raw(_)
            | Statement::Error(_) => Ok(()),
        }
    }

    fn walk_gate_mut<E, F>(&self, gate: Option<&mut Gate>, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Statement) -> Result<(), E>,
    {
        if self.prunes(NodeKind::Gate) || self.prunes(NodeKind::BacktrackPredicate) {
            return Ok(());
        }
        match gate {
            Some(Gate::Backtrack(Backtrack {
                target: BacktrackTarget::Content(content),
                ..
            })) => self.walk_content_mut(content, visit),
            _ => Ok(()),
        }
    }

    fn walk_content_mut<E, F>(&self, content: &mut Content, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Statement) -> Result<(), E>,
    {
        match content {
            Content::Single(statement) => self.walk_statement_mut(statement, visit),
            Content::List(list) => self.walk_mut(list, visit),
        }
    }
}
