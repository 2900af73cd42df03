//! Segment tree: generated text that still knows which node produced it
//!
//! Concatenating the leaves in order gives the unformatted output. Each segment keeps
//! the kind and source span of its node, so any offset in the output can be traced back
//! to the grammar construct it came from.

use crate::dsl::cst::{NodeKind, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub kind: NodeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentBody {
    Text(String),
    Group(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub origin: Origin,
    pub body: SegmentBody,
}

impl Segment {
    pub fn text(kind: NodeKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            origin: Origin { kind, span },
            body: SegmentBody::Text(text.into()),
        }
    }

    pub fn group(kind: NodeKind, span: Span, children: Vec<Segment>) -> Self {
        Self {
            origin: Origin { kind, span },
            body: SegmentBody::Group(children),
        }
    }

    /// Pre-order leaf concatenation
    pub fn concat(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        match &self.body {
            SegmentBody::Text(text) => out.push_str(text),
            SegmentBody::Group(children) => {
                for child in children {
                    child.write_to(out);
                }
            }
        }
    }

    /// Length of the text this segment produces
    pub fn len(&self) -> usize {
        match &self.body {
            SegmentBody::Text(text) => text.len(),
            SegmentBody::Group(children) => children.iter().map(Segment::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Innermost segment origin covering byte `offset` of the concatenated output
    pub fn origin_at(&self, offset: usize) -> Option<&Origin> {
        if offset >= self.len() {
            return None;
        }
        match &self.body {
            SegmentBody::Text(_) => Some(&self.origin),
            SegmentBody::Group(children) => {
                let mut start = 0;
                for child in children {
                    let end = start + child.len();
                    if offset < end {
                        return child.origin_at(offset - start).or(Some(&self.origin));
                    }
                    start = end;
                }
                Some(&self.origin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Segment {
        Segment::group(
            NodeKind::Rule,
            0..20,
            vec![
                Segment::text(NodeKind::Rule, 0..20, "a("),
                Segment::group(
                    NodeKind::Consume,
                    6..10,
                    vec![Segment::text(NodeKind::Consume, 6..10, "this.CONSUME(B)")],
                ),
                Segment::text(NodeKind::Rule, 0..20, ")"),
            ],
        )
    }

    #[test]
    fn test_concat_is_pre_order() {
        assert_eq!(sample().concat(), "a(this.CONSUME(B))");
        assert_eq!(sample().len(), 18);
    }

    #[test]
    fn test_origin_at_finds_innermost_node() {
        let segment = sample();
        assert_eq!(segment.origin_at(0).unwrap().kind, NodeKind::Rule);
        assert_eq!(segment.origin_at(2).unwrap().kind, NodeKind::Consume);
        assert_eq!(segment.origin_at(2).unwrap().span, 6..10);
        assert_eq!(segment.origin_at(17).unwrap().kind, NodeKind::Rule);
        assert!(segment.origin_at(18).is_none());
    }

    #[test]
    fn test_empty_group() {
        let segment = Segment::group(NodeKind::Grammar, 0..0, Vec::new());
        assert!(segment.is_empty());
        assert_eq!(segment.concat(), "");
    }
}
