//! Value descriptors and diff tree types.
//!
//! [`Node`] is the closed set of shapes the engine knows how to compare;
//! every [`Diffable`](crate::diff::Diffable) type describes itself as one.
//! [`DiffNode`] is the engine's output tree, borrowing from the two
//! described values.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A described comparison value.
///
/// Record field order is the declaration order of the source type. Map
/// entries are keyed by their rendered key, which gives a stable,
/// deterministic traversal order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Structured record with named fields in declared order
    Record {
        type_name: &'static str,
        fields: Vec<(&'static str, Node)>,
    },
    /// Ordered sequence; `None` is an absent (nil) sequence
    Sequence(Option<Vec<Node>>),
    /// Associative map; `None` is an absent (nil) map
    Map(Option<BTreeMap<String, Node>>),
    /// Optional reference
    Optional(Option<Box<Node>>),
    Str(String),
    Signed(i128),
    Unsigned(u128),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// A value that could not be described structurally (for example a
    /// revisited shared pointer); compared by its representation.
    Opaque(String),
}

/// Emptiness classification of a candidate-side value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emptiness {
    /// Absent or zero-length sequence or map
    EmptySequence,
    EmptyString,
    /// Optional holding no value
    EmptyReference,
    ZeroNumber,
    /// Timestamp equal to the default instant, in any timezone
    ZeroTimestamp,
    Present,
}

impl Node {
    /// Classify this value for suppression purposes.
    pub fn emptiness(&self) -> Emptiness {
        match self {
            Node::Sequence(items) => {
                if items.as_ref().map_or(true, |v| v.is_empty()) {
                    Emptiness::EmptySequence
                } else {
                    Emptiness::Present
                }
            }
            Node::Map(entries) => {
                if entries.as_ref().map_or(true, |m| m.is_empty()) {
                    Emptiness::EmptySequence
                } else {
                    Emptiness::Present
                }
            }
            Node::Str(s) if s.is_empty() => Emptiness::EmptyString,
            Node::Optional(None) => Emptiness::EmptyReference,
            Node::Signed(0) | Node::Unsigned(0) => Emptiness::ZeroNumber,
            Node::Float(f) if *f == 0.0 => Emptiness::ZeroNumber,
            Node::Timestamp(t) if *t == DateTime::<Utc>::default() => Emptiness::ZeroTimestamp,
            _ => Emptiness::Present,
        }
    }

    /// True when this value counts as "not specified".
    pub fn is_unset(&self) -> bool {
        self.emptiness() != Emptiness::Present
    }
}

/// Position of a child within its parent container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    Field(&'static str),
    /// Rendered map key
    Key(String),
    Index(usize),
}

/// Kind of container a nested diff was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Record(&'static str),
    Sequence,
    Map,
}

impl Container {
    /// Noun used in "N ignored ..." summaries
    pub(crate) fn noun(&self, count: usize) -> &'static str {
        match (self, count) {
            (Container::Record(_), 1) => "field",
            (Container::Record(_), _) => "fields",
            (Container::Map, 1) => "entry",
            (Container::Map, _) => "entries",
            (Container::Sequence, 1) => "element",
            (Container::Sequence, _) => "elements",
        }
    }
}

/// Result of comparing one reference/candidate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffNode<'a> {
    /// Equal after suppression; carries the candidate value
    Identical(&'a Node),
    /// Suppressed: candidate unset, or map key missing on the candidate side
    Ignored,
    /// Present only on the candidate side
    Added(&'a Node),
    /// Present only on the reference side
    Removed(&'a Node),
    Changed {
        reference: &'a Node,
        candidate: &'a Node,
    },
    /// Container with at least one surviving difference beneath it
    Nested {
        container: Container,
        children: Vec<(Label, DiffNode<'a>)>,
    },
}

impl DiffNode<'_> {
    /// True if any added, removed or changed node survives in this subtree.
    pub fn has_differences(&self) -> bool {
        match self {
            DiffNode::Identical(_) | DiffNode::Ignored => false,
            DiffNode::Added(_) | DiffNode::Removed(_) | DiffNode::Changed { .. } => true,
            DiffNode::Nested { children, .. } => children.iter().any(|(_, c)| c.has_differences()),
        }
    }

    /// Tally of surviving and suppressed nodes in this subtree.
    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        self.accumulate(&mut stats);
        stats
    }

    fn accumulate(&self, stats: &mut DiffStats) {
        match self {
            DiffNode::Identical(_) => stats.identical += 1,
            DiffNode::Ignored => stats.ignored += 1,
            DiffNode::Added(_) => stats.added += 1,
            DiffNode::Removed(_) => stats.removed += 1,
            DiffNode::Changed { .. } => stats.changed += 1,
            DiffNode::Nested { children, .. } => {
                for (_, child) in children {
                    child.accumulate(stats);
                }
            }
        }
    }
}

/// Counts of diff outcomes, used for logging and CLI summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    pub identical: usize,
    pub ignored: usize,
}

impl DiffStats {
    /// Number of differences that surface in the report
    pub fn differences(&self) -> usize {
        self.added + self.removed + self.changed
    }
}
