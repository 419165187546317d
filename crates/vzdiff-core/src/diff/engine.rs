//! Semantic comparison engine.
//!
//! The entry point is [`diff`], which describes both values, compares the
//! resulting [`Node`] trees under the suppression policy and renders the
//! surviving differences.
//!
//! Suppression is keyed on the candidate (second) side only:
//!
//! - at every path, including the root, an unset candidate value hides the
//!   whole subtree beneath it;
//! - map keys present only in the reference are ignored;
//! - sequences are compared by index, so reference-only trailing elements
//!   are reported as removals.

use crate::diff::describe::{describe, Diffable};
use crate::diff::model::{Container, DiffNode, DiffStats, Label, Node};
use crate::diff::render::render_report;
use std::collections::BTreeSet;

/// Compare two values and render a report of their semantic differences.
///
/// Returns an empty string when the values are equal once unset candidate
/// fields and reference-only map keys are disregarded.
///
/// ```
/// use std::collections::BTreeMap;
///
/// let reference: BTreeMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
/// let candidate: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
/// assert_eq!(vzdiff_core::diff(&reference, &candidate), "");
/// ```
pub fn diff<T: Diffable + ?Sized>(reference: &T, candidate: &T) -> String {
    Comparison {
        reference,
        candidate,
    }
    .report()
}

/// Named pair of values to compare.
///
/// Same semantics as [`diff`]; naming the sides keeps the argument that
/// drives suppression explicit at the call site.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a, T: ?Sized> {
    pub reference: &'a T,
    pub candidate: &'a T,
}

impl<T: Diffable + ?Sized> Comparison<'_, T> {
    /// Rendered report; empty when the values are semantically equal.
    pub fn report(&self) -> String {
        let (reference, candidate) = self.describe_both();
        render_report(&compare_nodes(&reference, &candidate))
    }

    pub fn is_equal(&self) -> bool {
        let (reference, candidate) = self.describe_both();
        !compare_nodes(&reference, &candidate).has_differences()
    }

    /// Outcome counts for the comparison.
    pub fn stats(&self) -> DiffStats {
        let (reference, candidate) = self.describe_both();
        compare_nodes(&reference, &candidate).stats()
    }

    fn describe_both(&self) -> (Node, Node) {
        (describe(self.reference), describe(self.candidate))
    }
}

/// Compare two described values.
pub fn compare_nodes<'a>(reference: &'a Node, candidate: &'a Node) -> DiffNode<'a> {
    compare(Some(reference), Some(candidate))
}

/// `None` on either side means "no corresponding entry" (missing map key,
/// missing record field, or a sequence index past the end).
fn compare<'a>(reference: Option<&'a Node>, candidate: Option<&'a Node>) -> DiffNode<'a> {
    match (reference, candidate) {
        (_, None) => match reference {
            // Only sequences reach here with a reference-side element.
            Some(r) => DiffNode::Removed(r),
            None => DiffNode::Ignored,
        },
        (_, Some(c)) if c.is_unset() => DiffNode::Ignored,
        (None, Some(c)) => DiffNode::Added(c),
        (Some(r), Some(c)) => compare_present(r, c),
    }
}

fn compare_present<'a>(reference: &'a Node, candidate: &'a Node) -> DiffNode<'a> {
    match (reference, candidate) {
        (
            Node::Record {
                type_name: ref_name,
                fields: ref_fields,
            },
            Node::Record {
                type_name: cand_name,
                fields: cand_fields,
            },
        ) if ref_name == cand_name => {
            compare_records(*cand_name, ref_fields, cand_fields, candidate)
        }

        (Node::Sequence(ref_items), Node::Sequence(Some(cand_items))) => {
            let ref_items = ref_items.as_deref().unwrap_or(&[]);
            compare_sequences(ref_items, cand_items, candidate)
        }

        (Node::Map(ref_entries), Node::Map(Some(cand_entries))) => {
            let keys: BTreeSet<&String> = ref_entries
                .iter()
                .flat_map(|m| m.keys())
                .chain(cand_entries.keys())
                .collect();
            let mut children = Vec::with_capacity(keys.len());
            for key in keys {
                let r = ref_entries.as_ref().and_then(|m| m.get(key));
                let c = cand_entries.get(key);
                let child = match (r, c) {
                    // reference-only key
                    (Some(_), None) => DiffNode::Ignored,
                    _ => compare(r, c),
                };
                children.push((Label::Key(key.clone()), child));
            }
            finish_nested(Container::Map, children, candidate)
        }

        (Node::Optional(Some(r)), Node::Optional(Some(c))) => {
            // the inner value is still subject to the emptiness filter
            match compare(Some(&**r), Some(&**c)) {
                DiffNode::Identical(_) => DiffNode::Identical(candidate),
                DiffNode::Changed { .. } => DiffNode::Changed {
                    reference,
                    candidate,
                },
                other => other,
            }
        }

        _ if scalars_equal(reference, candidate) => DiffNode::Identical(candidate),

        _ => DiffNode::Changed {
            reference,
            candidate,
        },
    }
}

fn compare_records<'a>(
    type_name: &'static str,
    ref_fields: &'a [(&'static str, Node)],
    cand_fields: &'a [(&'static str, Node)],
    candidate: &'a Node,
) -> DiffNode<'a> {
    let lookup = |name: &str| {
        ref_fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, node)| node)
    };

    let mut children: Vec<(Label, DiffNode<'a>)> = cand_fields
        .iter()
        .map(|(name, node)| (Label::Field(*name), compare(lookup(*name), Some(node))))
        .collect();

    // Fields the candidate type does not declare carry no intent.
    for (name, _) in ref_fields {
        if !cand_fields.iter().any(|(field, _)| field == name) {
            children.push((Label::Field(*name), DiffNode::Ignored));
        }
    }

    finish_nested(Container::Record(type_name), children, candidate)
}

fn compare_sequences<'a>(
    ref_items: &'a [Node],
    cand_items: &'a [Node],
    candidate: &'a Node,
) -> DiffNode<'a> {
    let len = ref_items.len().max(cand_items.len());
    let children = (0..len)
        .map(|i| {
            (
                Label::Index(i),
                compare(ref_items.get(i), cand_items.get(i)),
            )
        })
        .collect();
    finish_nested(Container::Sequence, children, candidate)
}

/// Collapse a container with no surviving differences into `Identical`.
fn finish_nested<'a>(
    container: Container,
    children: Vec<(Label, DiffNode<'a>)>,
    candidate: &'a Node,
) -> DiffNode<'a> {
    if children.iter().any(|(_, child)| child.has_differences()) {
        DiffNode::Nested {
            container,
            children,
        }
    } else {
        DiffNode::Identical(candidate)
    }
}

fn scalars_equal(reference: &Node, candidate: &Node) -> bool {
    match (reference, candidate) {
        (Node::Str(a), Node::Str(b)) => a == b,
        (Node::Bool(a), Node::Bool(b)) => a == b,
        (Node::Timestamp(a), Node::Timestamp(b)) => a == b,
        (Node::Opaque(a), Node::Opaque(b)) => a == b,
        (Node::Optional(None), Node::Optional(None)) => true,
        _ => match (as_number(reference), as_number(candidate)) {
            (Some(a), Some(b)) => numbers_equal(a, b),
            _ => false,
        },
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

fn as_number(node: &Node) -> Option<Number> {
    match node {
        Node::Signed(v) => Some(Number::Signed(*v)),
        Node::Unsigned(v) => Some(Number::Unsigned(*v)),
        Node::Float(v) => Some(Number::Float(*v)),
        _ => None,
    }
}

fn numbers_equal(a: Number, b: Number) -> bool {
    match (a, b) {
        (Number::Signed(x), Number::Signed(y)) => x == y,
        (Number::Unsigned(x), Number::Unsigned(y)) => x == y,
        (Number::Signed(x), Number::Unsigned(y)) | (Number::Unsigned(y), Number::Signed(x)) => {
            u128::try_from(x).is_ok_and(|x| x == y)
        }
        (Number::Float(x), Number::Float(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Number::Float(f), Number::Signed(i)) | (Number::Signed(i), Number::Float(f)) => {
            integral(f).is_some_and(|whole| {
                (-TWO_POW_127..TWO_POW_127).contains(&whole) && whole as i128 == i
            })
        }
        (Number::Float(f), Number::Unsigned(u)) | (Number::Unsigned(u), Number::Float(f)) => {
            integral(f).is_some_and(|whole| {
                (0.0..TWO_POW_128).contains(&whole) && whole as u128 == u
            })
        }
    }
}

/// 2^127 and 2^128 are exact in f64; casts inside these bounds are lossless
/// for integral values.
const TWO_POW_127: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const TWO_POW_128: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

fn integral(f: f64) -> Option<f64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f)
}
