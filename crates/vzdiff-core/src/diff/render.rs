//! Text rendering of diff trees.
//!
//! Every line starts with a two-character marker (`"  "` context, `"- "`
//! reference side, `"+ "` candidate side) followed by two spaces of
//! indentation per nesting level. Runs of ignored or identical record
//! fields and map entries collapse into a single `... // N ...` summary
//! line; sequence elements that are identical stay inline so positions
//! remain readable.

use crate::diff::model::{Container, DiffNode, Label, Node};

const CONTEXT: &str = "  ";
const REMOVED: &str = "- ";
const ADDED: &str = "+ ";

/// Render a diff tree as a report.
///
/// Returns an empty string when the tree holds no differences.
pub fn render_report(root: &DiffNode<'_>) -> String {
    if !root.has_differences() {
        return String::new();
    }
    let mut out = Report::default();
    out.node(None, root, 0);
    out.lines.join("\n")
}

#[derive(Default)]
struct Report {
    lines: Vec<String>,
}

impl Report {
    fn push(&mut self, marker: &str, depth: usize, text: &str) {
        self.lines
            .push(format!("{}{}{}", marker, "  ".repeat(depth), text));
    }

    /// `label` is `None` only for the root, which has no prefix or trailing comma.
    fn node(&mut self, label: Option<&Label>, node: &DiffNode<'_>, depth: usize) {
        let prefix = label.map(label_prefix).unwrap_or_default();
        let comma = if label.is_some() { "," } else { "" };

        match node {
            DiffNode::Identical(value) => {
                self.push(CONTEXT, depth, &format!("{}{}{}", prefix, inline(value), comma));
            }
            // Folded into summary lines by `children`; a root without
            // differences is never rendered.
            DiffNode::Ignored => {}
            DiffNode::Added(value) => {
                self.push(ADDED, depth, &format!("{}{}{}", prefix, inline(value), comma));
            }
            DiffNode::Removed(value) => {
                self.push(REMOVED, depth, &format!("{}{}{}", prefix, inline(value), comma));
            }
            DiffNode::Changed {
                reference,
                candidate,
            } => {
                self.push(
                    REMOVED,
                    depth,
                    &format!("{}{}{}", prefix, inline(reference), comma),
                );
                self.push(
                    ADDED,
                    depth,
                    &format!("{}{}{}", prefix, inline(candidate), comma),
                );
            }
            DiffNode::Nested {
                container,
                children,
            } => {
                let (open, close) = match container {
                    Container::Record(name) => (format!("{} {{", name), "}"),
                    Container::Sequence => ("[".to_string(), "]"),
                    Container::Map => ("{".to_string(), "}"),
                };
                self.push(CONTEXT, depth, &format!("{}{}", prefix, open));
                self.children(*container, children, depth + 1);
                self.push(CONTEXT, depth, &format!("{}{}", close, comma));
            }
        }
    }

    fn children(&mut self, container: Container, children: &[(Label, DiffNode<'_>)], depth: usize) {
        let keep_identical = container == Container::Sequence;
        let mut ignored = 0;
        let mut identical = 0;

        for (label, child) in children {
            match child {
                DiffNode::Ignored => ignored += 1,
                DiffNode::Identical(_) if !keep_identical => identical += 1,
                _ => {
                    self.flush(container, &mut ignored, &mut identical, depth);
                    self.node(Some(label), child, depth);
                }
            }
        }
        self.flush(container, &mut ignored, &mut identical, depth);
    }

    fn flush(&mut self, container: Container, ignored: &mut usize, identical: &mut usize, depth: usize) {
        if *ignored > 0 || *identical > 0 {
            self.push(CONTEXT, depth, &summary(container, *ignored, *identical));
        }
        *ignored = 0;
        *identical = 0;
    }
}

fn summary(container: Container, ignored: usize, identical: usize) -> String {
    let noun = |count| container.noun(count);
    match (ignored, identical) {
        (i, 0) => format!("... // {} ignored {}", i, noun(i)),
        (0, d) => format!("... // {} identical {}", d, noun(d)),
        (i, d) => format!("... // {} ignored and {} identical {}", i, d, noun(d)),
    }
}

fn label_prefix(label: &Label) -> String {
    match label {
        Label::Field(name) => format!("{}: ", name),
        Label::Key(key) => format!("{}: ", key),
        Label::Index(_) => String::new(),
    }
}

/// Single-line rendering of a value.
///
/// Unset record fields are elided to keep lines short.
fn inline(node: &Node) -> String {
    match node {
        Node::Record { type_name, fields } => {
            let parts: Vec<String> = fields
                .iter()
                .filter(|(_, value)| !value.is_unset())
                .map(|(name, value)| format!("{}: {}", name, inline(value)))
                .collect();
            if parts.is_empty() {
                format!("{} {{}}", type_name)
            } else {
                format!("{} {{ {} }}", type_name, parts.join(", "))
            }
        }
        Node::Sequence(items) => {
            let parts: Vec<String> = items.iter().flatten().map(inline).collect();
            format!("[{}]", parts.join(", "))
        }
        Node::Map(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .flatten()
                .map(|(key, value)| format!("{}: {}", key, inline(value)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Node::Optional(Some(value)) => format!("Some({})", inline(value)),
        Node::Optional(None) => "None".to_string(),
        Node::Str(s) => format!("{:?}", s),
        Node::Signed(v) => v.to_string(),
        Node::Unsigned(v) => v.to_string(),
        Node::Float(v) => format!("{:?}", v),
        Node::Bool(v) => v.to_string(),
        Node::Timestamp(t) => t.to_rfc3339(),
        Node::Opaque(repr) => repr.clone(),
    }
}
