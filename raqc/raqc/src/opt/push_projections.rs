//! Projection push-down.
//!
//! Consecutive projections collapse into the outermost one. A non-wildcard
//! projection over a join pushes a narrowing projection onto each join input,
//! keeping the outer projection to fix the output column order. Projections
//! are not pushed through selections: in the canonical tree the selection
//! already runs before the projection.

use crate::ir::ra::*;
use crate::opt::map_children;
use crate::opt::predicate::{qualified_refs, qualifier_matches};

pub(super) fn push_down_projections(node: Node, applied: &mut Vec<String>) -> Node {
    match node {
        Node::Projection(projection) => push_projection(projection, applied),
        other => map_children(other, |child| push_down_projections(child, applied)),
    }
}

fn push_projection(projection: Projection, applied: &mut Vec<String>) -> Node {
    let Projection { attributes, input } = projection;

    match *input {
        Node::Projection(inner) => {
            applied.push("Combine consecutive projections".to_string());
            push_down_projections(
                Node::Projection(Projection {
                    attributes,
                    input: inner.input,
                }),
                applied,
            )
        }
        Node::Join(join) if !is_wildcard(&attributes) => {
            push_through_join(attributes, join, applied)
        }
        other => Node::projection(attributes, push_down_projections(other, applied)),
    }
}

fn push_through_join(attributes: Vec<String>, join: Join, applied: &mut Vec<String>) -> Node {
    // Everything the join's subtrees must keep producing: the ancestor
    // needs, the join condition, and the join conditions and projections
    // inside the subtrees. Selection conditions are filter-only and are not
    // collected as outputs.
    let mut needed: Vec<String> = Vec::new();
    extend_unique(&mut needed, attributes.iter().cloned());
    extend_unique(&mut needed, condition_attributes(&join.condition));
    collect_subtree_needs(&join.left, &mut needed);
    collect_subtree_needs(&join.right, &mut needed);

    let left_relations = join.left.base_relations();
    let right_relations = join.right.base_relations();

    let mut left_attrs: Vec<String> = Vec::new();
    let mut right_attrs: Vec<String> = Vec::new();

    for attr in needed {
        let Some((qualifier, _)) = attr.split_once('.') else {
            // an unqualified attribute cannot be attributed to a side; leave
            // the tree unchanged rather than guessing
            return keep_as_is(attributes, join, applied);
        };
        let in_left = qualifier_matches(qualifier, &left_relations);
        let in_right = qualifier_matches(qualifier, &right_relations);
        match (in_left, in_right) {
            (true, false) => extend_unique(&mut left_attrs, [attr]),
            (false, true) => extend_unique(&mut right_attrs, [attr]),
            _ => return keep_as_is(attributes, join, applied),
        }
    }

    applied.push(format!(
        "Push projection into join inputs: π[{}] / π[{}]",
        left_attrs.join(", "),
        right_attrs.join(", ")
    ));

    let left = narrow_side(*join.left, left_attrs, applied);
    let right = narrow_side(*join.right, right_attrs, applied);

    // the outer projection stays to fix the output column order
    Node::projection(attributes, Node::join(join.condition, left, right))
}

fn keep_as_is(attributes: Vec<String>, join: Join, applied: &mut Vec<String>) -> Node {
    let left = push_down_projections(*join.left, applied);
    let right = push_down_projections(*join.right, applied);
    Node::projection(attributes, Node::join(join.condition, left, right))
}

/// Wrap a join input in a narrowing projection, or widen the projection it
/// already has.
fn narrow_side(side: Node, attrs: Vec<String>, applied: &mut Vec<String>) -> Node {
    match side {
        Node::Projection(existing) => {
            if is_wildcard(&existing.attributes) {
                return push_down_projections(Node::Projection(existing), applied);
            }
            let mut attributes = existing.attributes;
            extend_unique(&mut attributes, attrs);
            push_down_projections(
                Node::Projection(Projection {
                    attributes,
                    input: existing.input,
                }),
                applied,
            )
        }
        other => push_down_projections(Node::projection(attrs, other), applied),
    }
}

/// Needed attributes contributed by a subtree: join conditions and
/// projections only.
fn collect_subtree_needs(node: &Node, needed: &mut Vec<String>) {
    match node {
        Node::Relation(_) => {}
        Node::Projection(p) => {
            extend_unique(needed, p.attributes.iter().filter(|a| *a != "*").cloned());
            collect_subtree_needs(&p.input, needed);
        }
        Node::Selection(s) => collect_subtree_needs(&s.input, needed),
        Node::Join(j) => {
            extend_unique(needed, condition_attributes(&j.condition));
            collect_subtree_needs(&j.left, needed);
            collect_subtree_needs(&j.right, needed);
        }
        Node::CrossProduct(c) => {
            collect_subtree_needs(&c.left, needed);
            collect_subtree_needs(&c.right, needed);
        }
    }
}

fn condition_attributes(condition: &str) -> Vec<String> {
    qualified_refs(condition)
        .into_iter()
        .map(|(qualifier, column)| format!("{qualifier}.{column}"))
        .collect()
}

fn extend_unique<I: IntoIterator<Item = String>>(attributes: &mut Vec<String>, new: I) {
    for attr in new {
        if !attributes.contains(&attr) {
            attributes.push(attr);
        }
    }
}

fn is_wildcard(attributes: &[String]) -> bool {
    attributes.is_empty() || attributes.iter().any(|a| a == "*")
}
