//! Selection push-down with AND decomposition.
//!
//! Selections over a projection lift the projection above themselves;
//! selections over a join or cross product are split at top-level AND and
//! each predicate that references only one side moves into that side.

use crate::ir::ra::*;
use crate::opt::map_children;
use crate::opt::predicate::{qualified_refs, resolve_side, split_conjunction, Side};

pub(super) fn push_down_selections(node: Node, applied: &mut Vec<String>) -> Node {
    match node {
        Node::Selection(selection) => push_selection(selection, applied),
        other => map_children(other, |child| push_down_selections(child, applied)),
    }
}

fn push_selection(selection: Selection, applied: &mut Vec<String>) -> Node {
    let Selection { condition, input } = selection;

    match *input {
        Node::Projection(projection) => {
            // Lift the projection above the selection, widening it with the
            // qualified attributes the condition needs.
            let attributes = extend_attributes(projection.attributes, &condition);
            applied.push(format!("Push selection through projection: σ[{condition}]"));

            let inner = push_down_selections(Node::selection(condition, *projection.input), applied);
            Node::Projection(Projection {
                attributes,
                input: Box::new(inner),
            })
        }
        Node::Join(join) => {
            let (left, right, keep) =
                distribute(condition, *join.left, *join.right, "join", applied);
            rebuild(Node::join(join.condition, left, right), keep)
        }
        Node::CrossProduct(product) => {
            let (left, right, keep) = distribute(
                condition,
                *product.left,
                *product.right,
                "cross product",
                applied,
            );
            rebuild(Node::cross_product(left, right), keep)
        }
        other => Node::selection(condition, push_down_selections(other, applied)),
    }
}

/// Split a condition and sort its predicates onto the sides of a binary
/// operator. Returns the rewritten sides and the predicates that stay above.
fn distribute(
    condition: String,
    left: Node,
    right: Node,
    operator: &str,
    applied: &mut Vec<String>,
) -> (Node, Node, Vec<String>) {
    let left_relations = left.base_relations();
    let right_relations = right.base_relations();

    let mut left_predicates = Vec::new();
    let mut right_predicates = Vec::new();
    let mut keep = Vec::new();

    for predicate in split_conjunction(&condition) {
        match resolve_side(&predicate, &left_relations, &right_relations) {
            Some(Side::Left) => left_predicates.push(predicate),
            Some(Side::Right) => right_predicates.push(predicate),
            None => keep.push(predicate),
        }
    }

    let left = push_side(left, left_predicates, operator, "left", applied);
    let right = push_side(right, right_predicates, operator, "right", applied);

    (left, right, keep)
}

fn push_side(
    side: Node,
    predicates: Vec<String>,
    operator: &str,
    which: &str,
    applied: &mut Vec<String>,
) -> Node {
    if predicates.is_empty() {
        return push_down_selections(side, applied);
    }

    let condition = predicates.join(" AND ");
    applied.push(format!(
        "Push selection into {which} {operator} input: σ[{condition}]"
    ));
    // the pass re-runs on the freshly wrapped side
    push_down_selections(Node::selection(condition, side), applied)
}

fn rebuild(operator: Node, keep: Vec<String>) -> Node {
    if keep.is_empty() {
        operator
    } else {
        Node::selection(keep.join(" AND "), operator)
    }
}

/// Widen a projection's attribute list with the qualified references of a
/// condition, unless the projection is a wildcard.
fn extend_attributes(attributes: Vec<String>, condition: &str) -> Vec<String> {
    if attributes.is_empty() || attributes.contains(&"*".to_string()) {
        return attributes;
    }

    let mut attributes = attributes;
    for (qualifier, column) in qualified_refs(condition) {
        let name = format!("{qualifier}.{column}");
        if !attributes.contains(&name) {
            attributes.push(name);
        }
    }
    attributes
}
