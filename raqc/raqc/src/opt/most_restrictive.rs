//! Most-restrictive-first selection reordering.
//!
//! In a chain of consecutive selections, adjacent pairs swap when the outer
//! predicate scores strictly more restrictive than the inner one, bubbling
//! low-score predicates towards the relation. A single bubble-down pass, not
//! a full sort.

use crate::ir::ra::*;
use crate::opt::map_children;
use crate::opt::predicate::restrictiveness;

pub(super) fn most_restrictive_first(node: Node, applied: &mut Vec<String>) -> Node {
    match node {
        Node::Selection(outer) => {
            let Selection { condition, input } = outer;
            match *input {
                Node::Selection(inner) => {
                    if restrictiveness(&condition) < restrictiveness(&inner.condition) {
                        applied.push(format!(
                            "Apply most restrictive selection first: σ[{condition}]"
                        ));
                        // keep bubbling the restrictive predicate downwards
                        let pushed = most_restrictive_first(
                            Node::selection(condition, *inner.input),
                            applied,
                        );
                        Node::selection(inner.condition, pushed)
                    } else {
                        Node::selection(
                            condition,
                            most_restrictive_first(Node::Selection(inner), applied),
                        )
                    }
                }
                other => Node::selection(condition, most_restrictive_first(other, applied)),
            }
        }
        other => map_children(other, |child| most_restrictive_first(child, applied)),
    }
}
