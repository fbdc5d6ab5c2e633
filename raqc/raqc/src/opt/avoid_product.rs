//! Cartesian-product elimination.
//!
//! A selection over a cross product becomes an equi-join when its condition
//! syntactically mentions relations from both sides. The whole condition
//! moves onto the join; running selection push-down afterwards separates
//! filter predicates from the join predicate.

use crate::ir::ra::*;
use crate::opt::map_children;
use crate::opt::predicate::{qualified_refs, qualifier_matches};

pub(super) fn avoid_cartesian_product(node: Node, applied: &mut Vec<String>) -> Node {
    match node {
        Node::Selection(selection) => {
            let Selection { condition, input } = selection;
            match *input {
                Node::CrossProduct(product) => {
                    if mentions_both_sides(&condition, &product) {
                        applied.push("Convert Cartesian product to join".to_string());
                        let left = avoid_cartesian_product(*product.left, applied);
                        let right = avoid_cartesian_product(*product.right, applied);
                        Node::join(condition, left, right)
                    } else {
                        Node::selection(
                            condition,
                            avoid_cartesian_product(Node::CrossProduct(product), applied),
                        )
                    }
                }
                other => Node::selection(condition, avoid_cartesian_product(other, applied)),
            }
        }
        other => map_children(other, |child| avoid_cartesian_product(child, applied)),
    }
}

fn mentions_both_sides(condition: &str, product: &CrossProduct) -> bool {
    let left_relations = product.left.base_relations();
    let right_relations = product.right.base_relations();

    let refs = qualified_refs(condition);
    let touches_left = refs
        .iter()
        .any(|(qualifier, _)| qualifier_matches(qualifier, &left_relations));
    let touches_right = refs
        .iter()
        .any(|(qualifier, _)| qualifier_matches(qualifier, &right_relations));

    touches_left && touches_right
}
