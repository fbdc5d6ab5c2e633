//! The rewrite engine: a pipeline of named heuristic passes over the algebra
//! tree.
//!
//! Every pass is a pure function from tree to tree that records a
//! human-readable line for each rewrite it performs. Passes never fail; at
//! worst they return their input unchanged.

mod avoid_product;
mod most_restrictive;
pub(crate) mod predicate;
mod push_projections;
mod push_selections;

use serde::{Deserialize, Serialize};

use crate::ir::ra::{CrossProduct, Join, Node, Projection, Selection};

/// The four rewrite heuristics, spelled the way callers select them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Heuristic {
    PushDownSelections,
    PushDownProjections,
    ApplyMostRestrictiveFirst,
    AvoidCartesianProduct,
}

/// The default pipeline, in order.
pub const DEFAULT_PIPELINE: &[Heuristic] = &[
    Heuristic::PushDownSelections,
    Heuristic::PushDownProjections,
    Heuristic::ApplyMostRestrictiveFirst,
    Heuristic::AvoidCartesianProduct,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub optimized: Node,
    /// One line per rewrite that actually happened, in application order.
    pub applied_rules: Vec<String>,
}

/// Apply the selected heuristics in the given order. An empty selection is
/// the identity.
pub fn optimize(node: Node, heuristics: &[Heuristic]) -> Optimization {
    let mut node = node;
    let mut applied_rules = Vec::new();

    for heuristic in heuristics {
        log::debug!("running {heuristic}");
        node = match heuristic {
            Heuristic::PushDownSelections => {
                push_selections::push_down_selections(node, &mut applied_rules)
            }
            Heuristic::PushDownProjections => {
                push_projections::push_down_projections(node, &mut applied_rules)
            }
            Heuristic::ApplyMostRestrictiveFirst => {
                most_restrictive::most_restrictive_first(node, &mut applied_rules)
            }
            Heuristic::AvoidCartesianProduct => {
                avoid_product::avoid_cartesian_product(node, &mut applied_rules)
            }
        };
    }

    Optimization {
        optimized: node,
        applied_rules,
    }
}

/// Parse heuristic ids, silently ignoring unknown ones.
pub fn parse_heuristics<'a, I: IntoIterator<Item = &'a str>>(ids: I) -> Vec<Heuristic> {
    ids.into_iter()
        .filter_map(|id| id.trim().parse().ok())
        .collect()
}

/// Rebuild a node, applying `f` to each direct child.
pub(crate) fn map_children<F>(node: Node, mut f: F) -> Node
where
    F: FnMut(Node) -> Node,
{
    match node {
        Node::Relation(relation) => Node::Relation(relation),
        Node::Projection(p) => Node::Projection(Projection {
            attributes: p.attributes,
            input: Box::new(f(*p.input)),
        }),
        Node::Selection(s) => Node::Selection(Selection {
            condition: s.condition,
            input: Box::new(f(*s.input)),
        }),
        Node::Join(j) => {
            let left = f(*j.left);
            let right = f(*j.right);
            Node::Join(Join {
                condition: j.condition,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
        Node::CrossProduct(c) => {
            let left = f(*c.left);
            let right = f(*c.right);
            Node::CrossProduct(CrossProduct {
                left: Box::new(left),
                right: Box::new(right),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use insta::assert_snapshot;
    use itertools::Itertools;

    use crate::codegen::write_node;
    use crate::semantic::lower;
    use raqc_parser::parse_source;

    use super::*;

    fn translate(source: &str) -> Node {
        lower(&parse_source(source).unwrap()).unwrap()
    }

    #[test]
    fn empty_selection_is_identity() {
        let tree = translate("SELECT * FROM users WHERE age > 18");
        let result = optimize(tree.clone(), &[]);

        assert_eq!(result.optimized, tree);
        assert!(result.applied_rules.is_empty());
    }

    #[test]
    fn heuristic_ids_round_trip() {
        assert_eq!(
            Heuristic::PushDownSelections.to_string(),
            "PUSH_DOWN_SELECTIONS"
        );
        assert_eq!(
            parse_heuristics(["PUSH_DOWN_PROJECTIONS", "bogus", "AVOID_CARTESIAN_PRODUCT"]),
            vec![
                Heuristic::PushDownProjections,
                Heuristic::AvoidCartesianProduct
            ]
        );
    }

    #[test]
    fn product_conversion_then_push_down() {
        // with only rule 4, the whole condition lands on the join
        let tree = translate(
            "SELECT * FROM users u CROSS JOIN orders o WHERE u.id = o.user_id AND u.age > 18",
        );
        let result = optimize(tree, &[Heuristic::AvoidCartesianProduct]);
        assert_snapshot!(
            write_node(&result.optimized),
            @"π[*](⨝[(u.id = o.user_id AND u.age > 18)](users, orders))"
        );

        // rule 1 first keeps the filter out of the join predicate
        let tree = translate(
            "SELECT * FROM users u CROSS JOIN orders o WHERE u.id = o.user_id AND u.age > 18",
        );
        let result = optimize(
            tree,
            &[Heuristic::PushDownSelections, Heuristic::AvoidCartesianProduct],
        );
        assert_snapshot!(
            write_node(&result.optimized),
            @"π[*](⨝[u.id = o.user_id](σ[u.age > 18](users), orders))"
        );
    }

    #[test]
    fn default_pipeline_preserves_semantics() {
        let source = "SELECT u.name, o.total FROM users u \
                      INNER JOIN orders o ON u.id = o.user_id \
                      WHERE u.age > 18 AND o.total > 100";
        let tree = translate(source);

        let original_relations = tree.base_relations();
        let original_predicates: Vec<String> =
            tree.selection_predicates().into_iter().sorted().collect();

        let result = optimize(tree, DEFAULT_PIPELINE);

        // leaves unchanged
        assert_eq!(result.optimized.base_relations(), original_relations);

        // the multiset of selection predicates is preserved
        let optimized_predicates: Vec<String> = result
            .optimized
            .selection_predicates()
            .into_iter()
            .sorted()
            .collect();
        assert_eq!(optimized_predicates, original_predicates);

        // the root projection keeps the requested attribute order
        let root = result.optimized.as_projection().unwrap();
        assert_eq!(root.attributes, vec!["u.name", "o.total"]);
    }

    #[test]
    fn passes_accept_any_subset_in_any_order() {
        let source = "SELECT u.name FROM users u INNER JOIN orders o ON u.id = o.user_id";
        let tree = translate(source);

        let subsets: &[&[Heuristic]] = &[
            &[Heuristic::AvoidCartesianProduct, Heuristic::PushDownSelections],
            &[Heuristic::ApplyMostRestrictiveFirst],
            DEFAULT_PIPELINE,
        ];

        for subset in subsets {
            let result = optimize(tree.clone(), subset);
            let relations: HashSet<String> = result.optimized.base_relations();
            assert_eq!(relations, tree.base_relations());
        }
    }
}
