//! Relational Algebra tree.
//!
//! Every node is built once, by the translator or by a rewrite pass; nodes
//! are never mutated in place. A rewrite consumes a tree and returns a new
//! one.

use std::collections::HashSet;

use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, EnumAsInner)]
pub enum Node {
    Relation(Relation),
    Projection(Projection),
    Selection(Selection),
    Join(Join),
    CrossProduct(CrossProduct),
}

/// A base relation, named after the schema table. Aliases do not survive
/// translation.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Projection {
    /// The literal column list the user wrote, `"*"` included.
    pub attributes: Vec<String>,
    pub input: Box<Node>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Selection {
    /// Infix rendering of the originating boolean expression. Rewrite rules
    /// pattern-match on this string.
    pub condition: String,
    pub input: Box<Node>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Join {
    pub condition: String,
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct CrossProduct {
    pub left: Box<Node>,
    pub right: Box<Node>,
}

impl Node {
    pub fn relation<S: Into<String>>(name: S) -> Node {
        Node::Relation(Relation { name: name.into() })
    }

    pub fn projection(attributes: Vec<String>, input: Node) -> Node {
        Node::Projection(Projection {
            attributes,
            input: Box::new(input),
        })
    }

    pub fn selection<S: Into<String>>(condition: S, input: Node) -> Node {
        Node::Selection(Selection {
            condition: condition.into(),
            input: Box::new(input),
        })
    }

    pub fn join<S: Into<String>>(condition: S, left: Node, right: Node) -> Node {
        Node::Join(Join {
            condition: condition.into(),
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn cross_product(left: Node, right: Node) -> Node {
        Node::CrossProduct(CrossProduct {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Lower-cased names of the base relations under this subtree, collected
    /// in a single pre-order walk. Not cached: rewrites change tree shape.
    pub fn base_relations(&self) -> HashSet<String> {
        let mut names = HashSet::new();
        self.collect_base_relations(&mut names);
        names
    }

    fn collect_base_relations(&self, names: &mut HashSet<String>) {
        match self {
            Node::Relation(relation) => {
                names.insert(relation.name.to_ascii_lowercase());
            }
            Node::Projection(p) => p.input.collect_base_relations(names),
            Node::Selection(s) => s.input.collect_base_relations(names),
            Node::Join(j) => {
                j.left.collect_base_relations(names);
                j.right.collect_base_relations(names);
            }
            Node::CrossProduct(c) => {
                c.left.collect_base_relations(names);
                c.right.collect_base_relations(names);
            }
        }
    }

    /// The union of selection predicates reachable in this subtree, split at
    /// top-level AND. Rewrites must preserve this multiset.
    pub fn selection_predicates(&self) -> Vec<String> {
        let mut predicates = Vec::new();
        self.collect_selection_predicates(&mut predicates);
        predicates
    }

    fn collect_selection_predicates(&self, predicates: &mut Vec<String>) {
        match self {
            Node::Relation(_) => {}
            Node::Projection(p) => p.input.collect_selection_predicates(predicates),
            Node::Selection(s) => {
                predicates.extend(crate::opt::predicate::split_conjunction(&s.condition));
                s.input.collect_selection_predicates(predicates);
            }
            Node::Join(j) => {
                j.left.collect_selection_predicates(predicates);
                j.right.collect_selection_predicates(predicates);
            }
            Node::CrossProduct(c) => {
                c.left.collect_selection_predicates(predicates);
                c.right.collect_selection_predicates(predicates);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_relations_walks_the_whole_tree() {
        let tree = Node::projection(
            vec!["*".to_string()],
            Node::join(
                "u.id = o.user_id",
                Node::selection("u.age > 18", Node::relation("Users")),
                Node::relation("orders"),
            ),
        );

        let names = tree.base_relations();
        assert!(names.contains("users"));
        assert!(names.contains("orders"));
        assert_eq!(names.len(), 2);
    }
}
