use itertools::Itertools;

use crate::ir::ra::Node;

/// Render an algebra tree in standard relational-algebra notation.
pub fn write_node(node: &Node) -> String {
    match node {
        Node::Relation(relation) => relation.name.clone(),
        Node::Projection(p) => {
            format!("π[{}]({})", write_attributes(&p.attributes), write_node(&p.input))
        }
        Node::Selection(s) => format!("σ[{}]({})", s.condition, write_node(&s.input)),
        Node::Join(j) => format!(
            "⨝[{}]({}, {})",
            j.condition,
            write_node(&j.left),
            write_node(&j.right)
        ),
        Node::CrossProduct(c) => {
            format!("({} × {})", write_node(&c.left), write_node(&c.right))
        }
    }
}

fn write_attributes(attributes: &[String]) -> String {
    if attributes.is_empty() || matches!(attributes, [only] if only == "*") {
        "*".to_string()
    } else {
        attributes.iter().join(", ")
    }
}
