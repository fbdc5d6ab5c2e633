use serde::{Deserialize, Serialize};

use crate::ir::ra::Node;

/// Directed node/edge description of an algebra tree, consumed by diagram
/// renderers. Deterministic for a given tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub root_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub shape: NodeShape,
    pub label: String,
    /// 1-based execution order, assigned in post-order traversal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Round,
    Hexagon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    /// `"left"` / `"right"` on the edges of binary operators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Emit the node/edge description of an algebra tree.
pub fn render_graph(node: &Node) -> Graph {
    let mut emitter = Emitter::default();
    let root_id = emitter.emit(node);
    Graph {
        nodes: emitter.nodes,
        edges: emitter.edges,
        root_id,
    }
}

#[derive(Default)]
struct Emitter {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl Emitter {
    /// Post-order: children are emitted (and numbered) before their operator.
    fn emit(&mut self, node: &Node) -> String {
        match node {
            Node::Relation(relation) => {
                self.push(NodeShape::Round, relation.name.clone())
            }
            Node::Projection(p) => {
                let input = self.emit(&p.input);
                let id = self.push(
                    NodeShape::Hexagon,
                    format!("π[{}]", attributes_label(&p.attributes)),
                );
                self.connect(&id, &input, None);
                id
            }
            Node::Selection(s) => {
                let input = self.emit(&s.input);
                let id = self.push(NodeShape::Hexagon, format!("σ[{}]", s.condition));
                self.connect(&id, &input, None);
                id
            }
            Node::Join(j) => {
                let left = self.emit(&j.left);
                let right = self.emit(&j.right);
                let id = self.push(NodeShape::Hexagon, format!("⨝[{}]", j.condition));
                self.connect(&id, &left, Some("left"));
                self.connect(&id, &right, Some("right"));
                id
            }
            Node::CrossProduct(c) => {
                let left = self.emit(&c.left);
                let right = self.emit(&c.right);
                let id = self.push(NodeShape::Hexagon, "×".to_string());
                self.connect(&id, &left, Some("left"));
                self.connect(&id, &right, Some("right"));
                id
            }
        }
    }

    fn push(&mut self, shape: NodeShape, label: String) -> String {
        let order = self.nodes.len() + 1;
        let id = format!("node{}", self.nodes.len());
        self.nodes.push(GraphNode {
            id: id.clone(),
            shape,
            label,
            order: Some(order),
        });
        id
    }

    fn connect(&mut self, from: &str, to: &str, label: Option<&str>) {
        self.edges.push(GraphEdge {
            from: from.to_string(),
            to: to.to_string(),
            label: label.map(str::to_string),
        });
    }
}

fn attributes_label(attributes: &[String]) -> String {
    if attributes.is_empty() || matches!(attributes, [only] if only == "*") {
        "*".to_string()
    } else {
        attributes.join(", ")
    }
}
