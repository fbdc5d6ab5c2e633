//! Rendering of expressions and algebra trees into their textual artifacts.

mod expr;
mod graph;
mod mermaid;
mod ra;

pub(crate) use expr::{write_expr, write_operand};
pub use graph::{render_graph, Graph, GraphEdge, GraphNode, NodeShape};
pub use mermaid::write_mermaid;
pub use ra::write_node;
