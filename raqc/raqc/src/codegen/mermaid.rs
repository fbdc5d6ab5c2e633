use crate::codegen::{Graph, NodeShape};

/// Write a graph as a Mermaid `flowchart TD` document.
pub fn write_mermaid(graph: &Graph) -> String {
    let mut out = String::from("flowchart TD\n");

    for node in &graph.nodes {
        let label = escape_label(&node.label);
        let line = match node.shape {
            NodeShape::Round => format!("  {}([\"{}\"])\n", node.id, label),
            NodeShape::Hexagon => format!("  {}{{{{\"{}\"}}}}\n", node.id, label),
        };
        out.push_str(&line);
    }

    for edge in &graph.edges {
        let line = match &edge.label {
            Some(label) => format!("  {} -->|{}| {}\n", edge.from, label, edge.to),
            None => format!("  {} --> {}\n", edge.from, edge.to),
        };
        out.push_str(&line);
    }

    out
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}
