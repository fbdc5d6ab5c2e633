use crate::codegen::write_expr;
use crate::ir::ra::Node;
use crate::pr;
use crate::{Error, Result, WithErrorInfo};

/// Translate a statement into its canonical relational-algebra tree.
///
/// Aliases are dropped here: the algebra works on table names, and downstream
/// consumers compare attribute qualifiers against relation names
/// case-insensitively.
pub fn lower(stmt: &pr::Stmt) -> Result<Node> {
    match &stmt.kind {
        pr::StmtKind::Select(select) => Ok(lower_select(select)),
        other => Err(Error::new_simple(format!(
            "Translation of {} statements is not supported",
            other.as_ref()
        ))
        .with_code("E0201")
        .with_span(stmt.span)),
    }
}

fn lower_select(select: &pr::SelectStmt) -> Node {
    let mut base = match &select.from.source {
        pr::TableSource::Table(name) => Node::relation(name.clone()),
        pr::TableSource::Subquery(inner) => lower_select(inner),
    };

    // join chains are left-associative: `A J1 B J2 C` becomes
    // Join(Join(A, B), C)
    for join in &select.joins {
        let right = Node::relation(join.table.clone());
        base = match join.kind {
            pr::JoinKind::Inner => {
                // the grammar guarantees ON on inner joins
                let condition = join.on.as_ref().map(write_expr).unwrap_or_default();
                Node::join(condition, base, right)
            }
            pr::JoinKind::Cross => Node::cross_product(base, right),
        };
    }

    if let Some(filter) = &select.filter {
        base = Node::selection(write_expr(filter), base);
    }

    Node::projection(extract_attributes(&select.columns), base)
}

fn extract_attributes(columns: &[pr::Column]) -> Vec<String> {
    columns
        .iter()
        .map(|column| match column {
            pr::Column::Star => "*".to_string(),
            pr::Column::Named(name) => name.clone(),
        })
        .collect()
}
