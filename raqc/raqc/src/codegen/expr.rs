use crate::pr;

/// Render a boolean expression in standard infix notation.
///
/// Logical expressions are always parenthesized; comparisons never are. This
/// string becomes the `condition` of Selection and Join nodes and is the sole
/// input to rewrite-rule pattern matching, so the shape is load-bearing.
pub(crate) fn write_expr(expr: &pr::Expr) -> String {
    match &expr.kind {
        pr::ExprKind::Binary(cmp) => format!(
            "{} {} {}",
            write_operand(&cmp.left),
            cmp.op,
            write_operand(&cmp.right)
        ),
        pr::ExprKind::Logical(logical) => format!(
            "({} {} {})",
            write_expr(&logical.left),
            logical.op,
            write_expr(&logical.right)
        ),
    }
}

pub(crate) fn write_operand(operand: &pr::Operand) -> String {
    match operand {
        pr::Operand::Column(name) => name.clone(),
        pr::Operand::Number(n) => format!("{n}"),
        pr::Operand::String(s) => format!("'{s}'"),
    }
}

#[cfg(test)]
mod test {
    use insta::assert_snapshot;

    use raqc_parser::parse_source;

    use super::*;

    fn render(source: &str) -> String {
        let stmt = parse_source(source).unwrap();
        let select = stmt.kind.into_select().unwrap();
        write_expr(&select.filter.unwrap())
    }

    #[test]
    fn comparisons_are_bare() {
        assert_snapshot!(render("SELECT * FROM t WHERE age > 18"), @"age > 18");
        assert_snapshot!(render("SELECT * FROM t WHERE name = 'John'"), @"name = 'John'");
        assert_snapshot!(render("SELECT * FROM t WHERE price <= 100.5"), @"price <= 100.5");
    }

    #[test]
    fn logical_expressions_are_parenthesized() {
        assert_snapshot!(
            render("SELECT * FROM t WHERE age > 18 AND name = 'John'"),
            @"(age > 18 AND name = 'John')"
        );
        assert_snapshot!(
            render("SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3"),
            @"(a = 1 OR (b = 2 AND c = 3))"
        );
        assert_snapshot!(
            render("SELECT * FROM t WHERE ((a = 1))"),
            @"a = 1"
        );
    }

    #[test]
    fn numbers_render_as_decimal_strings() {
        assert_snapshot!(render("SELECT * FROM t WHERE a = 18"), @"a = 18");
        assert_snapshot!(render("SELECT * FROM t WHERE a = 18.0"), @"a = 18");
        assert_snapshot!(render("SELECT * FROM t WHERE a <> 0.5"), @"a != 0.5");
    }
}
