use super::pr::*;
use crate::parse_source;

fn parse_select(source: &str) -> SelectStmt {
    let stmt = parse_source(source).unwrap();
    *stmt.kind.into_select().unwrap()
}

fn parse_filter(source: &str) -> Expr {
    parse_select(source).filter.unwrap()
}

#[test]
fn select_star() {
    let select = parse_select("SELECT * FROM users");

    assert_eq!(select.columns, vec![Column::Star]);
    assert_eq!(select.from.source, TableSource::Table("users".to_string()));
    assert_eq!(select.from.alias, None);
    assert!(select.joins.is_empty());
    assert!(select.filter.is_none());
}

#[test]
fn named_and_qualified_columns() {
    let select = parse_select("SELECT id, u.name FROM users u");

    assert_eq!(
        select.columns,
        vec![
            Column::Named("id".to_string()),
            Column::Named("u.name".to_string()),
        ]
    );
    assert_eq!(select.from.alias, Some("u".to_string()));
}

#[test]
fn aliases_with_and_without_as() {
    let explicit = parse_select("SELECT * FROM users AS u");
    let implicit = parse_select("SELECT * FROM users u");

    assert_eq!(explicit.from.alias, Some("u".to_string()));
    assert_eq!(explicit.from, implicit.from);
}

#[test]
fn quoted_table_name() {
    let select = parse_select("SELECT * FROM \"users\"");
    assert_eq!(select.from.source, TableSource::Table("users".to_string()));

    let select = parse_select("SELECT * FROM 'users'");
    assert_eq!(select.from.source, TableSource::Table("users".to_string()));
}

#[test]
fn subquery_source() {
    let select = parse_select("SELECT id FROM (SELECT * FROM users) AS u");

    let subquery = select.from.source.as_subquery().unwrap();
    assert_eq!(subquery.columns, vec![Column::Star]);
    assert_eq!(select.from.alias, Some("u".to_string()));
}

#[test]
fn join_chain() {
    let select = parse_select(
        "SELECT * FROM users u JOIN orders o ON u.id = o.user_id CROSS JOIN products",
    );

    assert_eq!(select.joins.len(), 2);

    let inner = &select.joins[0];
    assert_eq!(inner.kind, JoinKind::Inner);
    assert_eq!(inner.table, "orders");
    assert_eq!(inner.alias, Some("o".to_string()));
    assert!(inner.on.is_some());

    let cross = &select.joins[1];
    assert_eq!(cross.kind, JoinKind::Cross);
    assert_eq!(cross.table, "products");
    assert_eq!(cross.alias, None);
    assert!(cross.on.is_none());
}

#[test]
fn inner_keyword_is_optional() {
    let explicit = parse_select("SELECT * FROM a INNER JOIN b ON a.x = b.x");
    let implicit = parse_select("SELECT * FROM a JOIN b ON a.x = b.x");

    assert_eq!(explicit.joins[0].kind, JoinKind::Inner);
    assert_eq!(explicit.joins[0].table, implicit.joins[0].table);
}

#[test]
fn comparison_operands() {
    let filter = parse_filter("SELECT * FROM t WHERE age >= 21");
    let cmp = filter.kind.as_binary().unwrap();
    assert_eq!(cmp.left, Operand::Column("age".to_string()));
    assert_eq!(cmp.op, BinOp::Gte);
    assert_eq!(cmp.right, Operand::Number(21.0));

    let filter = parse_filter("SELECT * FROM t WHERE name = 'John'");
    let cmp = filter.kind.as_binary().unwrap();
    assert_eq!(cmp.right, Operand::String("John".to_string()));
}

#[test]
fn both_inequality_spellings() {
    let bang = parse_filter("SELECT * FROM t WHERE a != 1");
    let angle = parse_filter("SELECT * FROM t WHERE a <> 1");

    assert_eq!(bang.kind.as_binary().unwrap().op, BinOp::Ne);
    assert_eq!(angle.kind.as_binary().unwrap().op, BinOp::Ne);
}

#[test]
fn and_binds_tighter_than_or() {
    let filter = parse_filter("SELECT * FROM t WHERE a = 1 OR b = 2 AND c = 3");

    let or = filter.kind.as_logical().unwrap();
    assert_eq!(or.op, LogicalOp::Or);
    assert!(or.left.kind.is_binary());

    let and = or.right.kind.as_logical().unwrap();
    assert_eq!(and.op, LogicalOp::And);
}

#[test]
fn logical_operators_are_left_associative() {
    let filter = parse_filter("SELECT * FROM t WHERE a = 1 AND b = 2 AND c = 3");

    let outer = filter.kind.as_logical().unwrap();
    assert_eq!(outer.op, LogicalOp::And);
    // `(a AND b) AND c`
    assert!(outer.left.kind.is_logical());
    assert!(outer.right.kind.is_binary());
}

#[test]
fn parentheses_override_precedence() {
    let filter = parse_filter("SELECT * FROM t WHERE (a = 1 OR b = 2) AND c = 3");

    let and = filter.kind.as_logical().unwrap();
    assert_eq!(and.op, LogicalOp::And);
    assert_eq!(and.left.kind.as_logical().unwrap().op, LogicalOp::Or);
}

#[test]
fn trailing_semicolon_is_ignored() {
    let with = parse_select("SELECT * FROM users;");
    let without = parse_select("SELECT * FROM users");
    assert_eq!(with, without);
}

#[test]
fn case_insensitive_statement() {
    let lower = parse_select("select id from users where age > 18");
    let upper = parse_select("SELECT id FROM users WHERE age > 18");

    // Same AST modulo spans; identifier lexemes are preserved verbatim.
    assert_eq!(lower.columns, upper.columns);
    assert_eq!(lower.from, upper.from);
}

#[test]
fn syntax_errors() {
    assert!(parse_source("").is_err());
    assert!(parse_source("SELECT FROM users").is_err());
    assert!(parse_source("SELECT * users").is_err());
    assert!(parse_source("SELECT * FROM users WHERE").is_err());
    assert!(parse_source("SELECT * FROM users JOIN orders").is_err());
    assert!(parse_source("SELECT * FROM users CROSS JOIN orders ON a = b").is_err());
    assert!(parse_source("SELECT * FROM users extra tokens here").is_err());
}

#[test]
fn ast_serializes_to_json() {
    let stmt = parse_source("SELECT id FROM users").unwrap();
    let json = serde_json::to_value(&stmt).unwrap();

    assert_eq!(
        json["kind"]["Select"]["columns"][0],
        serde_json::json!({"Named": "id"})
    );
}

#[test]
fn error_messages_name_the_problem() {
    let errors = parse_source("SELECT FROM users").unwrap_err();
    assert_eq!(errors[0].code, Some("E0002"));

    let errors = parse_source("").unwrap_err();
    assert!(errors[0].reason.to_string().contains("SELECT"));
}
