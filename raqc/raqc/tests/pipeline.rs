//! End-to-end pipeline tests: source text in, rendered algebra out.

use insta::assert_snapshot;

use raqc::{parse, ParseResult, ParseSuccess, Stage};

fn compile(source: &str) -> Box<ParseSuccess> {
    match parse(source) {
        ParseResult::Success(success) => success,
        ParseResult::Failure(failure) => {
            panic!("expected success, got {failure:?}")
        }
    }
}

fn fail(source: &str) -> Stage {
    match parse(source) {
        ParseResult::Success(_) => panic!("expected failure"),
        ParseResult::Failure(failure) => failure.stage,
    }
}

#[test]
fn select_star() {
    let result = compile("SELECT * FROM users");
    assert_snapshot!(result.translation_string, @"π[*](users)");
    assert_snapshot!(result.optimization_string, @"π[*](users)");
    assert!(result.optimization.applied_rules.is_empty());
}

#[test]
fn named_columns() {
    let result = compile("SELECT id, name FROM users");
    assert_snapshot!(result.translation_string, @"π[id, name](users)");
    assert_snapshot!(result.optimization_string, @"π[id, name](users)");
}

#[test]
fn single_comparison() {
    let result = compile("SELECT * FROM users WHERE age > 18");
    assert_snapshot!(result.translation_string, @"π[*](σ[age > 18](users))");
    assert_snapshot!(result.optimization_string, @"π[*](σ[age > 18](users))");
}

#[test]
fn conjunction_over_one_relation() {
    let result = compile("SELECT id FROM users WHERE age > 18 AND name = 'John'");
    assert_snapshot!(
        result.translation_string,
        @"π[id](σ[(age > 18 AND name = 'John')](users))"
    );
    assert_snapshot!(
        result.optimization_string,
        @"π[id](σ[(age > 18 AND name = 'John')](users))"
    );
}

#[test]
fn subquery_collapses() {
    let result = compile("SELECT id FROM (SELECT * FROM users) AS u");
    assert_snapshot!(result.translation_string, @"π[id](π[*](users))");
    assert_snapshot!(result.optimization_string, @"π[id](users)");
    assert_eq!(
        result.optimization.applied_rules,
        vec!["Combine consecutive projections".to_string()]
    );
}

#[test]
fn range_comparison() {
    let result = compile("SELECT name, age FROM users WHERE age >= 21");
    assert_snapshot!(
        result.translation_string,
        @"π[name, age](σ[age >= 21](users))"
    );
    assert_snapshot!(
        result.optimization_string,
        @"π[name, age](σ[age >= 21](users))"
    );
}

#[test]
fn join_with_compound_filter() {
    let result = compile(
        "SELECT u.name, o.total FROM users u \
         INNER JOIN orders o ON u.id = o.user_id \
         WHERE u.age > 18 AND o.total > 100",
    );

    assert_snapshot!(
        result.translation_string,
        @"π[u.name, o.total](σ[(u.age > 18 AND o.total > 100)](⨝[u.id = o.user_id](users, orders)))"
    );

    // the compound WHERE decomposes, each predicate lands on its side, and
    // narrowing projections decorate the join inputs
    assert_snapshot!(
        result.optimization_string,
        @"π[u.name, o.total](⨝[u.id = o.user_id](π[u.name, u.id](σ[u.age > 18](users)), π[o.total, o.user_id](σ[o.total > 100](orders))))"
    );
}

#[test]
fn cross_join_with_bridging_filter_becomes_a_join() {
    let result = compile(
        "SELECT * FROM users u CROSS JOIN orders o WHERE u.id = o.user_id AND u.age > 18",
    );

    assert_snapshot!(
        result.translation_string,
        @"π[*](σ[(u.id = o.user_id AND u.age > 18)]((users × orders)))"
    );
    assert_snapshot!(
        result.optimization_string,
        @"π[*](⨝[u.id = o.user_id](σ[u.age > 18](users), orders))"
    );
    assert!(result
        .optimization
        .applied_rules
        .iter()
        .any(|rule| rule == "Convert Cartesian product to join"));
}

#[test]
fn push_down_propagates_through_nested_joins() {
    let result = compile(
        "SELECT a.x FROM a \
         INNER JOIN b ON a.id = b.a_id \
         INNER JOIN c ON b.id = c.b_id \
         WHERE a.x > 1",
    );

    assert_snapshot!(
        result.translation_string,
        @"π[a.x](σ[a.x > 1](⨝[b.id = c.b_id](⨝[a.id = b.a_id](a, b), c)))"
    );
    assert_snapshot!(
        result.optimization_string,
        @"π[a.x](⨝[b.id = c.b_id](π[a.x, b.id, a.id, b.a_id](⨝[a.id = b.a_id](π[a.x, a.id](σ[a.x > 1](a)), π[b.id, b.a_id](b))), π[c.b_id](c)))"
    );
}

#[test]
fn validate_separates_syntax_errors_from_findings() {
    let schema = raqc::schema::DatabaseSchema::from_json(
        r#"{"tables": {"users": {"columns": {"id": {"type": "INT"}}}}}"#,
    )
    .unwrap();

    // syntax errors are the Err branch
    assert!(raqc::validate("SELECT FROM users", &schema).is_err());

    // findings accumulate in the Ok branch
    let findings = raqc::validate("SELECT id, bogus FROM users", &schema).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(
        findings[0].kind,
        raqc::semantic::ValidationErrorKind::UnknownColumn
    );

    assert_eq!(raqc::validate("SELECT id FROM users", &schema).unwrap(), vec![]);
}

#[test]
fn rendered_strings_always_match_the_trees() {
    for source in [
        "SELECT * FROM users",
        "SELECT id FROM users WHERE age > 18 AND name = 'John'",
        "SELECT u.name FROM users u INNER JOIN orders o ON u.id = o.user_id",
        "SELECT * FROM a CROSS JOIN b",
    ] {
        let result = compile(source);
        assert_eq!(
            result.translation_string,
            raqc::write_algebra(&result.translation)
        );
        assert_eq!(
            result.optimization_string,
            raqc::write_algebra(&result.optimization.optimized)
        );
    }
}

#[test]
fn keyword_case_does_not_change_the_result() {
    let lower = compile("select id from users where age > 18");
    let upper = compile("SELECT id FROM users WHERE age > 18");

    assert_eq!(lower.translation_string, upper.translation_string);
    assert_eq!(lower.optimization_string, upper.optimization_string);
}

#[test]
fn quoting_style_does_not_change_the_result() {
    let bare = compile("SELECT * FROM users");
    let single = compile("SELECT * FROM 'users'");
    let double = compile("SELECT * FROM \"users\"");

    assert_eq!(bare.translation_string, single.translation_string);
    assert_eq!(bare.translation_string, double.translation_string);
}

#[test]
fn boundary_failures() {
    assert_eq!(fail(""), Stage::Parser);
    assert_eq!(fail("SELECT FROM users"), Stage::Parser);
    assert_eq!(fail("SELECT @ FROM users"), Stage::Lexer);
}

#[test]
fn failure_details_locate_the_error() {
    let ParseResult::Failure(failure) = parse("SELECT @ FROM users") else {
        panic!("expected failure");
    };

    assert!(failure.message.contains('@'));
    assert!(failure.details[0].contains("line 1, column 8"));
}
