use insta::assert_debug_snapshot;

use super::*;

fn lex(source: &str) -> Tokens {
    Tokens(lexer().parse(source).unwrap())
}

#[test]
fn select_star() {
    assert_debug_snapshot!(lex("SELECT * FROM users"), @r###"
    Tokens (
      0..6: Keyword("SELECT"),
      7..8: Control('*'),
      9..13: Keyword("FROM"),
      14..19: Ident("users"),
    )
    "###);
}

#[test]
fn keywords_are_case_insensitive() {
    assert_debug_snapshot!(lex("select Age froM t"), @r###"
    Tokens (
      0..6: Keyword("SELECT"),
      7..10: Ident("Age"),
      11..15: Keyword("FROM"),
      16..17: Ident("t"),
    )
    "###);
}

#[test]
fn keyword_prefix_lexes_as_identifier() {
    // `selection` continues past the reserved word, so it is an identifier.
    assert_debug_snapshot!(lex("selection fromage"), @r###"
    Tokens (
      0..9: Ident("selection"),
      10..17: Ident("fromage"),
    )
    "###);
}

#[test]
fn comparison_operators_longest_match() {
    assert_debug_snapshot!(lex("a <= 1.5 AND b <> 'x'"), @r###"
    Tokens (
      0..1: Ident("a"),
      2..4: Lte,
      5..8: Literal(Number(1.5)),
      9..12: Keyword("AND"),
      13..14: Ident("b"),
      15..17: Ne,
      18..21: Literal(String("x")),
    )
    "###);

    assert_debug_snapshot!(lex("x<=1"), @r###"
    Tokens (
      0..1: Ident("x"),
      1..3: Lte,
      3..4: Literal(Number(1.0)),
    )
    "###);
}

#[test]
fn quoting_styles_are_equivalent() {
    let single = lex("'users'");
    let double = lex("\"users\"");
    assert_eq!(single.0[0].kind, double.0[0].kind);
    assert_eq!(
        single.0[0].kind,
        TokenKind::Literal(Literal::String("users".to_string()))
    );
}

#[test]
fn numbers() {
    assert_debug_snapshot!(lex("18 100.5 007"), @r###"
    Tokens (
      0..2: Literal(Number(18.0)),
      3..8: Literal(Number(100.5)),
      9..12: Literal(Number(7.0)),
    )
    "###);
}

#[test]
fn punctuation() {
    assert_debug_snapshot!(lex("u.id, (o);"), @r###"
    Tokens (
      0..1: Ident("u"),
      1..2: Control('.'),
      2..4: Ident("id"),
      4..5: Control(','),
      6..7: Control('('),
      7..8: Ident("o"),
      8..9: Control(')'),
      9..10: Control(';'),
    )
    "###);
}

#[test]
fn unrecognized_character() {
    let errors = lex_source("SELECT @ FROM users").unwrap_err();

    assert_eq!(errors.len(), 1);
    let error = &errors[0];
    assert_eq!(error.code, Some("E0001"));
    assert_eq!(error.span, Some(crate::span::Span { start: 7, end: 8 }));
    assert_eq!(error.reason.to_string(), "unexpected @");
}

#[test]
fn empty_source_has_no_tokens() {
    assert_eq!(lex_source("").unwrap().0, vec![]);
    assert_eq!(lex_source("   \n\t ").unwrap().0, vec![]);
}
