use chumsky::error::SimpleReason;
use chumsky::{prelude::*, Stream};
use itertools::Itertools;

use crate::error::{Error, Reason, WithErrorInfo};
use crate::lexer::lr::{TokenKind, Tokens};
use crate::span::Span;

mod expr;
pub mod pr;
mod stmt;
#[cfg(test)]
mod test;

pub(crate) type PError = Simple<TokenKind, Span>;

/// Build an AST from a token stream.
pub fn parse_tokens(tokens: Tokens, source_len: usize) -> Result<pr::Stmt, Vec<Error>> {
    let stream = prepare_stream(tokens, source_len);

    let (ast, parse_errors) = stmt::statement().parse_recovery(stream);

    if parse_errors.is_empty() {
        // Without errors, recovery always produces an output.
        ast.ok_or_else(|| vec![Error::new_simple("parser produced no output").with_code("E0002")])
    } else {
        Err(parse_errors.into_iter().map(convert_parser_error).collect())
    }
}

fn prepare_stream(
    tokens: Tokens,
    source_len: usize,
) -> Stream<'static, TokenKind, Span, impl Iterator<Item = (TokenKind, Span)>> {
    let eoi = Span {
        start: source_len,
        end: source_len + 1,
    };
    let tokens = tokens.0.into_iter().map(|t| (t.kind, Span::from(t.span)));
    Stream::from_iter(eoi, tokens)
}

pub(crate) fn ident_part() -> impl Parser<TokenKind, String, Error = PError> + Clone {
    select! { TokenKind::Ident(ident) => ident }.map_err(|e: PError| {
        Simple::expected_input_found(
            e.span(),
            [Some(TokenKind::Ident("".to_string()))],
            e.found().cloned(),
        )
    })
}

pub(crate) fn keyword(kw: &'static str) -> impl Parser<TokenKind, (), Error = PError> + Clone {
    just(TokenKind::Keyword(kw.to_string())).ignored()
}

pub(crate) fn ctrl(char: char) -> impl Parser<TokenKind, (), Error = PError> + Clone {
    just(TokenKind::Control(char)).ignored()
}

/// `ident` or `qualifier.ident`, joined back verbatim including the dot.
pub(crate) fn column_ref() -> impl Parser<TokenKind, String, Error = PError> + Clone {
    ident_part()
        .then(ctrl('.').ignore_then(ident_part()).or_not())
        .map(|(base, field)| match field {
            Some(field) => format!("{base}.{field}"),
            None => base,
        })
}

fn convert_parser_error(e: PError) -> Error {
    let mut span = e.span();

    if e.found().is_none() {
        // found end of file
        // fix for span outside of source
        if span.start > 0 && span.end > 0 {
            span.start -= 1;
            span.end -= 1;
        }
    }

    construct_parser_error(e)
        .with_span(Some(span))
        .with_code("E0002")
}

fn construct_parser_error(e: PError) -> Error {
    if let SimpleReason::Custom(message) = e.reason() {
        return Error::new_simple(message);
    }

    fn token_to_string(t: Option<TokenKind>) -> String {
        t.as_ref()
            .map(TokenKind::to_string)
            .unwrap_or_else(|| "end of input".to_string())
    }

    let expected: Vec<String> = e
        .expected()
        .cloned()
        .map(token_to_string)
        .unique()
        .collect();

    let while_parsing = e
        .label()
        .map(|l| format!(" while parsing {l}"))
        .unwrap_or_default();

    if expected.is_empty() || expected.len() > 10 {
        let label = token_to_string(e.found().cloned());
        return Error::new_simple(format!("unexpected {label}{while_parsing}"));
    }

    let mut expected = expected;
    expected.sort();

    let expected = match expected.len() {
        1 => expected.remove(0),
        2 => expected.join(" or "),
        _ => {
            let last = expected.pop().unwrap();
            format!("one of {} or {last}", expected.join(", "))
        }
    };

    match e.found() {
        Some(found) => Error::new(Reason::Expected {
            who: e.label().map(|x| x.to_string()),
            expected,
            found: found.to_string(),
        }),
        // We want a friendlier message than "found end of input"...
        None => Error::new(Reason::Simple(format!(
            "Expected {expected}, but didn't find anything before the end."
        ))),
    }
}
