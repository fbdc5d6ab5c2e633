use chumsky::{error::Cheap, prelude::*};

use crate::error::{Error, Reason, WithErrorInfo};
use crate::span::Span;

pub mod lr;
#[cfg(test)]
mod test;

use lr::{Literal, Token, TokenKind, Tokens, KEYWORDS};

/// Lex a source string into tokens, accumulating lexer errors.
pub fn lex_source(source: &str) -> Result<Tokens, Vec<Error>> {
    let (tokens, lex_errors) = lexer().parse_recovery(source);

    if lex_errors.is_empty() {
        Ok(Tokens(tokens.unwrap_or_default()))
    } else {
        Err(lex_errors
            .into_iter()
            .map(|e| convert_lexer_error(source, e))
            .collect())
    }
}

/// Lex chars to tokens until the end of the input
pub(crate) fn lexer() -> impl Parser<char, Vec<Token>, Error = Cheap<char>> {
    lex_token()
        .repeated()
        .then_ignore(ignored())
        .then_ignore(end())
}

/// Lex chars to a single token
fn lex_token() -> impl Parser<char, Token, Error = Cheap<char>> {
    // Longest match: two-char comparison operators before their one-char
    // prefixes.
    let control_multi = choice((
        just("<=").to(TokenKind::Lte),
        just(">=").to(TokenKind::Gte),
        just("!=").to(TokenKind::Ne),
        just("<>").to(TokenKind::Ne),
    ));

    let control_cmp = choice((
        just('=').to(TokenKind::Eq),
        just('<').to(TokenKind::Lt),
        just('>').to(TokenKind::Gt),
    ));

    let control = one_of("*,.();").map(TokenKind::Control);

    // A reserved word is only a keyword when the following character is not
    // an identifier continuation; lexing the whole identifier first and
    // checking it against the catalog gives exactly that rule.
    let ident = ident_part().map(|ident| {
        let upper = ident.to_ascii_uppercase();
        if KEYWORDS.contains(&upper.as_str()) {
            TokenKind::Keyword(upper)
        } else {
            TokenKind::Ident(ident)
        }
    });

    let literal = literal().map(TokenKind::Literal);

    let token = choice((control_multi, control_cmp, control, literal, ident))
        // Resynchronize after an unrecognized character by skipping it.
        .recover_with(skip_then_retry_until([]));

    ignored().ignore_then(token.map_with_span(|kind, span| Token { kind, span }))
}

fn ignored() -> impl Parser<char, (), Error = Cheap<char>> {
    filter(|c: &char| c.is_whitespace()).repeated().ignored()
}

pub(crate) fn ident_part() -> impl Parser<char, String, Error = Cheap<char>> + Clone {
    filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .chain(filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_').repeated())
        .collect()
}

fn literal() -> impl Parser<char, Literal, Error = Cheap<char>> {
    let digits = filter(|c: &char| c.is_ascii_digit()).repeated().at_least(1);

    let frac = just('.').chain(digits.clone());

    let number = digits
        .chain::<char, _, _>(frac.or_not().flatten())
        .collect::<String>()
        .try_map(|repr: String, span| {
            repr.parse::<f64>()
                .map(Literal::Number)
                .map_err(|_| Cheap::expected_input_found(span, None, None))
        })
        .labelled("number");

    let string = quoted_string().map(Literal::String);

    number.or(string)
}

/// A single- or double-quoted string; the quote characters are stripped and
/// the contents are taken verbatim.
fn quoted_string() -> impl Parser<char, String, Error = Cheap<char>> {
    quoted_string_of_quote('\'')
        .or(quoted_string_of_quote('"'))
        .collect::<String>()
        .labelled("string")
}

fn quoted_string_of_quote(quote: char) -> impl Parser<char, Vec<char>, Error = Cheap<char>> {
    none_of(quote)
        .repeated()
        .delimited_by(just(quote), just(quote))
}

fn convert_lexer_error(source: &str, e: Cheap<char>) -> Error {
    // Take the span based on chars, not bytes, so we can't just index into
    // the str.
    let found: String = source
        .chars()
        .skip(e.span().start)
        .take(e.span().end - e.span().start)
        .collect();
    let span = Span {
        start: e.span().start,
        end: e.span().end,
    };

    Error::new(Reason::Unexpected { found })
        .with_span(Some(span))
        .with_code("E0001")
}
