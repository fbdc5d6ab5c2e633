//! Lexer, parser and AST for a restricted SQL SELECT dialect.
//!
//! The dialect covers column lists, table or subquery sources with aliases,
//! INNER/CROSS join chains and a boolean WHERE expression with the usual
//! precedence (AND over OR, both left-associative, parentheses override).

pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

use error::Error;
use parser::pr;

/// Build an AST from a source string: tokenize, then parse.
///
/// Lexer errors short-circuit; the parser never sees a token stream with
/// errors attached.
pub fn parse_source(source: &str) -> Result<pr::Stmt, Vec<Error>> {
    let tokens = lexer::lex_source(source)?;
    log::debug!("lexed {} tokens", tokens.0.len());

    parser::parse_tokens(tokens, source.chars().count())
}
