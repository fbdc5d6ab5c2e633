//! # raqc
//!
//! Compiles a restricted SQL SELECT dialect into a relational-algebra tree,
//! validates statements against a declared schema, and heuristically
//! optimizes the tree with a fixed set of rewrite rules.
//!
//! You probably want to start with the [parse] wrapper function.
//!
//! For more granular access, refer to this diagram:
//! ```ascii
//!              SQL text
//!
//!      (lex)     │
//!      (parse)   │  raqc_parser::parse_source
//!                ▼
//!               AST ──────► semantic::validate(ast, schema)
//!                │
//!  (translate)   │  semantic::lower
//!                ▼
//!          algebra tree ──► codegen::write_node / codegen::render_graph
//!                │
//!  (optimize)    │  opt::optimize
//!                ▼
//!        optimized algebra
//! ```
//!
//! Every stage is a pure function over its input; errors at any stage
//! short-circuit with a structured result rather than aborting control flow.

#![forbid(unsafe_code)]
#![allow(clippy::result_large_err)]

use serde::{Deserialize, Serialize};

pub use raqc_parser::error::{Error, Errors, Reason, WithErrorInfo};
pub use raqc_parser::lexer::lr;
pub use raqc_parser::parser::pr;
pub use raqc_parser::span::Span;

pub mod codegen;
pub mod complete;
mod error_message;
pub mod ir;
pub mod opt;
pub mod schema;
pub mod semantic;

pub use complete::{complete, Suggestion, SuggestionKind};
pub use error_message::{ErrorMessage, ErrorMessages, SourceLocation};
pub use opt::{optimize, Heuristic, Optimization, DEFAULT_PIPELINE};

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Outcome of the full pipeline: lex → parse → translate → optimize.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ParseResult {
    Success(Box<ParseSuccess>),
    Failure(ParseFailure),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSuccess {
    pub ast: pr::Stmt,
    pub translation: ir::ra::Node,
    pub translation_string: String,
    pub optimization: Optimization,
    pub optimization_string: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseFailure {
    pub stage: Stage,
    pub message: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lexer,
    Parser,
    Translation,
}

/// Run the full pipeline over a source string with the default rewrite
/// pipeline. Never panics; failures come back as [ParseResult::Failure].
pub fn parse(source: &str) -> ParseResult {
    parse_with(source, DEFAULT_PIPELINE)
}

/// Run the full pipeline with a caller-selected set of heuristics.
pub fn parse_with(source: &str, heuristics: &[Heuristic]) -> ParseResult {
    let tokens = match raqc_parser::lexer::lex_source(source) {
        Ok(tokens) => tokens,
        Err(errors) => return failure(Stage::Lexer, source, errors),
    };

    let ast = match raqc_parser::parser::parse_tokens(tokens, source.chars().count()) {
        Ok(ast) => ast,
        Err(errors) => return failure(Stage::Parser, source, errors),
    };

    let translation = match semantic::lower(&ast) {
        Ok(node) => node,
        Err(error) => return failure(Stage::Translation, source, vec![error]),
    };
    let translation_string = codegen::write_node(&translation);

    let optimization = opt::optimize(translation.clone(), heuristics);
    let optimization_string = codegen::write_node(&optimization.optimized);

    log::debug!("{translation_string} => {optimization_string}");

    ParseResult::Success(Box::new(ParseSuccess {
        ast,
        translation,
        translation_string,
        optimization,
        optimization_string,
    }))
}

/// Lex, parse and validate a statement against a schema. Lex/parse failures
/// are the `Err` branch; validation findings accumulate in the `Ok` list.
pub fn validate(
    source: &str,
    schema: &schema::DatabaseSchema,
) -> Result<Vec<semantic::ValidationError>, Errors> {
    let ast = raqc_parser::parse_source(source).map_err(Errors)?;
    Ok(semantic::validate(&ast, schema))
}

/// Render an algebra tree in standard relational-algebra notation.
pub fn write_algebra(node: &ir::ra::Node) -> String {
    codegen::write_node(node)
}

/// Emit the node/edge graph description of an algebra tree.
pub fn render_graph(node: &ir::ra::Node) -> codegen::Graph {
    codegen::render_graph(node)
}

fn failure(stage: Stage, source: &str, errors: Vec<Error>) -> ParseResult {
    let messages = ErrorMessages::from(Errors(errors)).composed(source);
    let message = messages
        .inner
        .first()
        .map(|e| e.reason.clone())
        .unwrap_or_default();
    let details = messages.inner.iter().map(|e| e.to_string()).collect();

    ParseResult::Failure(ParseFailure {
        stage,
        message,
        details,
    })
}
