use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::parser::pr::Expr;
use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// The statement type is open: only SELECT can be parsed today, but the DML
/// variants exist so downstream stages answer them with a structured
/// "not supported" failure instead of being unable to represent them.
#[derive(Debug, EnumAsInner, Clone, PartialEq, Serialize, Deserialize, strum::AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum StmtKind {
    Select(Box<SelectStmt>),
    Insert(DmlStmt),
    Update(DmlStmt),
    Delete(DmlStmt),
}

/// Skeleton of a DML statement; reserved, never produced by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmlStmt {
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStmt {
    pub columns: Vec<Column>,
    pub from: FromClause,
    pub joins: Vec<JoinClause>,
    /// The WHERE clause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expr>,
}

#[derive(Debug, EnumAsInner, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    Star,
    /// `ident` or `qualifier.ident`, stored verbatim including the dot.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    pub source: TableSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, EnumAsInner, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableSource {
    Table(String),
    Subquery(Box<SelectStmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    pub kind: JoinKind,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Required for inner joins, forbidden for cross joins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    Cross,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt { kind, span: None }
    }
}

