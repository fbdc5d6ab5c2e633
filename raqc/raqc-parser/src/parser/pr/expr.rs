use enum_as_inner::EnumAsInner;
use serde::{Deserialize, Serialize};

use crate::span::Span;

/// A boolean expression appearing in WHERE or in a join's ON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

#[derive(Debug, EnumAsInner, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// A comparison between two operands, such as `age > 18`.
    Binary(BinaryExpr),
    /// Two expressions combined with AND or OR.
    Logical(LogicalExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Operand,
    pub op: BinOp,
    pub right: Operand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub op: LogicalOp,
    pub right: Box<Expr>,
}

#[derive(Debug, EnumAsInner, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// `ident` or `qualifier.ident`, stored verbatim including the dot.
    Column(String),
    Number(f64),
    /// Quote characters are already stripped by the lexer.
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Eq,
    /// `!=` and `<>` are distinct spellings with identical semantics; both
    /// normalize to this operator.
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl Expr {
    pub fn new<K: Into<ExprKind>>(kind: K) -> Self {
        Expr {
            kind: kind.into(),
            span: None,
        }
    }
}

impl ExprKind {
    pub fn into_expr(self, span: Span) -> Expr {
        Expr {
            kind: self,
            span: Some(span),
        }
    }
}

impl From<BinaryExpr> for ExprKind {
    fn from(value: BinaryExpr) -> Self {
        ExprKind::Binary(value)
    }
}

impl From<LogicalExpr> for ExprKind {
    fn from(value: LogicalExpr) -> Self {
        ExprKind::Logical(value)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BinOp::Eq => "=",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Lte => "<=",
            BinOp::Gt => ">",
            BinOp::Gte => ">=",
        })
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
        })
    }
}
