use chumsky::prelude::*;

use crate::lexer::lr::{Literal, TokenKind};
use crate::parser::pr::*;
use crate::parser::{column_ref, ctrl, keyword, PError};
use crate::span::Span;

/// A boolean expression: comparisons combined with AND / OR, where AND binds
/// tighter and both are left-associative. Parentheses override.
pub(crate) fn expr() -> impl Parser<TokenKind, Expr, Error = PError> + Clone {
    recursive(|expr| {
        let operand = column_ref()
            .map(Operand::Column)
            .or(select! {
                TokenKind::Literal(Literal::Number(n)) => Operand::Number(n),
                TokenKind::Literal(Literal::String(s)) => Operand::String(s),
            })
            .labelled("operand");

        let cmp_op = select! {
            TokenKind::Eq => BinOp::Eq,
            TokenKind::Ne => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::Lte => BinOp::Lte,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::Gte => BinOp::Gte,
        };

        let comparison = operand
            .clone()
            .then(cmp_op)
            .then(operand)
            .map(|((left, op), right)| ExprKind::Binary(BinaryExpr { left, op, right }))
            .map_with_span(ExprKind::into_expr)
            .labelled("comparison");

        let primary = expr
            .delimited_by(ctrl('('), ctrl(')'))
            .or(comparison)
            .boxed();

        let and_level = primary
            .clone()
            .then(keyword("AND").to(LogicalOp::And).then(primary).repeated())
            .foldl(fold_logical);

        and_level
            .clone()
            .then(keyword("OR").to(LogicalOp::Or).then(and_level).repeated())
            .foldl(fold_logical)
    })
}

fn fold_logical(left: Expr, (op, right): (LogicalOp, Expr)) -> Expr {
    let span = Span::merge_opt(left.span, right.span);
    Expr {
        kind: ExprKind::Logical(LogicalExpr {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }),
        span,
    }
}
