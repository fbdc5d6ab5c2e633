use chumsky::prelude::*;

use crate::lexer::lr::{Literal, TokenKind};
use crate::parser::expr::expr;
use crate::parser::pr::*;
use crate::parser::{column_ref, ctrl, ident_part, keyword, PError};
use crate::span::Span;

/// A single statement, optionally terminated by a semicolon.
pub(crate) fn statement() -> impl Parser<TokenKind, Stmt, Error = PError> {
    select_stmt()
        .map(|select| StmtKind::Select(Box::new(select)))
        .map_with_span(|kind, span: Span| Stmt {
            kind,
            span: Some(span),
        })
        .then_ignore(ctrl(';').or_not())
        .then_ignore(end())
}

pub(crate) fn select_stmt() -> impl Parser<TokenKind, SelectStmt, Error = PError> {
    recursive(|select| {
        // `*` selects everything and cannot be mixed with named columns.
        let columns = ctrl('*')
            .to(vec![Column::Star])
            .or(column_ref()
                .map(Column::Named)
                .separated_by(ctrl(','))
                .at_least(1))
            .labelled("column list");

        let alias = keyword("AS").ignore_then(ident_part()).or(ident_part());

        let table_name = select! {
            TokenKind::Ident(name) => name,
            TokenKind::Literal(Literal::String(name)) => name,
        };

        let table_source = table_name
            .clone()
            .map(TableSource::Table)
            .or(select
                .delimited_by(ctrl('('), ctrl(')'))
                .map(|subquery: SelectStmt| TableSource::Subquery(Box::new(subquery))))
            .labelled("table");

        let from = keyword("FROM")
            .ignore_then(table_source)
            .then(alias.clone().or_not())
            .map(|(source, alias)| FromClause { source, alias });

        let inner_join = keyword("INNER")
            .or_not()
            .ignore_then(keyword("JOIN"))
            .ignore_then(table_name.clone())
            .then(alias.clone().or_not())
            .then_ignore(keyword("ON"))
            .then(expr())
            .map(|((table, alias), on)| JoinClause {
                kind: JoinKind::Inner,
                table,
                alias,
                on: Some(on),
            })
            .labelled("join");

        let cross_join = keyword("CROSS")
            .ignore_then(keyword("JOIN"))
            .ignore_then(table_name)
            .then(alias.or_not())
            .map(|(table, alias)| JoinClause {
                kind: JoinKind::Cross,
                table,
                alias,
                on: None,
            })
            .labelled("cross join");

        let joins = inner_join.or(cross_join).repeated();

        let filter = keyword("WHERE").ignore_then(expr()).or_not();

        keyword("SELECT")
            .ignore_then(columns)
            .then(from)
            .then(joins)
            .then(filter)
            .map(|(((columns, from), joins), filter)| SelectStmt {
                columns,
                from,
                joins,
                filter,
            })
    })
}
