use serde::{Deserialize, Serialize};

use crate::pr;
use crate::schema::{ColumnType, DatabaseSchema};
use crate::semantic::AliasScope;

/// A finding of the schema validator. The validator accumulates findings and
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    UnknownTable,
    UnknownColumn,
    AmbiguousColumn,
    TypeMismatch,
    InvalidComparison,
}

/// Check a statement against a declared schema. Returns every finding; an
/// empty list means the statement is valid.
pub fn validate(stmt: &pr::Stmt, schema: &DatabaseSchema) -> Vec<ValidationError> {
    match &stmt.kind {
        pr::StmtKind::Select(select) => {
            let mut validator = Validator::new(schema);
            validator.validate_select(select);
            validator.errors
        }
        other => vec![ValidationError {
            kind: ValidationErrorKind::InvalidComparison,
            message: format!("{} statements are not supported", other.as_ref()),
            table: None,
            column: None,
        }],
    }
}

struct Validator<'a> {
    schema: &'a DatabaseSchema,
    scope: AliasScope,
    errors: Vec<ValidationError>,
}

impl<'a> Validator<'a> {
    fn new(schema: &'a DatabaseSchema) -> Self {
        Validator {
            schema,
            scope: AliasScope::default(),
            errors: Vec::new(),
        }
    }

    fn validate_select(&mut self, select: &pr::SelectStmt) {
        // 1. resolve the FROM source; an unknown table aborts further checks
        match &select.from.source {
            pr::TableSource::Table(name) => {
                let Some((canonical, _)) = self.schema.table(name) else {
                    self.push_unknown_table(name);
                    return;
                };
                let canonical = canonical.to_string();
                let alias = select.from.alias.as_deref().unwrap_or(name);
                self.scope.add(alias, &canonical);
            }
            pr::TableSource::Subquery(inner) => {
                let mut sub = Validator::new(self.schema);
                sub.validate_select(inner);
                self.errors.extend(sub.errors);

                if select.from.alias.is_none() {
                    self.errors.push(ValidationError {
                        kind: ValidationErrorKind::InvalidComparison,
                        message: "Subquery in FROM clause must have an alias".to_string(),
                        table: None,
                        column: None,
                    });
                }

                // The alias exposes the subquery's base table; without one
                // there is nothing to resolve columns against.
                let Some(base) = subquery_base_table(self.schema, inner) else {
                    return;
                };
                if let Some(alias) = &select.from.alias {
                    self.scope.add(alias, &base);
                }
            }
        }

        // 2.+3. joins extend the scope in order; an ON expression may
        // reference any relation in scope at that point
        for join in &select.joins {
            match self.schema.table(&join.table) {
                None => {
                    self.push_unknown_table(&join.table);
                    continue;
                }
                Some((canonical, _)) => {
                    let canonical = canonical.to_string();
                    let alias = join.alias.as_deref().unwrap_or(&join.table);
                    self.scope.add(alias, &canonical);
                }
            }
            if let Some(on) = &join.on {
                self.validate_expr(on);
            }
        }

        // 4. select columns
        for column in &select.columns {
            if let pr::Column::Named(name) = column {
                self.resolve_column(name);
            }
        }

        // 5. WHERE
        if let Some(filter) = &select.filter {
            self.validate_expr(filter);
        }
    }

    fn validate_expr(&mut self, expr: &pr::Expr) {
        match &expr.kind {
            pr::ExprKind::Logical(logical) => {
                self.validate_expr(&logical.left);
                self.validate_expr(&logical.right);
            }
            pr::ExprKind::Binary(cmp) => {
                let left = self.operand_type(&cmp.left);
                let right = self.operand_type(&cmp.right);

                if let (Some(left_ty), Some(right_ty)) = (left, right) {
                    if !compatible(left_ty, right_ty, cmp.op) {
                        self.errors.push(ValidationError {
                            kind: ValidationErrorKind::TypeMismatch,
                            message: format!(
                                "Cannot compare {} ({}) with {} ({})",
                                crate::codegen::write_operand(&cmp.left),
                                left_ty,
                                crate::codegen::write_operand(&cmp.right),
                                right_ty,
                            ),
                            table: None,
                            column: None,
                        });
                    }
                }
            }
        }
    }

    fn operand_type(&mut self, operand: &pr::Operand) -> Option<ColumnType> {
        match operand {
            pr::Operand::Column(name) => self.resolve_column(name),
            pr::Operand::Number(_) => Some(ColumnType::Decimal),
            pr::Operand::String(_) => Some(ColumnType::Varchar),
        }
    }

    /// Resolve a (possibly qualified) column reference against the scope,
    /// emitting a finding when it does not resolve cleanly.
    fn resolve_column(&mut self, name: &str) -> Option<ColumnType> {
        if let Some((qualifier, column)) = name.split_once('.') {
            let Some(table) = self.scope.lookup(qualifier) else {
                self.errors.push(ValidationError {
                    kind: ValidationErrorKind::UnknownTable,
                    message: format!("Unknown table or alias '{qualifier}'"),
                    table: Some(qualifier.to_string()),
                    column: Some(column.to_string()),
                });
                return None;
            };
            let table = table.to_string();
            self.column_on_table(&table, column)
        } else {
            self.resolve_unqualified(name)
        }
    }

    fn resolve_unqualified(&mut self, column: &str) -> Option<ColumnType> {
        if self.scope.is_empty() {
            // the FROM clause already failed; avoid cascading noise
            return None;
        }

        let matches: Vec<(String, ColumnType)> = self
            .scope
            .entries()
            .iter()
            .filter_map(|entry| {
                let (_, table) = self.schema.table(&entry.table)?;
                let (_, definition) = table.column(column)?;
                Some((entry.table.clone(), definition.ty))
            })
            .collect();

        match matches.len() {
            0 => {
                let message = if self.scope.len() == 1 {
                    format!(
                        "Column '{column}' does not exist on table '{}'",
                        self.scope.entries()[0].table
                    )
                } else {
                    format!("Column '{column}' does not exist on any table in scope")
                };
                self.errors.push(ValidationError {
                    kind: ValidationErrorKind::UnknownColumn,
                    message,
                    table: None,
                    column: Some(column.to_string()),
                });
                None
            }
            1 => Some(matches[0].1),
            _ => {
                let tables: Vec<&str> = matches.iter().map(|(t, _)| t.as_str()).collect();
                self.errors.push(ValidationError {
                    kind: ValidationErrorKind::AmbiguousColumn,
                    message: format!(
                        "Column '{column}' is ambiguous; it exists on tables {}",
                        tables.join(", ")
                    ),
                    table: None,
                    column: Some(column.to_string()),
                });
                None
            }
        }
    }

    fn column_on_table(&mut self, table: &str, column: &str) -> Option<ColumnType> {
        let (canonical, table_schema) = self.schema.table(table)?;
        let canonical = canonical.to_string();
        match table_schema.column(column) {
            Some((_, definition)) => Some(definition.ty),
            None => {
                self.errors.push(ValidationError {
                    kind: ValidationErrorKind::UnknownColumn,
                    message: format!("Column '{column}' does not exist on table '{canonical}'"),
                    table: Some(canonical),
                    column: Some(column.to_string()),
                });
                None
            }
        }
    }

    fn push_unknown_table(&mut self, name: &str) {
        self.errors.push(ValidationError {
            kind: ValidationErrorKind::UnknownTable,
            message: format!("Unknown table '{name}'"),
            table: Some(name.to_string()),
            column: None,
        });
    }
}

/// The table a FROM subquery ultimately reads from, used to resolve columns
/// referenced through the subquery's alias.
fn subquery_base_table(schema: &DatabaseSchema, select: &pr::SelectStmt) -> Option<String> {
    match &select.from.source {
        pr::TableSource::Table(name) => schema.table(name).map(|(canonical, _)| canonical.to_string()),
        pr::TableSource::Subquery(inner) => subquery_base_table(schema, inner),
    }
}

/// Two operand types compare under `op` iff they sit in the same family;
/// BOOLEAN only supports equality.
fn compatible(left: ColumnType, right: ColumnType, op: pr::BinOp) -> bool {
    let equality = matches!(op, pr::BinOp::Eq | pr::BinOp::Ne);

    if left.is_numeric() && right.is_numeric() {
        return true;
    }
    match (left, right) {
        (ColumnType::Varchar, ColumnType::Varchar) => true,
        (ColumnType::Datetime, ColumnType::Datetime) => true,
        (ColumnType::Boolean, ColumnType::Boolean) => equality,
        _ => false,
    }
}
