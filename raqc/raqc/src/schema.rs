//! Declared database schema that queries are validated against.
//!
//! Table and column names keep their declared casing; every lookup is
//! case-insensitive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, WithErrorInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub tables: BTreeMap<String, TableSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: BTreeMap<String, ColumnDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    #[serde(rename = "type")]
    pub ty: ColumnType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
}

/// The closed set of column types. Deserialization rejects anything else, so
/// an unknown type never reaches the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Int,
    Tinyint,
    Varchar,
    Datetime,
    Decimal,
    Boolean,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Int | ColumnType::Tinyint | ColumnType::Decimal
        )
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ColumnType::Int => "INT",
            ColumnType::Tinyint => "TINYINT",
            ColumnType::Varchar => "VARCHAR",
            ColumnType::Datetime => "DATETIME",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Boolean => "BOOLEAN",
        })
    }
}

impl DatabaseSchema {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::new_simple(format!("invalid schema: {e}")).with_code("E0100"))
    }

    /// Case-insensitive lookup returning the canonical (declared) name.
    pub fn table(&self, name: &str) -> Option<(&str, &TableSchema)> {
        self.tables
            .iter()
            .find(|(declared, _)| declared.eq_ignore_ascii_case(name))
            .map(|(declared, table)| (declared.as_str(), table))
    }
}

impl TableSchema {
    /// Case-insensitive lookup returning the canonical (declared) name.
    pub fn column(&self, name: &str) -> Option<(&str, &ColumnDefinition)> {
        self.columns
            .iter()
            .find(|(declared, _)| declared.eq_ignore_ascii_case(name))
            .map(|(declared, column)| (declared.as_str(), column))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loads_a_schema_and_looks_up_case_insensitively() {
        let schema = DatabaseSchema::from_json(
            r#"{
                "tables": {
                    "Users": {
                        "columns": {
                            "id": {"type": "INT", "primaryKey": true},
                            "name": {"type": "VARCHAR", "length": 255},
                            "age": {"type": "INT", "nullable": true}
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let (declared, users) = schema.table("USERS").unwrap();
        assert_eq!(declared, "Users");

        let (declared, id) = users.column("ID").unwrap();
        assert_eq!(declared, "id");
        assert_eq!(id.ty, ColumnType::Int);
        assert_eq!(id.primary_key, Some(true));

        assert!(schema.table("orders").is_none());
        assert!(users.column("missing").is_none());
    }

    #[test]
    fn rejects_unknown_column_types() {
        let result = DatabaseSchema::from_json(
            r#"{"tables": {"t": {"columns": {"c": {"type": "BLOB"}}}}}"#,
        );
        assert!(result.is_err());
    }
}
